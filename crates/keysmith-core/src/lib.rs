#![doc = include_str!("../README.md")]

mod common;
pub mod keygen;
pub mod store;

pub use common::*;
