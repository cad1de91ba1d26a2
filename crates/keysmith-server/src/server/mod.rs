//! Server-side components of the keysmith provisioning service.
//!
//! This module contains the building blocks necessary to run the HTTP
//! server, including the request facade, the background job engine, the
//! SQLite record store, and telemetry setup.
//!
//! ## Submodules
//!
//! - [`config`] - CLI/env argument parsing and validated runtime
//!   configuration.
//! - [`http`] - The axum request facade: input validation, submission,
//!   status queries, health.
//! - [`jobs`] - The asynchronous request-lifecycle engine: one worker task
//!   per accepted request.
//! - [`store`] - The sqlx-backed [`RecordStore`] implementation.
//! - [`telemetry`] - Tracing-based structured logging initialization.
//!
//! These components are wired together in the server's `main.rs`.
//!
//! [`RecordStore`]: keysmith_core::store::RecordStore

pub mod config;
pub mod http;
pub mod jobs;
pub mod store;
pub mod telemetry;
