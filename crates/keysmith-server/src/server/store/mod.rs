//! Record store implementations.
//!
//! The [`RecordStore`] trait itself lives in `keysmith-core`; this module
//! provides the concrete SQLite-backed implementation used by the server.
//!
//! [`RecordStore`]: keysmith_core::store::RecordStore

pub mod sqlite;

pub use sqlite::SqliteStore;
