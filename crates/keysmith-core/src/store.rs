//! Durable storage boundary for request and key records.
//!
//! The job engine and the request facade both talk to storage through
//! [`RecordStore`], never to a concrete database directly. Implementations
//! must tolerate concurrent sessions (one per worker task plus the status
//! query path). Each operation is its own atomic unit; callers never ask
//! for cross-record transactions and never retry automatically.

use crate::{Error, NewKey, ProvisionRequest, ProvisionedKey, RequestStatus};
use async_trait::async_trait;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Durably creates a request record. The record must exist before any
    /// key referencing it is written.
    async fn create_request(&self, request: &ProvisionRequest) -> Result<(), Error>;

    /// Point lookup by correlation id.
    async fn get_request(&self, request_id: &str) -> Result<Option<ProvisionRequest>, Error>;

    /// Overwrites the status (and `updated_at`) of a request
    /// unconditionally.
    ///
    /// Returns `false` when no request with the given id exists; the
    /// caller decides whether that is an anomaly.
    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<bool, Error>;

    /// Appends one generated key. The store assigns `key_id` and
    /// `created_at`.
    async fn create_key(&self, key: &NewKey) -> Result<(), Error>;

    /// All keys belonging to a request, in insertion order.
    async fn list_keys_for_request(&self, request_id: &str) -> Result<Vec<ProvisionedKey>, Error>;

    /// Cheap connectivity probe for the health endpoint.
    async fn health_check(&self) -> Result<(), Error>;
}
