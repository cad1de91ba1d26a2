//! The asynchronous request-lifecycle engine.
//!
//! This module contains the core logic for turning an accepted submission
//! into durable results: the [`JobSupervisor`] creates the request record
//! and hands off exactly one background worker task per request, and the
//! [`worker`] drives the per-key generate/persist loop and the status
//! state machine.
//!
//! ## Structure
//!
//! - [`supervisor`] - submission handoff and graceful shutdown.
//! - [`worker`] - the per-request processing loop.
//! - [`status_report`] - the read path consumed by the request facade.

pub mod supervisor;
pub mod worker;

pub use supervisor::JobSupervisor;

use keysmith_core::store::RecordStore;
use keysmith_core::{Error, RequestStatus, ValidatorStatusResponse};

/// Resolves the externally visible state of a request.
///
/// Keys are returned only for successful requests, in insertion order. A
/// failed request carries a generic message, never the underlying cause;
/// its partial keys remain in the store but are not surfaced here.
pub async fn status_report(
    store: &dyn RecordStore,
    request_id: &str,
) -> Result<ValidatorStatusResponse, Error> {
    let request = store
        .get_request(request_id)
        .await?
        .ok_or(Error::NotFound)?;

    let report = match request.status {
        RequestStatus::Started => ValidatorStatusResponse {
            status: RequestStatus::Started,
            keys: None,
            message: None,
        },
        RequestStatus::Successful => {
            let keys = store
                .list_keys_for_request(request_id)
                .await?
                .into_iter()
                .map(|key| key.key)
                .collect();
            ValidatorStatusResponse {
                status: RequestStatus::Successful,
                keys: Some(keys),
                message: None,
            }
        }
        RequestStatus::Failed => ValidatorStatusResponse {
            status: RequestStatus::Failed,
            keys: None,
            message: Some("Error processing request".to_string()),
        },
    };

    Ok(report)
}
