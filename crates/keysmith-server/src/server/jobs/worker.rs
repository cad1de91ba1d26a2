//! Per-request background worker.
//!
//! Each accepted request is processed by exactly one worker task running
//! this module's [`run`] loop: generate a key, persist it, repeat. Keys
//! are produced strictly sequentially, so within a request the persisted
//! order equals the generation order, and a mid-batch fault loses nothing
//! that was already written.

use keysmith_core::keygen::KeyGenerator;
use keysmith_core::store::RecordStore;
use keysmith_core::types::{NewKey, RequestStatus};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Work owned by a single background task.
#[derive(Clone, Debug)]
pub struct ProvisionJob {
    pub request_id: String,
    pub num_validators: u32,
    pub fee_recipient: String,
}

/// Processes one accepted request to a terminal status.
///
/// The first failed generation or key write transitions the request to
/// `failed` and stops the loop; keys persisted by earlier iterations are
/// left intact (no compensating deletes). When every iteration completes,
/// the request transitions to `successful`. This function never returns an
/// error: background failures are absorbed into the request status and
/// are only observable through polling.
pub async fn run(
    job: ProvisionJob,
    store: Arc<dyn RecordStore>,
    keygen: Arc<dyn KeyGenerator>,
    cancel: CancellationToken,
) {
    tracing::debug!("worker started for request {}", job.request_id);

    for produced in 0..job.num_validators {
        // The token only fires during graceful shutdown. Stopping at the
        // generation suspension point leaves the request in `started` with
        // its partial key set, the same state an abrupt process exit would
        // leave behind.
        let generated = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::warn!(
                    "request {} cancelled after {produced}/{} keys",
                    job.request_id,
                    job.num_validators
                );
                return;
            }
            generated = keygen.generate() => generated,
        };

        let key = match generated {
            Ok(key) => key,
            Err(e) => {
                tracing::error!("key generation failed for request {}: {e}", job.request_id);
                update_status(store.as_ref(), &job.request_id, RequestStatus::Failed).await;
                return;
            }
        };

        let record = NewKey {
            request_id: job.request_id.clone(),
            key,
            fee_recipient: job.fee_recipient.clone(),
        };
        if let Err(e) = store.create_key(&record).await {
            tracing::error!(
                "failed to store key {}/{} for request {}: {e}",
                produced + 1,
                job.num_validators,
                job.request_id
            );
            update_status(store.as_ref(), &job.request_id, RequestStatus::Failed).await;
            return;
        }

        tracing::debug!(
            "stored key {}/{} for request {}",
            produced + 1,
            job.num_validators,
            job.request_id
        );
    }

    update_status(store.as_ref(), &job.request_id, RequestStatus::Successful).await;
}

/// Applies a terminal status to the owning request.
///
/// A missing request row is logged and dropped: the job cannot recover it
/// and no caller is listening for the outcome. Pollers of that id observe
/// `started` indefinitely. A store failure here is likewise logged and
/// dropped.
async fn update_status(store: &dyn RecordStore, request_id: &str, status: RequestStatus) {
    match store.update_request_status(request_id, status).await {
        Ok(true) => tracing::info!("request {request_id} is {status}"),
        Ok(false) => {
            tracing::error!("request {request_id} vanished during status update to {status}");
        }
        Err(e) => tracing::error!("failed to update request {request_id} to {status}: {e}"),
    }
}
