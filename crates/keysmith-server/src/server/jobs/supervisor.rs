//! Submission handoff for the provisioning engine.
//!
//! This module defines the [`JobSupervisor`], which accepts validated
//! batch requests, durably creates their request records, and spawns
//! exactly one background worker task per request. Worker tasks are
//! tracked so shutdown can drain them, and they share a
//! [`CancellationToken`] so a drain that overruns its window can be cut
//! short.

use crate::server::jobs::worker::{self, ProvisionJob};
use core::time::Duration;
use keysmith_core::Error;
use keysmith_core::keygen::KeyGenerator;
use keysmith_core::store::RecordStore;
use keysmith_core::types::ProvisionRequest;
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

/// Accepts provisioning requests and hands each off to an independent
/// background worker task.
pub struct JobSupervisor {
    store: Arc<dyn RecordStore>,
    keygen: Arc<dyn KeyGenerator>,
    jobs: TaskTracker,
    shutdown_token: CancellationToken,
}

impl JobSupervisor {
    pub fn new(store: Arc<dyn RecordStore>, keygen: Arc<dyn KeyGenerator>) -> Self {
        Self {
            store,
            keygen,
            jobs: TaskTracker::new(),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Accepts a batch request and returns its correlation id.
    ///
    /// The request record is durably created with `status = started`
    /// before this returns. The per-key work runs on an independent task
    /// that is never awaited here, so the latency of `submit` does not
    /// depend on `num_validators`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service is shutting down (no job is started).
    /// - The initial record write fails (no job is started).
    pub async fn submit(&self, num_validators: u32, fee_recipient: &str) -> Result<String, Error> {
        if self.jobs.is_closed() {
            return Err(Error::Shutdown);
        }

        let request =
            ProvisionRequest::new(Uuid::new_v4().to_string(), num_validators, fee_recipient);
        let request_id = request.request_id.clone();

        // A failure here propagates to the caller; no orphaned background
        // work is started.
        self.store.create_request(&request).await?;

        // The tracker may have closed while the record write was in
        // flight. A task spawned now could land after the drain finished,
        // so refuse instead; the record stays in `started`, the same
        // state a cancelled job leaves behind.
        if self.jobs.is_closed() {
            tracing::warn!("request {request_id} refused, shutdown began during submission");
            return Err(Error::Shutdown);
        }

        tracing::info!("accepted request {request_id} for {num_validators} validator keys");

        let job = ProvisionJob {
            request_id: request_id.clone(),
            num_validators,
            fee_recipient: fee_recipient.to_string(),
        };
        self.jobs.spawn(worker::run(
            job,
            Arc::clone(&self.store),
            Arc::clone(&self.keygen),
            self.shutdown_token.child_token(),
        ));

        Ok(request_id)
    }

    /// Gracefully shuts down the provisioning engine.
    ///
    /// New submissions are refused immediately. In-flight jobs get `grace`
    /// to reach a terminal status; any still running afterwards are
    /// cancelled at their next generation suspension point and leave their
    /// request in `started` with whatever keys were already persisted.
    pub async fn shutdown(&self, grace: Duration) {
        // Phase 1: refuse new submissions.
        self.jobs.close();

        // Phase 2: wait for in-flight jobs to drain.
        tracing::info!("Draining in-flight provisioning jobs ({} active)", self.jobs.len());
        if timeout(grace, self.jobs.wait()).await.is_err() {
            // Phase 3: cancel whatever is left.
            tracing::warn!(
                "Graceful drain timed out ({} jobs still active), cancelling",
                self.jobs.len()
            );
            self.shutdown_token.cancel();
            self.jobs.wait().await;
        }

        tracing::info!("Provisioning engine shutdown complete");
    }
}
