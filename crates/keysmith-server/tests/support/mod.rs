//! Shared fixtures and test doubles for the integration tests.
//!
//! The doubles plug into the `RecordStore` / `KeyGenerator` trait seams so
//! the tests can control ordering, block generation mid-batch, or inject
//! faults deterministically.
#![allow(dead_code)]

use async_trait::async_trait;
use keysmith_core::keygen::KeyGenerator;
use keysmith_core::store::RecordStore;
use keysmith_core::{Error, NewKey, ProvisionRequest, ProvisionedKey, RequestStatus};
use keysmith_server::server::store::SqliteStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};

pub const FEE_RECIPIENT: &str = "0x1234567890abcdef1234567890abcdef12345678";

pub async fn memory_store() -> Arc<SqliteStore> {
    Arc::new(
        SqliteStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store"),
    )
}

/// Polls until the request reaches a terminal status.
pub async fn wait_terminal(store: &dyn RecordStore, request_id: &str) -> RequestStatus {
    timeout(Duration::from_secs(5), async {
        loop {
            let request = store
                .get_request(request_id)
                .await
                .expect("get_request")
                .expect("request exists");
            if request.status.is_terminal() {
                return request.status;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("request never reached a terminal status")
}

/// Produces "key-0", "key-1", ... in call order, with no latency.
#[derive(Default)]
pub struct ScriptedKeyGenerator {
    next: AtomicUsize,
}

#[async_trait]
impl KeyGenerator for ScriptedKeyGenerator {
    async fn generate(&self) -> Result<String, Error> {
        Ok(format!("key-{}", self.next.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Blocks each call until the test releases a permit.
pub struct GatedKeyGenerator {
    pub gate: Arc<Semaphore>,
    next: AtomicUsize,
}

impl GatedKeyGenerator {
    pub fn new(gate: Arc<Semaphore>) -> Self {
        Self {
            gate,
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl KeyGenerator for GatedKeyGenerator {
    async fn generate(&self) -> Result<String, Error> {
        let permit = self.gate.acquire().await.map_err(|_| Error::Generation {
            context: "gate closed".to_string(),
        })?;
        permit.forget();
        Ok(format!("key-{}", self.next.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Fails every call.
pub struct FailingKeyGenerator;

#[async_trait]
impl KeyGenerator for FailingKeyGenerator {
    async fn generate(&self) -> Result<String, Error> {
        Err(Error::Generation {
            context: "backend offline".to_string(),
        })
    }
}

/// Store wrapper whose `create_key` fails from the nth write on
/// (1-based). Everything else delegates to the wrapped store.
pub struct FlakyStore {
    pub inner: Arc<SqliteStore>,
    fail_from: usize,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<SqliteStore>, fail_from: usize) -> Self {
        Self {
            inner,
            fail_from,
            writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn create_request(&self, request: &ProvisionRequest) -> Result<(), Error> {
        self.inner.create_request(request).await
    }

    async fn get_request(&self, request_id: &str) -> Result<Option<ProvisionRequest>, Error> {
        self.inner.get_request(request_id).await
    }

    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<bool, Error> {
        self.inner.update_request_status(request_id, status).await
    }

    async fn create_key(&self, key: &NewKey) -> Result<(), Error> {
        if self.writes.fetch_add(1, Ordering::SeqCst) + 1 >= self.fail_from {
            return Err(Error::Persistence {
                context: "disk full".to_string(),
            });
        }
        self.inner.create_key(key).await
    }

    async fn list_keys_for_request(&self, request_id: &str) -> Result<Vec<ProvisionedKey>, Error> {
        self.inner.list_keys_for_request(request_id).await
    }

    async fn health_check(&self) -> Result<(), Error> {
        self.inner.health_check().await
    }
}

/// Store whose `create_request` signals entry and then blocks until the
/// test releases it. Everything else delegates to the wrapped store.
pub struct GatedStore {
    pub inner: Arc<SqliteStore>,
    pub entered: Arc<Semaphore>,
    pub release: Arc<Semaphore>,
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn create_request(&self, request: &ProvisionRequest) -> Result<(), Error> {
        self.entered.add_permits(1);
        let permit = self.release.acquire().await.map_err(|_| Error::Persistence {
            context: "gate closed".to_string(),
        })?;
        permit.forget();
        self.inner.create_request(request).await
    }

    async fn get_request(&self, request_id: &str) -> Result<Option<ProvisionRequest>, Error> {
        self.inner.get_request(request_id).await
    }

    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<bool, Error> {
        self.inner.update_request_status(request_id, status).await
    }

    async fn create_key(&self, key: &NewKey) -> Result<(), Error> {
        self.inner.create_key(key).await
    }

    async fn list_keys_for_request(&self, request_id: &str) -> Result<Vec<ProvisionedKey>, Error> {
        self.inner.list_keys_for_request(request_id).await
    }

    async fn health_check(&self) -> Result<(), Error> {
        self.inner.health_check().await
    }
}

/// Store that rejects every operation, for exercising synchronous
/// submission failure.
pub struct RejectingStore;

#[async_trait]
impl RecordStore for RejectingStore {
    async fn create_request(&self, _request: &ProvisionRequest) -> Result<(), Error> {
        Err(Error::Persistence {
            context: "store unavailable".to_string(),
        })
    }

    async fn get_request(&self, _request_id: &str) -> Result<Option<ProvisionRequest>, Error> {
        Err(Error::Persistence {
            context: "store unavailable".to_string(),
        })
    }

    async fn update_request_status(
        &self,
        _request_id: &str,
        _status: RequestStatus,
    ) -> Result<bool, Error> {
        Err(Error::Persistence {
            context: "store unavailable".to_string(),
        })
    }

    async fn create_key(&self, _key: &NewKey) -> Result<(), Error> {
        Err(Error::Persistence {
            context: "store unavailable".to_string(),
        })
    }

    async fn list_keys_for_request(
        &self,
        _request_id: &str,
    ) -> Result<Vec<ProvisionedKey>, Error> {
        Err(Error::Persistence {
            context: "store unavailable".to_string(),
        })
    }

    async fn health_check(&self) -> Result<(), Error> {
        Err(Error::Persistence {
            context: "store unavailable".to_string(),
        })
    }
}
