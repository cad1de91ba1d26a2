//! Key generation boundary.
//!
//! The worker invokes a [`KeyGenerator`] once per key. The mock
//! implementation stands in for a real cryptographic or external signing
//! backend: it carries a fixed per-call latency and never fails, but the
//! trait is fallible because a real backend would be.

use crate::Error;
use async_trait::async_trait;
use core::time::Duration;
use rand::RngCore;

#[async_trait]
pub trait KeyGenerator: Send + Sync {
    /// Produces one opaque key value.
    async fn generate(&self) -> Result<String, Error>;
}

/// Mock validator key generator.
///
/// Sleeps a fixed latency per call to simulate the cost of a real
/// derivation, then returns 16 random bytes hex-encoded (32 characters).
#[derive(Clone, Debug)]
pub struct MockKeyGenerator {
    latency: Duration,
}

impl MockKeyGenerator {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(20);

    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockKeyGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait]
impl KeyGenerator for MockKeyGenerator {
    async fn generate(&self) -> Result<String, Error> {
        tokio::time::sleep(self.latency).await;

        let mut raw = [0_u8; 16];
        rand::rng().fill_bytes(&mut raw);
        let key = hex::encode(raw);

        tracing::debug!("generated key {}...", &key[..8]);
        Ok(key)
    }
}
