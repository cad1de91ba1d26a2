//! SQLite-backed record store.
//!
//! Request and key records live in two tables provisioned at connect time.
//! Every operation is a single statement; the store never wraps a request
//! and its keys in one transaction, because each write is its own atomic
//! unit in the provisioning lifecycle.

use async_trait::async_trait;
use chrono::Utc;
use core::time::Duration;
use keysmith_core::store::RecordStore;
use keysmith_core::{Error, NewKey, ProvisionRequest, ProvisionedKey, RequestStatus};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Durable storage for request and key records, shared by every worker
/// task and the status query path.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Opens the database (creating it if missing) and provisions the
    /// schema.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let opts = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under
            // concurrent access.
            .busy_timeout(Duration::from_secs(5));

        // SQLite permits limited write concurrency; a single pooled
        // connection avoids persistent "database is locked" failures when
        // worker tasks and the status query path hit the store at once.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS validator_requests (
                request_id     TEXT PRIMARY KEY,
                num_validators INTEGER NOT NULL,
                fee_recipient  TEXT NOT NULL,
                status         TEXT NOT NULL DEFAULT 'started',
                created_at     TEXT NOT NULL,
                updated_at     TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS validator_keys (
                key_id        INTEGER PRIMARY KEY AUTOINCREMENT,
                request_id    TEXT NOT NULL,
                key           TEXT NOT NULL,
                fee_recipient TEXT NOT NULL,
                created_at    TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_validator_keys_request_id
             ON validator_keys (request_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create_request(&self, request: &ProvisionRequest) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO validator_requests
                (request_id, num_validators, fee_recipient, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&request.request_id)
        .bind(request.num_validators)
        .bind(&request.fee_recipient)
        .bind(request.status)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_request(&self, request_id: &str) -> Result<Option<ProvisionRequest>, Error> {
        let request = sqlx::query_as::<_, ProvisionRequest>(
            "SELECT request_id, num_validators, fee_recipient, status, created_at, updated_at
             FROM validator_requests
             WHERE request_id = ?1",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE validator_requests
             SET status = ?1, updated_at = ?2
             WHERE request_id = ?3",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(request_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_key(&self, key: &NewKey) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO validator_keys (request_id, key, fee_recipient, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&key.request_id)
        .bind(&key.key)
        .bind(&key.fee_recipient)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_keys_for_request(&self, request_id: &str) -> Result<Vec<ProvisionedKey>, Error> {
        let keys = sqlx::query_as::<_, ProvisionedKey>(
            "SELECT key_id, request_id, key, fee_recipient, created_at
             FROM validator_keys
             WHERE request_id = ?1
             ORDER BY key_id",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
