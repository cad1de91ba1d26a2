//! # Shared Provisioning Types
//!
//! This module defines the record types and JSON payloads used across the
//! provisioning system. It ensures the request facade, the job engine, and
//! the record store adhere to a consistent contract.
//!
//! ## Overview
//!
//! - [`RequestStatus`] - the request lifecycle state machine
//! - [`ProvisionRequest`] / [`ProvisionedKey`] - the two persisted record
//!   kinds
//! - [`NewKey`] - the insert payload for a key row (store assigns the rest)
//! - The `Create*` / `*Response` structs - JSON bodies served by the facade

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a provisioning request.
///
/// `Started` is the only initial state. `Successful` and `Failed` are
/// terminal: once a request reaches either, it never transitions again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Started,
    Successful,
    Failed,
}

impl RequestStatus {
    /// Whether this status is terminal and may never change again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Successful => "successful",
            Self::Failed => "failed",
        }
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One batch provisioning request, tracked by its correlation id.
///
/// All fields except `status` and `updated_at` are immutable after
/// creation.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ProvisionRequest {
    /// Correlation id handed back to the caller at submission time.
    pub request_id: String,
    /// Number of keys this request must produce. Always positive.
    pub num_validators: i64,
    /// Execution-layer address copied onto every generated key.
    pub fee_recipient: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    /// Rewritten on every status transition.
    pub updated_at: DateTime<Utc>,
}

impl ProvisionRequest {
    /// Builds a fresh request record in the `started` state.
    pub fn new(request_id: String, num_validators: u32, fee_recipient: &str) -> Self {
        let now = Utc::now();
        Self {
            request_id,
            num_validators: i64::from(num_validators),
            fee_recipient: fee_recipient.to_string(),
            status: RequestStatus::Started,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One generated credential belonging to exactly one request.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ProvisionedKey {
    /// Store-assigned, insertion-ordered id.
    pub key_id: i64,
    pub request_id: String,
    /// Opaque generated secret, hex-encoded.
    pub key: String,
    /// Copied from the owning request at generation time, never re-read.
    pub fee_recipient: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a key row; `key_id` and `created_at` are assigned by
/// the store.
#[derive(Clone, Debug)]
pub struct NewKey {
    pub request_id: String,
    pub key: String,
    pub fee_recipient: String,
}

/// Body of `POST /validators`.
///
/// `num_validators` is deserialized as a signed integer so that
/// non-positive values reach the validation layer and produce a 422 rather
/// than a deserialization failure.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateValidatorsRequest {
    pub num_validators: i64,
    pub fee_recipient: String,
}

/// Acknowledgement returned by `POST /validators` with status 202.
#[derive(Clone, Debug, Serialize)]
pub struct CreateValidatorsResponse {
    pub request_id: String,
    pub message: String,
}

/// Body of `GET /validators/{request_id}`.
///
/// `keys` is present only for successful requests; `message` only for
/// failed ones.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidatorStatusResponse {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `GET /health`.
#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_is_the_only_non_terminal_status() {
        assert!(!RequestStatus::Started.is_terminal());
        assert!(RequestStatus::Successful.is_terminal());
        assert!(RequestStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Started).unwrap(),
            "\"started\""
        );
        assert_eq!(RequestStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn new_request_starts_in_started() {
        let request = ProvisionRequest::new("abc".to_string(), 3, "0xfee");
        assert_eq!(request.status, RequestStatus::Started);
        assert_eq!(request.num_validators, 3);
        assert_eq!(request.created_at, request.updated_at);
    }

    #[test]
    fn status_body_omits_absent_fields() {
        let report = ValidatorStatusResponse {
            status: RequestStatus::Started,
            keys: None,
            message: None,
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            "{\"status\":\"started\"}"
        );
    }
}
