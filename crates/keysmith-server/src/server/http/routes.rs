use super::AppState;
use crate::server::jobs;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use keysmith_core::{
    CreateValidatorsRequest, CreateValidatorsResponse, Error, HealthResponse,
    ValidatorStatusResponse,
};

/// Accepts a batch provisioning request.
///
/// Returns `202 Accepted` with the correlation id as soon as the request
/// record is durably created; the per-key work runs in the background.
pub async fn create_validators(
    State(state): State<AppState>,
    Json(body): Json<CreateValidatorsRequest>,
) -> Result<(StatusCode, Json<CreateValidatorsResponse>), Error> {
    validate_count(body.num_validators, state.max_keys_per_request)?;
    validate_fee_recipient(&body.fee_recipient)?;

    let request_id = state
        .supervisor
        .submit(body.num_validators as u32, &body.fee_recipient)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateValidatorsResponse {
            request_id,
            message: "Validator creation in progress".to_string(),
        }),
    ))
}

/// Reports the status of a request by its correlation id, including the
/// ordered key list once the request is successful.
pub async fn validator_status(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ValidatorStatusResponse>, Error> {
    let report = jobs::status_report(state.store.as_ref(), &request_id).await?;
    Ok(Json(report))
}

/// Service and database connectivity probe.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, Error> {
    state.store.health_check().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
    }))
}

fn validate_count(num_validators: i64, max_keys_per_request: u32) -> Result<(), Error> {
    if num_validators <= 0 {
        return Err(Error::Validation {
            reason: "num_validators must be greater than 0".to_string(),
        });
    }
    if num_validators > i64::from(max_keys_per_request) {
        return Err(Error::Validation {
            reason: format!(
                "num_validators {num_validators} exceeds maximum allowed ({max_keys_per_request})"
            ),
        });
    }
    Ok(())
}

/// An execution-layer fee recipient is `0x` followed by 40 hex characters.
fn validate_fee_recipient(address: &str) -> Result<(), Error> {
    let valid = matches!(
        address.strip_prefix("0x"),
        Some(hex) if hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
    );
    if valid {
        Ok(())
    } else {
        Err(Error::Validation {
            reason: "Invalid Ethereum address format. Must be 0x followed by 40 hex characters."
                .to_string(),
        })
    }
}
