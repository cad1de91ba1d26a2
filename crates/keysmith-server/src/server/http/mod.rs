//! HTTP request facade.
//!
//! The facade owns input validation and the route table; everything it
//! accepts is handed to the [`JobSupervisor`], and everything it reports
//! comes from the record store's read paths.

pub mod routes;

use crate::server::jobs::JobSupervisor;
use axum::Router;
use axum::routing::{get, post};
use keysmith_core::store::RecordStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub supervisor: Arc<JobSupervisor>,
    pub store: Arc<dyn RecordStore>,
    pub max_keys_per_request: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/validators", post(routes::create_validators))
        .route("/validators/{request_id}", get(routes::validator_status))
        .route("/health", get(routes::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
