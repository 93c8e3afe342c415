//! # REST Routes
//!
//! Router construction.

use crate::api::rest::handlers::{AppState, get_address, get_quote, health_check};
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Creates the router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/cotacao", get(get_quote))
        .route("/cep/{cep}", get(get_address))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
