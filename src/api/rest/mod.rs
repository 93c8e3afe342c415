//! # REST API
//!
//! HTTP endpoints using axum.
//!
//! # Endpoints
//!
//! - `GET /cotacao` - Fetch, store and return the current bid
//! - `GET /cep/{cep}` - Resolve a CEP by racing address providers
//! - `GET /health` - Health check endpoint
//!
//! # Status Codes
//!
//! | Condition                         | Status |
//! |-----------------------------------|--------|
//! | Invalid CEP                       | 400    |
//! | Quote fetch failed                | 500    |
//! | Quote not stored, durability on   | 500    |
//! | No provider answered in time      | 504    |
//!
//! # Usage
//!
//! ```ignore
//! use lookup_race::api::rest::{create_router, AppState};
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AddressResponse, ApiError, AppState, BidResponse, ErrorResponse, HealthResponse};
pub use routes::create_router;
