//! # REST Handlers
//!
//! Request handlers, response bodies and error mapping.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::RaceError;
use crate::application::use_cases::{FetchQuoteUseCase, LookupAddressUseCase};
use crate::domain::entities::Address;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteQuoteRepository;
use crate::infrastructure::providers::HttpClient;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// CEP lookup.
    pub lookup_address: Arc<LookupAddressUseCase>,
    /// Quote fetch and store.
    pub fetch_quote: Arc<FetchQuoteUseCase>,
}

impl AppState {
    /// Builds the server state: provider clients plus the SQLite quote
    /// store, with its table created.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for invalid settings,
    /// `ApplicationError::Provider` if an HTTP client cannot be built, and
    /// `ApplicationError::Repository` if the database cannot be opened.
    pub async fn from_config(config: &AppConfig) -> ApplicationResult<Self> {
        config.validate()?;

        let repo =
            SqliteQuoteRepository::connect(&config.database.url, config.database.max_connections)
                .await?;
        repo.ensure_schema().await?;

        let cep_client = HttpClient::new(config.cep.timeout_ms)?;
        let quote_client = HttpClient::new(config.quote.fetch_timeout_ms)?;

        Ok(Self {
            lookup_address: Arc::new(LookupAddressUseCase::from_config(&config.cep, cep_client)),
            fetch_quote: Arc::new(FetchQuoteUseCase::from_config(
                &config.quote,
                quote_client,
                Arc::new(repo),
            )),
        })
    }
}

/// Body of `GET /cotacao`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidResponse {
    /// The bid, as a decimal string.
    pub bid: String,
}

/// Body of `GET /cep/{cep}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    /// CEP formatted as `00000-000`.
    pub cep: String,
    /// Street.
    pub street: String,
    /// District.
    pub district: String,
    /// City.
    pub city: String,
    /// State abbreviation.
    pub state: String,
    /// Provider that answered.
    pub source: String,
    /// Time until the winning answer.
    pub elapsed_ms: u64,
}

impl AddressResponse {
    fn new(address: &Address, elapsed_ms: u64) -> Self {
        Self {
            cep: address.cep().formatted(),
            street: address.street().to_string(),
            district: address.district().to_string(),
            city: address.city().to_string(),
            state: address.state().to_string(),
            source: address.source().to_string(),
            elapsed_ms,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

/// An application error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let status = match &err {
            ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
            ApplicationError::NoAnswer { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApplicationError::Race(RaceError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// `GET /cotacao`
pub async fn get_quote(State(state): State<AppState>) -> Result<Json<BidResponse>, ApiError> {
    let fetched = state
        .fetch_quote
        .execute()
        .await
        .inspect_err(|e| warn!(error = %e, "GET /cotacao failed"))?;

    debug!(persisted = fetched.persisted, "GET /cotacao served");
    Ok(Json(BidResponse {
        bid: fetched.quote.bid().to_string(),
    }))
}

/// `GET /cep/{cep}`
pub async fn get_address(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    let winner = state.lookup_address.execute(&cep).await?;
    let elapsed_ms = u64::try_from(winner.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(Json(AddressResponse::new(winner.value(), elapsed_ms)))
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
