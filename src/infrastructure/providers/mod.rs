//! # Providers
//!
//! External data sources that can answer the same query as their peers.
//!
//! ## Contract
//!
//! - [`ProviderQuery`]: one round-trip to one provider
//! - [`ProviderOutcome`]: success or failure of one dispatched query
//! - [`QueryContext`]: shared deadline and cancellation signal
//!
//! ## Available Providers
//!
//! - [`BrasilApiProvider`]: CEP lookup via BrasilAPI
//! - [`ViaCepProvider`]: CEP lookup via ViaCEP
//! - [`AwesomeApiProvider`]: USD-BRL and other pairs via AwesomeAPI
//! - [`QuoteServerProvider`]: this crate's own `/cotacao` endpoint

pub mod awesome_api;
pub mod brasil_api;
pub mod context;
pub mod error;
pub mod http_client;
pub mod quote_server;
pub mod traits;
pub mod via_cep;

pub use awesome_api::AwesomeApiProvider;
pub use brasil_api::BrasilApiProvider;
pub use context::QueryContext;
pub use error::{ProviderError, ProviderResult};
pub use http_client::HttpClient;
pub use quote_server::QuoteServerProvider;
pub use traits::{ProviderOutcome, ProviderQuery};
pub use via_cep::ViaCepProvider;
