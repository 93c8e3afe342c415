//! # Fetch Quote Use Case
//!
//! Server side of the quote flow: fetch the current bid from the upstream
//! provider, then store it, each stage under its own budget.
//!
//! # Durability
//!
//! A quote that was fetched but could not be stored is still served unless
//! `require_durable` is set; the failure is logged either way.

use crate::application::error::ApplicationResult;
use crate::application::services::{BoundedPipeline, PipelineConfig, PipelineError};
use crate::domain::entities::ExchangeQuote;
use crate::infrastructure::config::QuoteConfig;
use crate::infrastructure::persistence::QuoteSink;
use crate::infrastructure::providers::{AwesomeApiProvider, HttpClient, ProviderQuery};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A quote served by [`FetchQuoteUseCase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedQuote {
    /// The fetched quote.
    pub quote: ExchangeQuote,
    /// Whether it reached storage within budget.
    pub persisted: bool,
}

/// Use case for fetching and storing the current quote.
#[derive(Debug, Clone)]
pub struct FetchQuoteUseCase {
    provider: Arc<dyn ProviderQuery<ExchangeQuote>>,
    sink: Arc<dyn QuoteSink>,
    pipeline: BoundedPipeline,
    pair: String,
    require_durable: bool,
}

impl FetchQuoteUseCase {
    /// Creates a new use case.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ProviderQuery<ExchangeQuote>>,
        sink: Arc<dyn QuoteSink>,
        pipeline: BoundedPipeline,
        pair: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            sink,
            pipeline,
            pair: pair.into(),
            require_durable: false,
        }
    }

    /// Creates the use case fetching from AwesomeAPI.
    #[must_use]
    pub fn from_config(config: &QuoteConfig, client: HttpClient, sink: Arc<dyn QuoteSink>) -> Self {
        let provider = Arc::new(AwesomeApiProvider::new(&config.awesome_api_url, client));
        let pipeline = BoundedPipeline::from_config(PipelineConfig {
            fetch_timeout_ms: config.fetch_timeout_ms,
            persist_timeout_ms: config.persist_timeout_ms,
        });
        Self::new(provider, sink, pipeline, &config.pair).with_require_durable(config.require_durable)
    }

    /// Fails requests whose quote could not be stored.
    #[must_use]
    pub fn with_require_durable(mut self, require_durable: bool) -> Self {
        self.require_durable = require_durable;
        self
    }

    /// Returns the quoted pair.
    #[must_use]
    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// Fetches the current quote and stores it.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Fetch` if the provider failed or ran out of time
    /// - `ApplicationError::Persist` if storing failed and durability is
    ///   required
    #[instrument(skip(self), fields(pair = %self.pair))]
    pub async fn execute(&self) -> ApplicationResult<FetchedQuote> {
        let provider = &self.provider;
        let sink = &self.sink;
        let pair = self.pair.as_str();

        let result = self
            .pipeline
            .run(
                |ctx| async move { provider.query(pair, &ctx).await },
                |quote: ExchangeQuote, _ctx| async move { sink.save(&quote).await },
            )
            .await;

        match result {
            Ok(quote) => {
                info!(bid = %quote.bid(), source = %quote.source(), "Quote fetched and stored");
                Ok(FetchedQuote {
                    quote,
                    persisted: true,
                })
            }
            Err(PipelineError::Persist { value, failure }) if !self.require_durable => {
                warn!(error = %failure, bid = %value.bid(), "Quote not stored, serving anyway");
                Ok(FetchedQuote {
                    quote: value,
                    persisted: false,
                })
            }
            Err(err) => {
                warn!(error = %err, "Quote request failed");
                Err(err.into())
            }
        }
    }
}
