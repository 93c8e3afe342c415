//! # Export Quote Use Case
//!
//! Client side of the quote flow: ask the quote server for the current
//! bid, then write it to a file. Both stages are bounded; a quote that
//! could not be written is an error.

use crate::application::error::ApplicationResult;
use crate::application::services::BoundedPipeline;
use crate::domain::entities::ExchangeQuote;
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::persistence::{QuoteFileSink, QuoteSink};
use crate::infrastructure::providers::{HttpClient, ProviderQuery, QuoteServerProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Use case for exporting the server's quote.
#[derive(Debug, Clone)]
pub struct ExportQuoteUseCase {
    source: Arc<dyn ProviderQuery<ExchangeQuote>>,
    sink: Arc<dyn QuoteSink>,
    pipeline: BoundedPipeline,
    pair: String,
}

impl ExportQuoteUseCase {
    /// Creates a new use case.
    #[must_use]
    pub fn new(
        source: Arc<dyn ProviderQuery<ExchangeQuote>>,
        sink: Arc<dyn QuoteSink>,
        pipeline: BoundedPipeline,
        pair: impl Into<String>,
    ) -> Self {
        Self {
            source,
            sink,
            pipeline,
            pair: pair.into(),
        }
    }

    /// Creates the use case reading from the configured server and writing
    /// the configured output file.
    #[must_use]
    pub fn from_config(config: &ClientConfig, client: HttpClient, pair: impl Into<String>) -> Self {
        let source = Arc::new(QuoteServerProvider::new(&config.server_url, client));
        let sink = Arc::new(QuoteFileSink::new(&config.output));
        let pipeline = BoundedPipeline::new(
            Duration::from_millis(config.timeout_ms),
            Duration::from_millis(config.write_timeout_ms),
        );
        Self::new(source, sink, pipeline, pair)
    }

    /// Fetches the quote and writes it out.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Fetch` if the server failed or ran out of time
    /// - `ApplicationError::Persist` if the quote could not be written
    #[instrument(skip(self), fields(pair = %self.pair))]
    pub async fn execute(&self) -> ApplicationResult<ExchangeQuote> {
        let source = &self.source;
        let sink = &self.sink;
        let pair = self.pair.as_str();

        let quote = self
            .pipeline
            .run(
                |ctx| async move { source.query(pair, &ctx).await },
                |quote: ExchangeQuote, _ctx| async move { sink.save(&quote).await },
            )
            .await
            .inspect_err(|e| warn!(error = %e, "Quote export failed"))?;

        info!(bid = %quote.bid(), "Quote exported");
        Ok(quote)
    }
}
