//! # Quote File Sink
//!
//! Writes the latest quote to a text file as `{label}: {bid}`, e.g.
//! `Dólar: 5.1234` for `USD-BRL`.
//!
//! Each save replaces the file contents; the file only ever holds the most
//! recent quote.

use crate::domain::entities::ExchangeQuote;
use crate::infrastructure::persistence::traits::{QuoteSink, RepositoryResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// [`QuoteSink`] backed by a single text file.
#[derive(Debug, Clone)]
pub struct QuoteFileSink {
    path: PathBuf,
}

impl QuoteFileSink {
    /// Creates a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuoteSink for QuoteFileSink {
    async fn save(&self, quote: &ExchangeQuote) -> RepositoryResult<()> {
        tokio::fs::write(&self.path, quote.to_string()).await?;
        debug!(path = %self.path.display(), bid = %quote.bid(), "Quote written");
        Ok(())
    }
}
