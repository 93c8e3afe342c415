//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! - [`QuoteSink`]: the write-only storage collaborator of a pipeline
//! - [`QuoteRepository`]: a sink that can also be read back
//!
//! # Examples
//!
//! ```ignore
//! use lookup_race::infrastructure::persistence::traits::QuoteRepository;
//!
//! async fn show_latest(repo: &impl QuoteRepository) {
//!     if let Some(quote) = repo.latest().await.unwrap() {
//!         println!("{}", quote);
//!     }
//! }
//! ```

use crate::domain::entities::ExchangeQuote;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a connection error.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Write-only destination for fetched quotes.
///
/// Implementations may apply their own timeout; callers running under a
/// [`BoundedPipeline`](crate::application::services::BoundedPipeline)
/// are additionally bounded by the persist budget.
#[async_trait]
pub trait QuoteSink: Send + Sync + fmt::Debug {
    /// Stores a quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the quote cannot be stored.
    async fn save(&self, quote: &ExchangeQuote) -> RepositoryResult<()>;
}

/// Queryable quote history.
#[async_trait]
pub trait QuoteRepository: QuoteSink {
    /// Returns the most recently saved quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn latest(&self) -> RepositoryResult<Option<ExchangeQuote>>;

    /// Returns the number of saved quotes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn count(&self) -> RepositoryResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            RepositoryError::query("no such table").to_string(),
            "Query error: no such table"
        );
        assert!(RepositoryError::connection("refused").is_connection());
    }

    #[test]
    fn io_error_converts() {
        let err: RepositoryError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, RepositoryError::Io(_)));
    }
}
