//! # Provider Errors
//!
//! Error types for a single provider query.
//!
//! Every variant is one failed vote in a race: the resolver does not pick a
//! winner based on the cause, but it keeps the error for diagnostics.
//!
//! # Examples
//!
//! ```
//! use lookup_race::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::status(503, "service unavailable");
//! assert_eq!(error.status_code(), Some(503));
//!
//! let error = ProviderError::not_found("CEP 99999999 does not exist");
//! assert_eq!(error.status_code(), None);
//! ```

use thiserror::Error;

/// Error type for provider queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The shared deadline elapsed before the provider answered.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Non-2xx response not covered by a more specific variant.
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// The provider does not know the requested key.
    #[error("provider has no entry: {message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("provider response could not be decoded: {message}")]
    Decode {
        /// Error message.
        message: String,
    },

    /// The response decoded but carried none of the expected data.
    #[error("provider returned an empty response: {message}")]
    EmptyResponse {
        /// Error message.
        message: String,
    },

    /// The query observed cancellation before completing.
    #[error("provider query cancelled")]
    Cancelled,

    /// Internal error, e.g. the HTTP client could not be built.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an empty response error.
    #[must_use]
    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::EmptyResponse {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for provider queries.
pub type ProviderResult<T> = Result<T, ProviderError>;
