//! # Provider Query Trait
//!
//! Port definition for provider integrations.
//!
//! This module defines the [`ProviderQuery`] trait every provider
//! implements, and the [`ProviderOutcome`] each dispatched query produces.
//!
//! # Examples
//!
//! ```ignore
//! use lookup_race::infrastructure::providers::traits::ProviderQuery;
//! use lookup_race::infrastructure::providers::{ProviderResult, QueryContext};
//!
//! #[derive(Debug)]
//! struct MyProvider { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl ProviderQuery<Address> for MyProvider {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use std::fmt;

/// Trait defining a single round-trip to one external provider.
///
/// Implementations own their wire format and decode it into the
/// normalized `T`.
///
/// # Cancellation
///
/// Implementations must bound their I/O by `ctx.deadline()` and stop
/// promptly once `ctx` is cancelled. The race resolver also drops the
/// query future when the race ends, so an implementation that only awaits
/// cancel-safe futures (such as reqwest requests) needs nothing more.
///
/// # Error Handling
///
/// Transport errors, non-2xx statuses, undecodable and empty bodies are
/// all reported as [`ProviderError`]. Implementations must never panic on
/// malformed input.
#[async_trait]
pub trait ProviderQuery<T>: Send + Sync + fmt::Debug {
    /// Returns the provider ID, used as the `source` tag of results.
    fn provider_id(&self) -> &ProviderId;

    /// Queries the provider for `key`.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Timeout` - The deadline in `ctx` elapsed
    /// - `ProviderError::Cancelled` - `ctx` was cancelled
    /// - `ProviderError::NotFound` - The provider does not know `key`
    /// - `ProviderError::Decode` / `EmptyResponse` - Malformed body
    async fn query(&self, key: &str, ctx: &QueryContext) -> ProviderResult<T>;
}

/// Outcome of one dispatched provider query.
///
/// A cancelled query produces no outcome at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome<T> {
    /// The provider answered with a normalized value.
    Success {
        /// The answering provider.
        provider: ProviderId,
        /// The normalized value.
        value: T,
    },
    /// The provider failed.
    Failure {
        /// The failing provider.
        provider: ProviderId,
        /// Why it failed.
        error: ProviderError,
    },
}

impl<T> ProviderOutcome<T> {
    /// Builds an outcome from a provider's result.
    #[must_use]
    pub fn from_result(provider: ProviderId, result: ProviderResult<T>) -> Self {
        match result {
            Ok(value) => Self::Success { provider, value },
            Err(error) => Self::Failure { provider, error },
        }
    }

    /// Returns the provider that produced this outcome.
    #[must_use]
    pub fn provider(&self) -> &ProviderId {
        match self {
            Self::Success { provider, .. } | Self::Failure { provider, .. } => provider,
        }
    }

    /// Returns true if this is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ok_is_success() {
        let outcome = ProviderOutcome::from_result(ProviderId::new("a"), Ok(7));
        assert!(outcome.is_success());
        assert_eq!(outcome.provider().as_str(), "a");
    }

    #[test]
    fn from_err_is_failure() {
        let outcome: ProviderOutcome<u8> = ProviderOutcome::from_result(
            ProviderId::new("b"),
            Err(ProviderError::connection("refused")),
        );
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome,
            ProviderOutcome::Failure {
                error: ProviderError::Connection { .. },
                ..
            }
        ));
    }
}
