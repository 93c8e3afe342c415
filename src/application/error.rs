//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case
//! execution: bad input, races nobody won, pipeline stages that failed,
//! and infrastructure errors.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(String)          - Input validation failures
//! ├── NoAnswer { reason, .. }     - No provider answered in time
//! ├── Race(RaceError)             - Other race failures
//! ├── Fetch(StageFailure)         - Pipeline fetch stage failed
//! ├── Persist(StageFailure)       - Pipeline persist stage failed
//! ├── Provider(ProviderError)     - Provider setup failures
//! ├── Repository(RepositoryError) - Storage failures
//! └── Configuration(ConfigError)  - Invalid configuration
//! ```
//!
//! # Examples
//!
//! ```
//! use lookup_race::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("CEP must have 8 digits");
//! assert!(err.is_validation());
//! ```

use crate::application::services::{NoAnswerReason, PipelineError, RaceError, StageFailure};
use crate::domain::value_objects::InvalidCepError;
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::providers::ProviderError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// No provider produced a successful answer before the deadline.
    ///
    /// Timing out and every provider failing read the same to callers.
    #[error("no provider answered in time")]
    NoAnswer {
        /// Whether the race timed out or ran out of providers.
        reason: NoAnswerReason,
        /// Number of failed provider queries.
        failed: usize,
    },

    /// The race could not run or was cancelled.
    #[error("race error: {0}")]
    Race(RaceError),

    /// The fetch stage of a pipeline failed.
    #[error("fetch failed: {0}")]
    Fetch(#[source] StageFailure),

    /// The persist stage of a pipeline failed.
    #[error("persist failed: {0}")]
    Persist(#[source] StageFailure),

    /// A provider could not be set up.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Storage failed outside a pipeline.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if no provider answered in time.
    #[must_use]
    pub fn is_no_answer(&self) -> bool {
        matches!(self, Self::NoAnswer { .. })
    }

    /// Returns true if a pipeline stage exceeded its budget.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::NoAnswer { reason, .. } => *reason == NoAnswerReason::TimedOut,
            Self::Fetch(failure) | Self::Persist(failure) => failure.is_timeout(),
            _ => false,
        }
    }
}

impl From<InvalidCepError> for ApplicationError {
    fn from(err: InvalidCepError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RaceError> for ApplicationError {
    fn from(err: RaceError) -> Self {
        match err {
            RaceError::NoAnswer { reason, failures } => Self::NoAnswer {
                reason,
                failed: failures.len(),
            },
            other => Self::Race(other),
        }
    }
}

impl<V> From<PipelineError<V>> for ApplicationError {
    fn from(err: PipelineError<V>) -> Self {
        match err {
            PipelineError::Fetch(failure) => Self::Fetch(failure),
            PipelineError::Persist { failure, .. } => Self::Persist(failure),
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{PipelineStage, ProviderFailure};
    use crate::domain::value_objects::{Cep, ProviderId};
    use std::time::Duration;

    #[test]
    fn invalid_cep_is_validation() {
        let err: ApplicationError = Cep::parse("123").unwrap_err().into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("123"));
    }

    #[test]
    fn no_answer_keeps_reason_and_hides_it_from_message() {
        let timed_out: ApplicationError = RaceError::NoAnswer {
            reason: NoAnswerReason::TimedOut,
            failures: vec![],
        }
        .into();
        let all_failed: ApplicationError = RaceError::NoAnswer {
            reason: NoAnswerReason::AllFailed,
            failures: vec![ProviderFailure {
                provider: ProviderId::new("ViaCEP"),
                error: ProviderError::not_found("CEP not found"),
            }],
        }
        .into();

        assert!(timed_out.is_no_answer());
        assert!(timed_out.is_timeout());
        assert!(all_failed.is_no_answer());
        assert!(!all_failed.is_timeout());
        assert_eq!(timed_out.to_string(), all_failed.to_string());
        assert!(matches!(all_failed, ApplicationError::NoAnswer { failed: 1, .. }));
    }

    #[test]
    fn other_race_errors_are_not_no_answer() {
        let err: ApplicationError = RaceError::NoProviders.into();
        assert!(!err.is_no_answer());
        assert!(matches!(err, ApplicationError::Race(RaceError::NoProviders)));
    }

    #[test]
    fn pipeline_errors_map_by_stage() {
        let fetch: ApplicationError = PipelineError::<u32>::Fetch(StageFailure::TimedOut {
            stage: PipelineStage::Fetch,
            budget: Duration::from_millis(200),
        })
        .into();
        assert!(matches!(fetch, ApplicationError::Fetch(_)));
        assert!(fetch.is_timeout());

        let persist: ApplicationError = PipelineError::Persist {
            value: 5u32,
            failure: StageFailure::TimedOut {
                stage: PipelineStage::Persist,
                budget: Duration::from_millis(10),
            },
        }
        .into();
        assert!(matches!(persist, ApplicationError::Persist(_)));
    }
}
