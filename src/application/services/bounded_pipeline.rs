//! # Bounded Pipeline
//!
//! Fetch-then-persist under two independent deadlines.
//!
//! The fetch stage runs under its own budget; only if it succeeds does the
//! persist stage start, under a fresh budget of its own (never whatever was
//! left over from the fetch). Each stage gets its own [`QueryContext`],
//! which is cancelled when the stage ends, and each stage's future is
//! dropped the moment its budget runs out.
//!
//! A persist failure does not invalidate the fetched value: it travels
//! inside [`PipelineError::Persist`] so a read path can still serve it.
//! Whether that is acceptable is the caller's decision.

use crate::infrastructure::providers::context::QueryContext;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Default fetch budget in milliseconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 200;

/// Default persist budget in milliseconds.
pub const DEFAULT_PERSIST_TIMEOUT_MS: u64 = 10;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Upstream fetch.
    Fetch,
    /// Downstream persist.
    Persist,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Persist => write!(f, "persist"),
        }
    }
}

/// Why a single stage failed.
#[derive(Debug, Error)]
pub enum StageFailure {
    /// The stage exceeded its budget and was abandoned.
    #[error("{stage} stage exceeded its {budget_ms}ms budget", budget_ms = .budget.as_millis())]
    TimedOut {
        /// The stage.
        stage: PipelineStage,
        /// The budget it exceeded.
        budget: Duration,
    },

    /// The stage returned an error within its budget.
    #[error("{stage} stage failed: {error:#}")]
    Failed {
        /// The stage.
        stage: PipelineStage,
        /// The stage's error.
        error: anyhow::Error,
    },
}

impl StageFailure {
    /// Returns the stage that failed.
    #[must_use]
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::TimedOut { stage, .. } | Self::Failed { stage, .. } => *stage,
        }
    }

    /// Returns true if the stage ran out of time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Error type for pipeline runs.
#[derive(Debug, Error)]
pub enum PipelineError<V> {
    /// Fetch failed or timed out; persist was never attempted.
    #[error("fetch failed: {0}")]
    Fetch(#[source] StageFailure),

    /// Fetch succeeded but persist failed or timed out.
    #[error("persist failed: {failure}")]
    Persist {
        /// The fetched value, still valid for reads.
        value: V,
        /// Why persisting it failed.
        #[source]
        failure: StageFailure,
    },
}

impl<V> PipelineError<V> {
    /// Returns the stage that failed.
    #[must_use]
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Fetch(_) => PipelineStage::Fetch,
            Self::Persist { .. } => PipelineStage::Persist,
        }
    }

    /// Returns the underlying stage failure.
    #[must_use]
    pub fn failure(&self) -> &StageFailure {
        match self {
            Self::Fetch(failure) | Self::Persist { failure, .. } => failure,
        }
    }

    /// Returns true if the fetch succeeded and only persisting failed.
    #[must_use]
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }

    /// Returns the fetched value, if the fetch succeeded.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Fetch(_) => None,
            Self::Persist { value, .. } => Some(value),
        }
    }

    /// Consumes the error and returns the fetched value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Fetch(_) => None,
            Self::Persist { value, .. } => Some(value),
        }
    }
}

/// Stage budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Fetch budget in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Persist budget in milliseconds.
    pub persist_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            persist_timeout_ms: DEFAULT_PERSIST_TIMEOUT_MS,
        }
    }
}

/// Sequential fetch and persist stages with independent deadlines.
#[derive(Debug, Clone, Copy)]
pub struct BoundedPipeline {
    fetch_timeout: Duration,
    persist_timeout: Duration,
}

impl BoundedPipeline {
    /// Creates a pipeline with explicit stage budgets.
    #[must_use]
    pub fn new(fetch_timeout: Duration, persist_timeout: Duration) -> Self {
        Self {
            fetch_timeout,
            persist_timeout,
        }
    }

    /// Creates a pipeline from a configuration.
    #[must_use]
    pub fn from_config(config: PipelineConfig) -> Self {
        Self::new(
            Duration::from_millis(config.fetch_timeout_ms),
            Duration::from_millis(config.persist_timeout_ms),
        )
    }

    /// Returns the fetch budget.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Returns the persist budget.
    #[must_use]
    pub fn persist_timeout(&self) -> Duration {
        self.persist_timeout
    }

    /// Runs `fetch`, then `persist` on its result.
    ///
    /// `persist` receives a clone of the fetched value; the original is
    /// returned on success or carried in [`PipelineError::Persist`].
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Fetch`] if fetch fails or exceeds its budget
    /// - [`PipelineError::Persist`] if persist fails or exceeds its budget
    pub async fn run<V, F, FFut, FE, P, PFut, PE>(
        &self,
        fetch: F,
        persist: P,
    ) -> Result<V, PipelineError<V>>
    where
        V: Clone,
        F: FnOnce(QueryContext) -> FFut,
        FFut: Future<Output = Result<V, FE>>,
        FE: Into<anyhow::Error>,
        P: FnOnce(V, QueryContext) -> PFut,
        PFut: Future<Output = Result<(), PE>>,
        PE: Into<anyhow::Error>,
    {
        let value = run_stage(PipelineStage::Fetch, self.fetch_timeout, fetch)
            .await
            .map_err(PipelineError::Fetch)?;

        let persisted = value.clone();
        match run_stage(PipelineStage::Persist, self.persist_timeout, |ctx| {
            persist(persisted, ctx)
        })
        .await
        {
            Ok(()) => Ok(value),
            Err(failure) => Err(PipelineError::Persist { value, failure }),
        }
    }
}

impl Default for BoundedPipeline {
    fn default() -> Self {
        Self::from_config(PipelineConfig::default())
    }
}

async fn run_stage<T, F, Fut, E>(
    stage: PipelineStage,
    budget: Duration,
    stage_fn: F,
) -> Result<T, StageFailure>
where
    F: FnOnce(QueryContext) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    let ctx = QueryContext::with_timeout(budget);
    let deadline = ctx.deadline();
    let _cancel_on_exit = ctx.token().clone().drop_guard();

    let failure = match tokio::time::timeout_at(deadline.instant(), stage_fn(ctx)).await {
        Ok(Ok(value)) => {
            tracing::debug!(%stage, budget_ms = budget.as_millis() as u64, "stage completed");
            return Ok(value);
        }
        Ok(Err(error)) => StageFailure::Failed {
            stage,
            error: error.into(),
        },
        Err(_) => StageFailure::TimedOut { stage, budget },
    };

    tracing::warn!(%stage, error = %failure, "stage failed");
    Err(failure)
}
