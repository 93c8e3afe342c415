//! # Race Resolver
//!
//! First-success-wins fan-out across redundant providers.
//!
//! This module provides [`resolve`] and the [`RaceResolver`] wrapper, which
//! query every provider concurrently under one shared deadline, return the
//! first successful answer, and cancel everything still in flight.
//!
//! # Protocol
//!
//! 1. One [`Deadline`] and one cancellation token are created per race.
//! 2. One task per provider is spawned; each sends exactly one
//!    [`ProviderOutcome`] into a channel sized to the provider count, or
//!    nothing if it is cancelled first.
//! 3. The resolver waits on the channel, the deadline, and the caller's
//!    token at the same time.
//! 4. The first `Success` wins. The token is cancelled on every return
//!    path; losers are not awaited.
//! 5. If every provider fails, the race ends early with
//!    [`RaceError::NoAnswer`] instead of waiting out the deadline.

use crate::domain::value_objects::{Deadline, ProviderId, RaceId};
use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::{ProviderOutcome, ProviderQuery};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Configuration for a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceConfig {
    /// Shared deadline for all providers, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self { timeout_ms: 1000 }
    }
}

impl RaceConfig {
    /// Creates a configuration with the specified timeout.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Why a race produced no answer. Only used for diagnostics; callers see
/// the same [`RaceError::NoAnswer`] either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoAnswerReason {
    /// The deadline elapsed before any provider succeeded.
    TimedOut,
    /// Every provider reported a failure before the deadline.
    AllFailed,
}

impl fmt::Display for NoAnswerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "timed out"),
            Self::AllFailed => write!(f, "all providers failed"),
        }
    }
}

/// One provider's failed vote, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// The failing provider.
    pub provider: ProviderId,
    /// Why it failed.
    pub error: ProviderError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Error type for race operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaceError {
    /// `resolve` was called without providers.
    #[error("no providers configured")]
    NoProviders,

    /// `resolve` was called with a zero timeout.
    #[error("race timeout must be greater than zero")]
    InvalidTimeout,

    /// No provider answered successfully before the deadline.
    #[error("no provider answered in time")]
    NoAnswer {
        /// Internal distinction between timing out and failing outright.
        reason: NoAnswerReason,
        /// Failures received before the race ended.
        failures: Vec<ProviderFailure>,
    },

    /// The caller cancelled the race.
    #[error("race cancelled by caller")]
    Cancelled,
}

impl RaceError {
    /// Returns true for the caller-visible "could not resolve in time"
    /// condition.
    #[must_use]
    pub fn is_no_answer(&self) -> bool {
        matches!(self, Self::NoAnswer { .. })
    }

    /// Returns the no-answer reason, if this is a no-answer error.
    #[must_use]
    pub fn no_answer_reason(&self) -> Option<NoAnswerReason> {
        match self {
            Self::NoAnswer { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Returns the provider failures collected before the race ended.
    #[must_use]
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            Self::NoAnswer { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// The winning answer of a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceWinner<T> {
    value: T,
    provider: ProviderId,
    elapsed: Duration,
    race_id: RaceId,
}

impl<T> RaceWinner<T> {
    /// Returns the winning value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the winner and returns the value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the provider that answered first.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    /// Returns the time from race start to the winning answer.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the race ID.
    #[inline]
    #[must_use]
    pub fn race_id(&self) -> RaceId {
        self.race_id
    }
}

/// Result type for races.
pub type RaceResult<T> = Result<RaceWinner<T>, RaceError>;

/// Races `providers` for `key` under one shared `timeout`.
///
/// # Errors
///
/// - [`RaceError::NoProviders`] if `providers` is empty (returned at once)
/// - [`RaceError::InvalidTimeout`] if `timeout` is zero
/// - [`RaceError::NoAnswer`] if no provider succeeded before the deadline
pub async fn resolve<T>(
    key: &str,
    providers: &[Arc<dyn ProviderQuery<T>>],
    timeout: Duration,
) -> RaceResult<T>
where
    T: Send + 'static,
{
    resolve_with_cancellation(key, providers, timeout, &CancellationToken::new()).await
}

/// Like [`resolve`], but also ends the race when `parent` is cancelled.
///
/// The race runs under a child of `parent`, so cancelling the parent
/// cancels every in-flight query; finishing the race never cancels the
/// parent.
///
/// # Errors
///
/// Same as [`resolve`], plus [`RaceError::Cancelled`] if `parent` is
/// cancelled before a provider succeeds.
pub async fn resolve_with_cancellation<T>(
    key: &str,
    providers: &[Arc<dyn ProviderQuery<T>>],
    timeout: Duration,
    parent: &CancellationToken,
) -> RaceResult<T>
where
    T: Send + 'static,
{
    if providers.is_empty() {
        return Err(RaceError::NoProviders);
    }
    if timeout.is_zero() {
        return Err(RaceError::InvalidTimeout);
    }
    if parent.is_cancelled() {
        return Err(RaceError::Cancelled);
    }

    let race_id = RaceId::new_v4();
    let started = Instant::now();
    let deadline = Deadline::after(timeout);
    let cancel = parent.child_token();
    let _cancel_on_exit = cancel.clone().drop_guard();

    // One slot per provider: producers never wait, even after a winner.
    let (tx, mut rx) = mpsc::channel::<ProviderOutcome<T>>(providers.len());

    for provider in providers {
        let provider = Arc::clone(provider);
        let ctx = QueryContext::new(deadline, cancel.clone(), race_id);
        let tx = tx.clone();
        let key = key.to_owned();

        tokio::spawn(async move {
            let id = provider.provider_id().clone();
            let outcome = tokio::select! {
                biased;
                _ = ctx.cancelled() => {
                    tracing::debug!(%race_id, provider = %id, "provider query cancelled");
                    return;
                }
                result = provider.query(&key, &ctx) => ProviderOutcome::from_result(id, result),
            };
            let _ = tx.try_send(outcome);
        });
    }
    drop(tx);

    tracing::debug!(%race_id, key, providers = providers.len(), timeout_ms = timeout.as_millis() as u64, "race started");

    let mut failures = Vec::new();
    loop {
        tokio::select! {
            biased;
            _ = parent.cancelled() => {
                tracing::debug!(%race_id, "race cancelled by caller");
                return Err(RaceError::Cancelled);
            }
            received = rx.recv() => match received {
                Some(ProviderOutcome::Success { provider, value }) => {
                    let elapsed = started.elapsed();
                    tracing::info!(
                        %race_id,
                        provider = %provider,
                        elapsed_ms = elapsed.as_millis() as u64,
                        failures = failures.len(),
                        "race won"
                    );
                    return Ok(RaceWinner {
                        value,
                        provider,
                        elapsed,
                        race_id,
                    });
                }
                Some(ProviderOutcome::Failure { provider, error }) => {
                    tracing::debug!(%race_id, provider = %provider, error = %error, "provider failed");
                    failures.push(ProviderFailure { provider, error });
                }
                None => {
                    let reason = if deadline.is_expired() {
                        NoAnswerReason::TimedOut
                    } else {
                        NoAnswerReason::AllFailed
                    };
                    return Err(no_answer(race_id, started, reason, failures));
                }
            },
            _ = deadline.elapsed() => {
                return Err(no_answer(race_id, started, NoAnswerReason::TimedOut, failures));
            }
        }
    }
}

fn no_answer(
    race_id: RaceId,
    started: Instant,
    reason: NoAnswerReason,
    failures: Vec<ProviderFailure>,
) -> RaceError {
    let causes: Vec<String> = failures.iter().map(ToString::to_string).collect();
    tracing::warn!(
        %race_id,
        %reason,
        elapsed_ms = started.elapsed().as_millis() as u64,
        failures = ?causes,
        "no provider answered"
    );
    RaceError::NoAnswer { reason, failures }
}

/// A fixed provider set raced under a configured timeout.
#[derive(Debug)]
pub struct RaceResolver<T> {
    providers: Vec<Arc<dyn ProviderQuery<T>>>,
    config: RaceConfig,
}

impl<T> Clone for RaceResolver<T> {
    fn clone(&self) -> Self {
        Self {
            providers: self.providers.clone(),
            config: self.config,
        }
    }
}

impl<T> RaceResolver<T>
where
    T: Send + 'static,
{
    /// Creates a new resolver.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn ProviderQuery<T>>>, config: RaceConfig) -> Self {
        Self { providers, config }
    }

    /// Creates a resolver with the default configuration.
    #[must_use]
    pub fn with_defaults(providers: Vec<Arc<dyn ProviderQuery<T>>>) -> Self {
        Self::new(providers, RaceConfig::default())
    }

    /// Races all providers for `key`.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub async fn resolve(&self, key: &str) -> RaceResult<T> {
        resolve(key, &self.providers, self.config.timeout()).await
    }

    /// Races all providers for `key`, ending early if `parent` is cancelled.
    ///
    /// # Errors
    ///
    /// See [`resolve_with_cancellation`].
    pub async fn resolve_with_cancellation(
        &self,
        key: &str,
        parent: &CancellationToken,
    ) -> RaceResult<T> {
        resolve_with_cancellation(key, &self.providers, self.config.timeout(), parent).await
    }

    /// Returns the number of providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns the provider IDs in dispatch order.
    #[must_use]
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers
            .iter()
            .map(|p| p.provider_id().clone())
            .collect()
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }
}
