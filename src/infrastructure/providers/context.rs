//! # Query Context
//!
//! Cancellation-aware execution context handed to every provider query.

use crate::domain::value_objects::{Deadline, RaceId};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Deadline, cancellation signal, and correlation ID for one query.
///
/// Cloned once per provider in a race; every clone carries the same
/// [`Deadline`] instant and the same [`CancellationToken`], so cancelling
/// the race cancels every query at once.
#[derive(Debug, Clone)]
pub struct QueryContext {
    deadline: Deadline,
    cancel: CancellationToken,
    race_id: RaceId,
}

impl QueryContext {
    /// Creates a context from its parts.
    #[must_use]
    pub fn new(deadline: Deadline, cancel: CancellationToken, race_id: RaceId) -> Self {
        Self {
            deadline,
            cancel,
            race_id,
        }
    }

    /// Creates a standalone context expiring `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(
            Deadline::after(timeout),
            CancellationToken::new(),
            RaceId::new_v4(),
        )
    }

    /// Returns the shared deadline.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Returns the time left before the deadline.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.remaining()
    }

    /// Returns the race this query belongs to.
    #[inline]
    #[must_use]
    pub fn race_id(&self) -> RaceId {
        self.race_id
    }

    /// Returns the cancellation token.
    #[inline]
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns true once the query has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes when the query is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Signals cancellation to every holder of this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
