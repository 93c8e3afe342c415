//! # Deadline Value Object
//!
//! Absolute point in time after which an in-flight operation is abandoned.
//!
//! A [`Deadline`] is computed once, at the moment a race or pipeline stage
//! starts, and then copied to every participant. Participants never derive
//! their own "now + timeout", so all of them give up at the same instant.
//!
//! Built on [`tokio::time::Instant`] so that paused-clock tests observe it.

use std::time::Duration;
use tokio::time::Instant;

/// A monotonic deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(Instant);

impl Deadline {
    /// Creates a deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    /// Creates a deadline at an explicit instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Returns the deadline instant.
    #[inline]
    #[must_use]
    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Returns the time left before the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    /// Returns true if the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Completes when the deadline is reached.
    pub async fn elapsed(&self) {
        tokio::time::sleep_until(self.0).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn remaining_counts_down() {
        let deadline = Deadline::after(Duration::from_millis(300));
        assert_eq!(deadline.remaining(), Duration::from_millis(300));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(deadline.remaining(), Duration::from_millis(200));
        assert!(!deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn expires_at_instant() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let start = Instant::now();
        deadline.elapsed().await;

        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(start.elapsed() < Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn copies_share_the_same_instant() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let copy = deadline;
        tokio::time::advance(Duration::from_millis(10)).await;
        assert_eq!(copy.instant(), deadline.instant());
    }
}
