//! # In-Memory Quote Repository
//!
//! In-memory implementation of [`QuoteRepository`] for testing.
//!
//! This implementation uses a thread-safe `Vec` for storage, making it
//! suitable for unit tests without database dependencies. An optional
//! artificial write delay lets tests exercise persist budgets.

use crate::domain::entities::ExchangeQuote;
use crate::infrastructure::persistence::traits::{QuoteRepository, QuoteSink, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory implementation of [`QuoteRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuoteRepository {
    storage: Arc<RwLock<Vec<ExchangeQuote>>>,
    write_delay: Option<Duration>,
}

impl InMemoryQuoteRepository {
    /// Creates a new empty in-memory quote repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every save by `delay`.
    #[must_use]
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }
}

#[async_trait]
impl QuoteSink for InMemoryQuoteRepository {
    async fn save(&self, quote: &ExchangeQuote) -> RepositoryResult<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        let mut storage = self.storage.write().await;
        storage.push(quote.clone());
        Ok(())
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn latest(&self) -> RepositoryResult<Option<ExchangeQuote>> {
        let storage = self.storage.read().await;
        Ok(storage.last().cloned())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProviderId;
    use rust_decimal::Decimal;

    fn quote(bid: i64) -> ExchangeQuote {
        ExchangeQuote::new("USD-BRL", Decimal::new(bid, 2), ProviderId::new("test"))
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryQuoteRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_is_last_saved() {
        let repo = InMemoryQuoteRepository::new();
        repo.save(&quote(510)).await.unwrap();
        repo.save(&quote(512)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.latest().await.unwrap().unwrap().bid(), Decimal::new(512, 2));
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryQuoteRepository::new();
        let clone = repo.clone();
        clone.save(&quote(500)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn count_waits_for_in_flight_write() {
        let repo = InMemoryQuoteRepository::new();
        let guard = repo.storage.write().await;

        let reader = repo.clone();
        let count = tokio::spawn(async move { reader.count().await.unwrap() });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!count.is_finished());

        drop(guard);
        assert_eq!(count.await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn write_delay_is_applied() {
        let repo = InMemoryQuoteRepository::new().with_write_delay(Duration::from_millis(30));
        let started = tokio::time::Instant::now();
        repo.save(&quote(500)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
