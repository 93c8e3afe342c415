//! # SQLite Quote Repository
//!
//! SQLite implementation of [`QuoteRepository`] using sqlx.
//!
//! Quotes are appended to a single `cotacoes` table; nothing is updated or
//! deleted. The bid is stored as text to keep its exact decimal form.

use crate::domain::entities::ExchangeQuote;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::persistence::traits::{
    QuoteRepository, QuoteSink, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS cotacoes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pair TEXT NOT NULL,
        valor TEXT NOT NULL,
        source TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

/// SQLite implementation of [`QuoteRepository`].
///
/// # Examples
///
/// ```ignore
/// use lookup_race::infrastructure::persistence::sqlite::SqliteQuoteRepository;
///
/// let repo = SqliteQuoteRepository::connect("sqlite://cotacoes.db", 4).await?;
/// repo.ensure_schema().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteQuoteRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    pair: String,
    valor: String,
    source: String,
    created_at: DateTime<Utc>,
}

impl QuoteRow {
    fn try_into_quote(self) -> RepositoryResult<ExchangeQuote> {
        let bid = Decimal::from_str(&self.valor).map_err(|e| {
            RepositoryError::serialization(format!("invalid stored bid '{}': {}", self.valor, e))
        })?;
        Ok(ExchangeQuote::from_parts(
            self.pair,
            bid,
            ProviderId::new(self.source),
            self.created_at,
        ))
    }
}

impl SqliteQuoteRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `url`.
    ///
    /// In-memory databases exist per connection, so `sqlite::memory:`
    /// should be opened with `max_connections = 1`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` if the database cannot be opened.
    pub async fn connect(url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| RepositoryError::connection(format!("invalid database url: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Creates the `cotacoes` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Query` if the statement fails.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(())
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl QuoteSink for SqliteQuoteRepository {
    async fn save(&self, quote: &ExchangeQuote) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cotacoes (pair, valor, source, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(quote.pair())
        .bind(quote.bid().to_string())
        .bind(quote.source().as_str())
        .bind(quote.fetched_at())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepository {
    async fn latest(&self) -> RepositoryResult<Option<ExchangeQuote>> {
        let row: Option<QuoteRow> = sqlx::query_as(
            r#"
            SELECT pair, valor, source, created_at
            FROM cotacoes
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(QuoteRow::try_into_quote).transpose()
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cotacoes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        u64::try_from(count).map_err(|e| RepositoryError::internal(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn repository() -> SqliteQuoteRepository {
        let repo = SqliteQuoteRepository::connect("sqlite::memory:", 1)
            .await
            .unwrap();
        repo.ensure_schema().await.unwrap();
        repo
    }

    fn quote(bid: &str) -> ExchangeQuote {
        ExchangeQuote::new(
            "USD-BRL",
            Decimal::from_str(bid).unwrap(),
            ProviderId::new("AwesomeAPI"),
        )
    }

    #[tokio::test]
    async fn empty_table() {
        let repo = repository().await;
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_read_back_latest() {
        let repo = repository().await;
        repo.save(&quote("5.1000")).await.unwrap();
        repo.save(&quote("5.1234")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        let latest = repo.latest().await.unwrap().unwrap();
        assert_eq!(latest.bid().to_string(), "5.1234");
        assert_eq!(latest.pair(), "USD-BRL");
        assert_eq!(latest.source().as_str(), "AwesomeAPI");
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let repo = repository().await;
        repo.ensure_schema().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_without_schema_fails() {
        let repo = SqliteQuoteRepository::connect("sqlite::memory:", 1)
            .await
            .unwrap();
        let result = repo.save(&quote("5.0")).await;
        assert!(matches!(result, Err(RepositoryError::Query(_))));
    }

    #[tokio::test]
    async fn invalid_url_is_connection_error() {
        let result = SqliteQuoteRepository::connect("postgres://nope", 1).await;
        assert!(matches!(result, Err(RepositoryError::Connection(_))));
    }
}
