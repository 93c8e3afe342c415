//! # Persistence Layer
//!
//! Storage ports and their implementations.
//!
//! ## Ports
//!
//! - [`QuoteSink`]: write-only destination for fetched quotes
//! - [`QuoteRepository`]: quote history that can be read back
//!
//! ## Implementations
//!
//! - `in_memory`: in-memory implementations for testing
//! - `sqlite`: SQLite implementations via sqlx
//! - [`QuoteFileSink`]: text file holding the latest quote

pub mod file_sink;
pub mod in_memory;
pub mod sqlite;
pub mod traits;

pub use file_sink::QuoteFileSink;
pub use in_memory::InMemoryQuoteRepository;
pub use sqlite::SqliteQuoteRepository;
pub use traits::{QuoteRepository, QuoteSink, RepositoryError, RepositoryResult};
