//! # SQLite Repositories
//!
//! sqlx-backed implementations of the persistence ports.

pub mod quote_repository;

pub use quote_repository::SqliteQuoteRepository;
