//! # In-Memory Repositories
//!
//! In-memory implementations for testing without database dependencies.
//!
//! ## Thread Safety
//!
//! Storage is an `Arc<RwLock<Vec>>`, so clones share the same data.

pub mod quote_repository;

pub use quote_repository::InMemoryQuoteRepository;
