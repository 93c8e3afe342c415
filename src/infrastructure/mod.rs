//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`providers`]: HTTP providers answering CEP and quote queries
//! - [`persistence`]: quote storage (SQLite, in-memory, text file)
//! - [`config`]: layered configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod persistence;
pub mod providers;
pub mod telemetry;
