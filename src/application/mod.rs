//! # Application Layer
//!
//! Services and use cases orchestrating providers and storage.
//!
//! - [`services`]: race resolver and bounded pipeline
//! - [`use_cases`]: CEP lookup, quote fetch, quote export
//! - [`error`]: application error type

pub mod error;
pub mod services;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
