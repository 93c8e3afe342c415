//! # API Layer
//!
//! External interfaces of the service.
//!
//! - [`rest`]: axum HTTP endpoints

pub mod rest;
