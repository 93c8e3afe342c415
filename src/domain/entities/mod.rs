//! # Domain Entities
//!
//! Normalized answers produced by providers.
//!
//! Each entity is the provider-agnostic form of one upstream payload and
//! carries a `source` tag naming the provider that produced it.
//!
//! - [`Address`]: postal address resolved from a CEP
//! - [`ExchangeQuote`]: currency-pair bid

pub mod address;
pub mod exchange_quote;

pub use address::Address;
pub use exchange_quote::{DEFAULT_PAIR, ExchangeQuote};
