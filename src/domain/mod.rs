//! # Domain Layer
//!
//! Provider-agnostic types the rest of the crate speaks in.
//!
//! - [`value_objects`]: identifiers, the [`Cep`](value_objects::Cep) postal code, and the race [`Deadline`](value_objects::Deadline)
//! - [`entities`]: normalized answers ([`Address`](entities::Address), [`ExchangeQuote`](entities::ExchangeQuote))

pub mod entities;
pub mod value_objects;
