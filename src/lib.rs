//! # Lookup Race
//!
//! First-answer-wins lookups across redundant HTTP providers.
//!
//! Several independent providers (BrasilAPI and ViaCEP for postal codes,
//! AwesomeAPI for exchange quotes) can answer the same question with
//! different latency and availability. This crate races them under one
//! shared deadline, keeps the first successful answer and cancels the rest.
//! A smaller companion, the bounded pipeline, sequences a fetch and a
//! persist step under two independent deadlines.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain`): value objects and entities (`Cep`, `Address`, `ExchangeQuote`, `Deadline`)
//! - **Application Layer** (`application`): the race resolver, the bounded pipeline, and use cases
//! - **Infrastructure Layer** (`infrastructure`): HTTP providers, repositories, configuration, telemetry
//! - **API Layer** (`api`): REST interface built on axum
//!
//! ## Example
//!
//! ```rust,ignore
//! use lookup_race::application::services::race_resolver::resolve;
//! use std::time::Duration;
//!
//! let winner = resolve("01001000", &providers, Duration::from_secs(1)).await?;
//! println!("{} answered first", winner.provider());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
