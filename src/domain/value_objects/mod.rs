//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`]: String-based provider identifier, used as the `source` tag
//! - [`RaceId`]: UUID-based identifier correlating the logs of one race
//!
//! ## Domain Types
//!
//! - [`Cep`]: Validated, normalized Brazilian postal code
//! - [`Deadline`]: Absolute instant shared by every query of a race

pub mod cep;
pub mod deadline;
pub mod ids;

pub use cep::{Cep, InvalidCepError};
pub use deadline::Deadline;
pub use ids::{ProviderId, RaceId};
