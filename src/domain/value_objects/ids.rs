//! # Identifiers
//!
//! Identity types for providers and races.
//!
//! # Examples
//!
//! ```
//! use lookup_race::domain::value_objects::ProviderId;
//!
//! let id = ProviderId::new("ViaCEP");
//! assert_eq!(id.as_str(), "ViaCEP");
//! assert_eq!(id.to_string(), "ViaCEP");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an external provider.
///
/// Doubles as the `source` tag on normalized results, so it is the
/// human-readable provider name rather than an opaque key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a new provider ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of a single race invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceId(Uuid);

impl RaceId {
    /// Creates a new random race ID.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for RaceId {
    fn default() -> Self {
        Self::new_v4()
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
