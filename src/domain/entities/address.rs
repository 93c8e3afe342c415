//! # Address Entity
//!
//! Normalized postal address returned by a CEP lookup.
//!
//! # Examples
//!
//! ```
//! use lookup_race::domain::entities::Address;
//! use lookup_race::domain::value_objects::{Cep, ProviderId};
//!
//! let address = Address::new(
//!     Cep::parse("01001-000").unwrap(),
//!     "Praça da Sé",
//!     "Sé",
//!     "São Paulo",
//!     "SP",
//!     ProviderId::new("ViaCEP"),
//! );
//! assert_eq!(address.city(), "São Paulo");
//! assert_eq!(address.source().as_str(), "ViaCEP");
//! ```

use crate::domain::value_objects::{Cep, ProviderId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider-agnostic postal address.
///
/// Immutable once constructed; two addresses are equal when every field,
/// including the source tag, is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    cep: Cep,
    street: String,
    district: String,
    city: String,
    state: String,
    source: ProviderId,
}

impl Address {
    /// Creates a new address.
    #[must_use]
    pub fn new(
        cep: Cep,
        street: impl Into<String>,
        district: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        source: ProviderId,
    ) -> Self {
        Self {
            cep,
            street: street.into(),
            district: district.into(),
            city: city.into(),
            state: state.into(),
            source,
        }
    }

    /// Returns the postal code.
    #[inline]
    #[must_use]
    pub fn cep(&self) -> &Cep {
        &self.cep
    }

    /// Returns the street (logradouro). May be empty for city-wide CEPs.
    #[inline]
    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Returns the district (bairro). May be empty for city-wide CEPs.
    #[inline]
    #[must_use]
    pub fn district(&self) -> &str {
        &self.district
    }

    /// Returns the city (localidade).
    #[inline]
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the two-letter state code (UF).
    #[inline]
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the provider that produced this address.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &ProviderId {
        &self.source
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origem: {}", self.source)?;
        writeln!(f, "CEP: {}", self.cep)?;
        writeln!(f, "Logradouro: {}", self.street)?;
        writeln!(f, "Bairro: {}", self.district)?;
        writeln!(f, "Cidade: {}", self.city)?;
        write!(f, "UF: {}", self.state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(source: &str) -> Address {
        Address::new(
            Cep::parse("01001000").unwrap(),
            "Praça da Sé",
            "Sé",
            "São Paulo",
            "SP",
            ProviderId::new(source),
        )
    }

    #[test]
    fn equality_includes_source() {
        assert_eq!(sample("ViaCEP"), sample("ViaCEP"));
        assert_ne!(sample("ViaCEP"), sample("BrasilAPI"));
    }

    #[test]
    fn display_lists_every_field() {
        let text = sample("BrasilAPI").to_string();
        assert!(text.starts_with("Origem: BrasilAPI"));
        assert!(text.contains("CEP: 01001-000"));
        assert!(text.contains("Logradouro: Praça da Sé"));
        assert!(text.contains("Bairro: Sé"));
        assert!(text.contains("Cidade: São Paulo"));
        assert!(text.ends_with("UF: SP"));
    }

    #[test]
    fn serializes_with_normalized_cep() {
        let json = serde_json::to_value(sample("ViaCEP")).unwrap();
        assert_eq!(json["cep"], "01001000");
        assert_eq!(json["source"], "ViaCEP");
    }
}
