//! # CEP Value Object
//!
//! Brazilian postal code (Código de Endereçamento Postal).
//!
//! A CEP is eight digits, commonly written with a hyphen after the fifth
//! (`01001-000`). [`Cep`] accepts either form and stores the bare digits,
//! which is what both upstream providers expect in their URLs.
//!
//! # Examples
//!
//! ```
//! use lookup_race::domain::value_objects::Cep;
//!
//! let cep = Cep::parse("01001-000").unwrap();
//! assert_eq!(cep.as_str(), "01001000");
//! assert_eq!(cep.formatted(), "01001-000");
//!
//! assert!(Cep::parse("0100100").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of digits in a CEP.
pub const CEP_LENGTH: usize = 8;

/// Error returned when a string is not a valid CEP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CEP '{input}': expected 8 digits, optionally as 00000-000")]
pub struct InvalidCepError {
    input: String,
}

impl InvalidCepError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A validated, normalized CEP (eight ASCII digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// Parses a CEP, accepting `00000000` and `00000-000`.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCepError`] if the input does not contain exactly
    /// eight digits in one of the accepted layouts.
    pub fn parse(input: &str) -> Result<Self, InvalidCepError> {
        let trimmed = input.trim();
        let digits = match trimmed.split_at_checked(5) {
            Some((head, tail)) if trimmed.len() == CEP_LENGTH + 1 => tail
                .strip_prefix('-')
                .map(|rest| format!("{head}{rest}"))
                .unwrap_or_default(),
            _ => trimmed.to_string(),
        };

        if digits.len() == CEP_LENGTH && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(InvalidCepError {
                input: input.to_string(),
            })
        }
    }

    /// Returns the eight digits.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the CEP in `00000-000` form.
    #[must_use]
    pub fn formatted(&self) -> String {
        match self.0.split_at_checked(5) {
            Some((head, tail)) => format!("{head}-{tail}"),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Cep {
    type Err = InvalidCepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cep {
    type Error = InvalidCepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cep> for String {
    fn from(value: Cep) -> Self {
        value.0
    }
}
