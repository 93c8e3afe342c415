//! # Exchange Quote Entity
//!
//! Bid price for a currency pair, as reported by one provider.

use crate::domain::value_objects::ProviderId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The currency pair quoted when none is configured.
pub const DEFAULT_PAIR: &str = "USD-BRL";

/// A currency-pair bid.
///
/// The bid is kept as a [`Decimal`] and serialized as a string, which is
/// the representation upstream providers use and avoids float rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pair: String,
    #[serde(with = "rust_decimal::serde::str")]
    bid: Decimal,
    source: ProviderId,
    fetched_at: DateTime<Utc>,
}

impl ExchangeQuote {
    /// Creates a quote fetched now.
    #[must_use]
    pub fn new(pair: impl Into<String>, bid: Decimal, source: ProviderId) -> Self {
        Self::from_parts(pair, bid, source, Utc::now())
    }

    /// Creates a quote from stored parts.
    #[must_use]
    pub fn from_parts(
        pair: impl Into<String>,
        bid: Decimal,
        source: ProviderId,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pair: pair.into(),
            bid,
            source,
            fetched_at,
        }
    }

    /// Returns the currency pair, e.g. `USD-BRL`.
    #[inline]
    #[must_use]
    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// Returns the bid.
    #[inline]
    #[must_use]
    pub fn bid(&self) -> Decimal {
        self.bid
    }

    /// Returns the provider that produced this quote.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &ProviderId {
        &self.source
    }

    /// Returns when the quote was fetched.
    #[inline]
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns the display label for the base currency of the pair.
    ///
    /// `USD` is `Dólar` and `EUR` is `Euro`; any other base currency is
    /// shown by its code.
    #[must_use]
    pub fn label(&self) -> &str {
        let base = self
            .pair
            .split_once('-')
            .map_or(self.pair.as_str(), |(base, _)| base);
        match base {
            "USD" => "Dólar",
            "EUR" => "Euro",
            other => other,
        }
    }
}

impl fmt::Display for ExchangeQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.bid)
    }
}
