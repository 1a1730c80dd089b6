//! Decimal money amounts as reported by the catalog.
//!
//! WooCommerce reports prices as decimal strings where an empty string means
//! "no price set". [`Amount::parse`] maps that convention onto `Option`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a price string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid price {0:?}")]
    Invalid(String),
}

/// A monetary amount in the feed currency's standard unit.
///
/// The original scale is preserved, so `"99.90"` renders back as `99.90`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Parse a catalog price string.
    ///
    /// Returns `Ok(None)` for an empty (or whitespace-only) string.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the string is not a decimal number.
    pub fn parse(raw: &str) -> Result<Option<Self>, PriceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Decimal::from_str(trimmed)
            .map(|value| Some(Self(value)))
            .map_err(|_| PriceError::Invalid(raw.to_string()))
    }

    /// Whether the amount is a bare `0`, which the catalog treats like an
    /// unset price.
    ///
    /// A zero written with a fractional part (`"0.00"`) is a real price.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_zero() && self.0.scale() == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ISO 4217 currency codes supported by the feed.
///
/// The feed is single-currency; every offer is priced in roubles at rate 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum CurrencyCode {
    #[default]
    RUB,
}

impl CurrencyCode {
    /// The code as written into `currencyId` elements.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RUB => "RUB",
        }
    }

    /// Conversion rate against the feed's base currency.
    #[must_use]
    pub const fn rate(self) -> &'static str {
        match self {
            Self::RUB => "1",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_none() {
        assert_eq!(Amount::parse("").unwrap(), None);
        assert_eq!(Amount::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_keeps_scale() {
        let amount = Amount::parse("99.90").unwrap().unwrap();
        assert_eq!(amount.to_string(), "99.90");

        let amount = Amount::parse("100").unwrap().unwrap();
        assert_eq!(amount.to_string(), "100");
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            Amount::parse("12abc"),
            Err(PriceError::Invalid("12abc".to_string()))
        );
    }

    #[test]
    fn test_ordering_is_numeric() {
        let sale = Amount::parse("80").unwrap().unwrap();
        let regular = Amount::parse("100.00").unwrap().unwrap();
        assert!(sale < regular);
    }

    #[test]
    fn test_is_blank() {
        assert!(Amount::parse("0").unwrap().unwrap().is_blank());
        assert!(!Amount::parse("0.00").unwrap().unwrap().is_blank());
        assert!(!Amount::parse("0.01").unwrap().unwrap().is_blank());
        assert!(!Amount::parse("10").unwrap().unwrap().is_blank());
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::default().code(), "RUB");
        assert_eq!(CurrencyCode::RUB.rate(), "1");
    }
}
