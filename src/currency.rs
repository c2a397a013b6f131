//! Currency code parsing and normalization
//!
//! A code is three ASCII letters, normalized to uppercase. Whether the feed
//! actually quotes the currency is only discovered at extraction time.

use crate::config::DEFAULT_CURRENCY;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Three-letter currency code (e.g. `USD`, `EUR`)
///
/// # Examples
///
/// ```
/// use exchange_rate_downloader::currency::CurrencyCode;
///
/// let code = CurrencyCode::parse("eur").unwrap();
/// assert_eq!(code.as_str(), "EUR");
/// assert!(CurrencyCode::parse("abcd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, trimming whitespace and normalizing to uppercase
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCurrency`] unless the input is exactly
    /// three ASCII letters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Uppercase code
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    /// [`DEFAULT_CURRENCY`], already uppercase
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
