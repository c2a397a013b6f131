//! Central bank daily document parser
//!
//! Converts the `XML_daily.asp` payload into a typed list of currency entries,
//! indexed by character code. The feed looks like:
//!
//! ```xml
//! <ValCurs Date="02.03.2024" name="Foreign Currency Market">
//!   <Valute ID="R01235">
//!     <NumCode>840</NumCode>
//!     <CharCode>USD</CharCode>
//!     <Nominal>1</Nominal>
//!     <Name>Доллар США</Name>
//!     <Value>91,3336</Value>
//!   </Valute>
//! </ValCurs>
//! ```
//!
//! Numeric fields use a decimal comma and are kept as raw text until a rate is
//! extracted, so one broken entry does not invalidate the rest of the day.

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1251;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Format of the `Date` attribute on the document root
const DOCUMENT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Extraction errors for a single currency on a single day
///
/// These never abort a collection run; the affected day is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// No entry with the requested character code
    #[error("currency {0} not found in the feed")]
    CurrencyNotFound(String),

    /// Missing or unparseable numeric field
    #[error("malformed {field} for {code}: '{text}'")]
    MalformedNumber {
        /// Currency code of the entry
        code: String,
        /// Field name as it appears in the feed
        field: &'static str,
        /// Raw field text
        text: String,
    },

    /// Value or nominal is zero or negative
    #[error("non-positive {field} for {code}: '{text}'")]
    NonPositive {
        /// Currency code of the entry
        code: String,
        /// Field name as it appears in the feed
        field: &'static str,
        /// Raw field text
        text: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawValCurs {
    #[serde(rename = "@Date", default)]
    date: Option<String>,
    #[serde(rename = "Valute", default)]
    entries: Vec<RawValute>,
}

#[derive(Debug, Deserialize)]
struct RawValute {
    #[serde(rename = "@ID", default)]
    id: Option<String>,
    #[serde(rename = "NumCode", default)]
    num_code: Option<String>,
    #[serde(rename = "CharCode", default)]
    char_code: Option<String>,
    #[serde(rename = "Nominal", default)]
    nominal: Option<String>,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Value", default)]
    value: Option<String>,
}

/// One `<Valute>` entry of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyEntry {
    /// Feed-internal identifier (e.g. `R01235`)
    pub id: Option<String>,
    /// ISO 4217 numeric code
    pub num_code: Option<String>,
    /// Character code, trimmed
    pub char_code: String,
    /// Lot size the value applies to, raw text
    pub nominal: Option<String>,
    /// Display name (Russian)
    pub name: Option<String>,
    /// RUB price per lot, raw text
    pub value: Option<String>,
}

impl CurrencyEntry {
    /// Per-unit RUB rate: `value / nominal`, unrounded
    ///
    /// # Errors
    /// [`ExtractionError::MalformedNumber`] when either field is missing or not
    /// a number, [`ExtractionError::NonPositive`] when either is `<= 0`.
    pub fn rate(&self) -> Result<Decimal, ExtractionError> {
        let value = self.number("Value", self.value.as_deref())?;
        let nominal = self.number("Nominal", self.nominal.as_deref())?;

        value.checked_div(nominal).ok_or_else(|| ExtractionError::MalformedNumber {
            code: self.char_code.clone(),
            field: "Nominal",
            text: nominal.to_string(),
        })
    }

    fn number(&self, field: &'static str, text: Option<&str>) -> Result<Decimal, ExtractionError> {
        let raw = text.unwrap_or_default().trim();
        let parsed = Decimal::from_str(&raw.replace(',', ".")).map_err(|_| {
            ExtractionError::MalformedNumber {
                code: self.char_code.clone(),
                field,
                text: raw.to_string(),
            }
        })?;

        if parsed <= Decimal::ZERO {
            return Err(ExtractionError::NonPositive {
                code: self.char_code.clone(),
                field,
                text: raw.to_string(),
            });
        }

        Ok(parsed)
    }
}

/// Parsed daily document with keyed lookup by character code
#[derive(Debug, Clone, Default)]
pub struct RateDocument {
    date: Option<String>,
    entries: Vec<CurrencyEntry>,
    index: HashMap<String, usize>,
}

impl RateDocument {
    /// Parse an already decoded XML document
    ///
    /// Entries without a character code are dropped. If a code appears more
    /// than once, the first entry wins.
    pub fn parse(xml: &str) -> Result<Self, quick_xml::DeError> {
        let raw: RawValCurs = quick_xml::de::from_str(xml)?;

        let entries: Vec<CurrencyEntry> = raw
            .entries
            .into_iter()
            .filter_map(|entry| {
                let char_code = entry.char_code?.trim().to_string();
                if char_code.is_empty() {
                    return None;
                }
                Some(CurrencyEntry {
                    id: entry.id,
                    num_code: entry.num_code,
                    char_code,
                    nominal: entry.nominal,
                    name: entry.name,
                    value: entry.value,
                })
            })
            .collect();

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.char_code.clone()).or_insert(position);
        }

        Ok(Self {
            date: raw.date,
            entries,
            index,
        })
    }

    /// Decode a windows-1251 body and parse it
    ///
    /// A UTF-8 or UTF-16 byte order mark overrides the legacy encoding.
    pub fn from_bytes(body: &[u8]) -> Result<Self, quick_xml::DeError> {
        let (text, _, _) = WINDOWS_1251.decode(body);
        Self::parse(&text)
    }

    /// Publication date from the root `Date` attribute
    ///
    /// For weekends and holidays the feed repeats the last published day, so
    /// this can differ from the requested date.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), DOCUMENT_DATE_FORMAT).ok()
    }

    /// Entry for an exact (already uppercase) character code
    pub fn entry(&self, char_code: &str) -> Option<&CurrencyEntry> {
        self.index.get(char_code).map(|&position| &self.entries[position])
    }

    /// All entries in document order
    pub fn entries(&self) -> &[CurrencyEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document lists no currencies
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract the RUB rate of one unit of `currency_code`
///
/// The code is uppercased before lookup; matching is exact after that.
///
/// # Examples
///
/// ```
/// use exchange_rate_downloader::fetcher::{extract_rate, RateDocument};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let doc = RateDocument::parse(
///     "<ValCurs><Valute><CharCode>USD</CharCode><Nominal>1</Nominal><Value>63,7504</Value></Valute></ValCurs>",
/// ).unwrap();
/// assert_eq!(extract_rate(&doc, "usd").unwrap(), Decimal::from_str("63.7504").unwrap());
/// ```
pub fn extract_rate(document: &RateDocument, currency_code: &str) -> Result<Decimal, ExtractionError> {
    let code = currency_code.trim().to_uppercase();
    let entry = document
        .entry(&code)
        .ok_or_else(|| ExtractionError::CurrencyNotFound(code.clone()))?;

    entry.rate()
}
