//! Input validation shared by the CLI flags and the interactive prompts
//!
//! Every rejected value surfaces as a [`ValidationError`]; nothing here clamps
//! or silently corrects input.

use chrono::NaiveDate;

/// Date format accepted for user supplied start dates
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation errors for user supplied configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Currency code is not exactly three ASCII letters
    #[error("invalid currency code '{0}': expected three letters, e.g. USD")]
    InvalidCurrency(String),

    /// Day count is not an integer
    #[error("invalid day count '{0}': expected a whole number")]
    InvalidDays(String),

    /// Day count is outside the accepted window
    #[error("day count {value} is out of range: expected 1..={max}")]
    DaysOutOfRange {
        /// Rejected value
        value: i64,
        /// Inclusive upper bound
        max: u32,
    },

    /// Start date does not parse as YYYY-MM-DD
    #[error("invalid start date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parse a day count and check it lies in `1..=max_days`
///
/// # Examples
///
/// ```
/// use exchange_rate_downloader::validation::parse_days;
///
/// assert_eq!(parse_days("31", 31).unwrap(), 31);
/// assert!(parse_days("0", 31).is_err());
/// assert!(parse_days("32", 31).is_err());
/// ```
pub fn parse_days(input: &str, max_days: u32) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidDays(trimmed.to_string()))?;

    check_days(value, max_days)
}

/// Check an already parsed day count against `1..=max_days`
pub fn check_days(value: i64, max_days: u32) -> Result<u32, ValidationError> {
    if value < 1 || value > i64::from(max_days) {
        return Err(ValidationError::DaysOutOfRange {
            value,
            max: max_days,
        });
    }

    // In range, so it fits in u32
    Ok(value as u32)
}

/// Parse a `YYYY-MM-DD` start date
pub fn parse_start_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, INPUT_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}
