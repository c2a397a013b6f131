//! # Exchange Rate Downloader Library
//!
//! Builds a validated daily time series of one currency's official RUB rate
//! from the Central Bank of Russia `XML_daily.asp` feed.
//!
//! ## Pipeline
//!
//! 1. Resolve the date range from user input or defaults ([`range`])
//! 2. Fetch one windows-1251 XML document per day ([`fetcher`])
//! 3. Extract `value / nominal` for the requested currency ([`fetcher::extract_rate`])
//! 4. Assemble the ordered series, skipping days without a rate ([`collector`])
//! 5. Hand the series to the preview, CSV and chart writers ([`output`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use exchange_rate_downloader::collector::SeriesCollector;
//! use exchange_rate_downloader::config::AppConfig;
//! use exchange_rate_downloader::currency::CurrencyCode;
//! use exchange_rate_downloader::fetcher::CbrHttpClient;
//! use exchange_rate_downloader::range::resolve_start_date;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let today = chrono::Local::now().date_naive();
//! let start = resolve_start_date(today, 7, None);
//!
//! let collector = SeriesCollector::new(CbrHttpClient::from_config(&config)?);
//! let series = collector.collect(start, 7, &CurrencyCode::parse("usd")?).await?;
//! for snapshot in &series {
//!     println!("{} {}", snapshot.date, snapshot.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Model
//!
//! - [`fetcher::FetchError`] - transport failure, fatal to the whole run
//! - [`fetcher::ExtractionError`] - no usable rate that day, the day is skipped
//! - [`validation::ValidationError`] - rejected user input
//! - [`prompt::PromptError`] - interactive configuration cancelled or broken

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// CLI command implementations
pub mod cli;

/// Series collection across a date range
pub mod collector;

/// Run configuration and defaults
pub mod config;

/// Currency code parsing
pub mod currency;

/// Feed fetchers and document parsing
pub mod fetcher;

/// Preview, CSV and chart writers
pub mod output;

/// Interactive configuration prompts
pub mod prompt;

/// Date range resolution
pub mod range;

/// Input validation
pub mod validation;

pub use currency::CurrencyCode;

/// One observed rate: RUB per single unit of `currency` on `date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateSnapshot {
    /// Requested calendar date
    pub date: NaiveDate,
    /// Uppercase currency code
    pub currency: CurrencyCode,
    /// RUB per one unit, unrounded
    pub value: Decimal,
}

impl RateSnapshot {
    /// Validate snapshot integrity
    pub fn validate(&self) -> Result<(), String> {
        if self.value <= Decimal::ZERO {
            return Err(format!("Rate must be positive, got {}", self.value));
        }

        Ok(())
    }
}
