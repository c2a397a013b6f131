//! Run configuration and defaults

use crate::currency::CurrencyCode;
use crate::validation::{check_days, ValidationError};
use std::path::PathBuf;
use std::time::Duration;

/// Daily rates endpoint of the Central Bank of Russia
pub const CBR_DAILY_URL: &str = "https://www.cbr.ru/scripts/XML_daily.asp";

/// Currency used when none is given
pub const DEFAULT_CURRENCY: &str = "USD";

/// Number of days collected when none is given
pub const DEFAULT_DAYS: u32 = 7;

/// Upper bound for the day count (inclusive)
pub const MAX_DAYS: u32 = 31;

/// Per-request timeout. The feed answers in well under a second when healthy.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Inputs that cancel the interactive configuration (compared case-insensitively)
pub const EXIT_KEYWORDS: [&str; 3] = ["exit", "quit", "q"];

/// Start date input meaning "derive from the day count"
pub const AUTO_KEYWORD: &str = "auto";

/// Upper bound for `--concurrency`
pub const MAX_CONCURRENCY: usize = 8;

/// Settings shared by the prompts, the collector and the exporters
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Feed endpoint queried with `date_req=DD/MM/YYYY`
    pub feed_url: String,
    /// Timeout applied to each request
    pub request_timeout: Duration,
    /// Currency offered when the user gives none
    pub default_currency: CurrencyCode,
    /// Day count offered when the user gives none
    pub default_days: u32,
    /// Largest accepted day count
    pub max_days: u32,
    /// Lowercase inputs that cancel the interactive configuration
    pub exit_keywords: Vec<String>,
    /// Lowercase input meaning "computed start date"
    pub auto_keyword: String,
    /// CSV destination
    pub csv_output: PathBuf,
    /// Chart destination
    pub plot_output: PathBuf,
    /// Number of days fetched ahead of the one being consumed (1 = strictly sequential)
    pub concurrency: usize,
}

impl AppConfig {
    /// Check that the default day count lies in `1..=max_days`
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_days(i64::from(self.default_days), self.max_days)?;
        Ok(())
    }

    /// Whether `input` is one of the exit keywords
    pub fn is_exit_keyword(&self, input: &str) -> bool {
        let lowered = input.trim().to_lowercase();
        self.exit_keywords.iter().any(|k| *k == lowered)
    }

    /// Whether `input` requests the computed start date
    pub fn is_auto_keyword(&self, input: &str) -> bool {
        input.trim().eq_ignore_ascii_case(&self.auto_keyword)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: CBR_DAILY_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            default_currency: CurrencyCode::default(),
            default_days: DEFAULT_DAYS,
            max_days: MAX_DAYS,
            exit_keywords: EXIT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            auto_keyword: AUTO_KEYWORD.to_string(),
            csv_output: PathBuf::from("data").join("currency_rates.csv"),
            plot_output: PathBuf::from("plots").join("currency_rates.svg"),
            concurrency: 1,
        }
    }
}
