//! Daily rate document fetchers

use async_trait::async_trait;
use chrono::NaiveDate;

pub mod cbr_http;
pub mod cbr_parser;

pub use cbr_http::CbrHttpClient;
pub use cbr_parser::{extract_rate, CurrencyEntry, ExtractionError, RateDocument};

/// Fetch errors for a single day's request
///
/// Any of these aborts the whole collection run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP client could not be built
    #[error("client error: {0}")]
    Client(String),

    /// Request timed out
    #[error("request for {date} timed out: {message}")]
    Timeout {
        /// Requested date
        date: NaiveDate,
        /// Underlying cause
        message: String,
    },

    /// Connection or transport failure
    #[error("network error for {date}: {message}")]
    Network {
        /// Requested date
        date: NaiveDate,
        /// Underlying cause
        message: String,
    },

    /// Non-success HTTP status
    #[error("HTTP {status} for {date}")]
    Status {
        /// Requested date
        date: NaiveDate,
        /// Status code returned by the feed
        status: u16,
    },

    /// Body is not a rate document
    #[error("parse error for {date}: {message}")]
    Parse {
        /// Requested date
        date: NaiveDate,
        /// Underlying cause
        message: String,
    },
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Source of one parsed rate document per calendar date
#[async_trait]
pub trait RateDocumentFetcher: Send + Sync {
    /// Fetch and parse the document published for `date`
    ///
    /// # Errors
    /// Returns [`FetchError`] on transport failures, timeouts, non-success
    /// statuses or an unparseable body. Implementations do not retry.
    async fn fetch(&self, date: NaiveDate) -> FetchResult<RateDocument>;

    /// Endpoint this fetcher talks to
    fn base_url(&self) -> &str;
}
