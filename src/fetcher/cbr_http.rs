//! HTTP client for the central bank daily feed
//!
//! One GET per date with a fixed timeout. Failures are classified and returned
//! to the caller; nothing is retried here.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::fetcher::{FetchError, FetchResult, RateDocument, RateDocumentFetcher};

/// Date format expected by the `date_req` query parameter
pub const FEED_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a date the way the feed expects it (`DD/MM/YYYY`)
pub fn format_feed_date(date: NaiveDate) -> String {
    date.format(FEED_DATE_FORMAT).to_string()
}

/// Feed client built on a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct CbrHttpClient {
    client: Client,
    base_url: String,
}

impl CbrHttpClient {
    /// Create a client with its own connection pool and the given timeout
    ///
    /// # Errors
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client from the run configuration
    pub fn from_config(config: &AppConfig) -> FetchResult<Self> {
        Self::new(config.feed_url.clone(), config.request_timeout)
    }

    /// Wrap an existing client (its timeout settings are kept as-is)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Download the raw, still windows-1251 encoded body for `date`
    pub async fn fetch_bytes(&self, date: NaiveDate) -> FetchResult<Vec<u8>> {
        let params = [("date_req", format_feed_date(date))];
        debug!("GET {} date_req={}", self.base_url, params[0].1);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| classify(date, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Feed returned {} for {}", status, date);
            return Err(FetchError::Status {
                date,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(date, e))?;
        debug!("Received {} bytes for {}", body.len(), date);
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RateDocumentFetcher for CbrHttpClient {
    async fn fetch(&self, date: NaiveDate) -> FetchResult<RateDocument> {
        let body = self.fetch_bytes(date).await?;
        RateDocument::from_bytes(&body).map_err(|e| FetchError::Parse {
            date,
            message: e.to_string(),
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify(date: NaiveDate, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            date,
            message: error.to_string(),
        }
    } else {
        FetchError::Network {
            date,
            message: error.to_string(),
        }
    }
}
