//! Series collection across a date range
//!
//! Drives fetch and extraction for every date of a range, in ascending order:
//!
//! - a day count outside `1..=max_days` is rejected before any request
//! - a transport-level [`FetchError`] aborts the whole run and no snapshots
//!   are returned
//! - an [`ExtractionError`] (holiday, currency not quoted, broken entry) only
//!   skips that date
//!
//! Outcomes are kept per day as [`DayOutcome`] so callers can see why a day is
//! missing; [`SeriesCollector::collect`] collapses them to the snapshots.

use crate::config::MAX_DAYS;
use crate::currency::CurrencyCode;
use crate::fetcher::{extract_rate, ExtractionError, FetchError, RateDocumentFetcher};
use crate::range::DateRange;
use crate::validation::ValidationError;
use crate::RateSnapshot;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

/// Errors ending a collection run
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// Requested range violates the day-count bounds
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A day's document could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type for collection runs
pub type CollectResult<T> = Result<T, CollectError>;

/// Result of one date in the range
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// A rate was extracted for the date
    Collected(RateSnapshot),
    /// The document was fetched but held no usable rate
    Skipped {
        /// Requested date
        date: NaiveDate,
        /// Why no rate was extracted
        reason: ExtractionError,
    },
}

impl DayOutcome {
    /// Requested date this outcome belongs to
    pub fn date(&self) -> NaiveDate {
        match self {
            DayOutcome::Collected(snapshot) => snapshot.date,
            DayOutcome::Skipped { date, .. } => *date,
        }
    }

    /// Snapshot, if one was collected
    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        match self {
            DayOutcome::Collected(snapshot) => Some(snapshot),
            DayOutcome::Skipped { .. } => None,
        }
    }

    /// Consume the outcome, keeping only a collected snapshot
    pub fn into_snapshot(self) -> Option<RateSnapshot> {
        match self {
            DayOutcome::Collected(snapshot) => Some(snapshot),
            DayOutcome::Skipped { .. } => None,
        }
    }
}

/// Counts for a finished collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Dates visited
    pub requested: usize,
    /// Dates that produced a snapshot
    pub collected: usize,
    /// Dates skipped because of an extraction error
    pub skipped: usize,
}

impl CollectionSummary {
    /// Tally a list of outcomes
    pub fn from_outcomes(outcomes: &[DayOutcome]) -> Self {
        let collected = outcomes.iter().filter(|o| o.snapshot().is_some()).count();
        Self {
            requested: outcomes.len(),
            collected,
            skipped: outcomes.len() - collected,
        }
    }
}

/// Collects a single-currency series from a [`RateDocumentFetcher`]
pub struct SeriesCollector<F> {
    fetcher: F,
    concurrency: usize,
    max_days: u32,
}

impl<F: RateDocumentFetcher> SeriesCollector<F> {
    /// Create a strictly sequential collector
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            concurrency: 1,
            max_days: MAX_DAYS,
        }
    }

    /// Accept ranges of up to `max_days` dates
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    /// Allow up to `concurrency` requests in flight
    ///
    /// Documents are still consumed in date order, so ordering and the abort
    /// on the first failing date are unchanged. Values below 1 mean 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Visit `days` dates starting at `start` and record each outcome
    ///
    /// # Errors
    /// [`CollectError::Validation`] unless `1 <= days <= max_days`; nothing is
    /// requested in that case. Otherwise the first [`FetchError`] in date
    /// order. Outcomes gathered before it are discarded and requests still in
    /// flight are dropped.
    pub async fn collect_outcomes(
        &self,
        start: NaiveDate,
        days: u32,
        currency: &CurrencyCode,
    ) -> CollectResult<Vec<DayOutcome>> {
        let range = DateRange::new(start, days, self.max_days)?;
        self.collect_range(&range, currency).await
    }

    /// Visit every date of an already validated `range`
    pub async fn collect_range(
        &self,
        range: &DateRange,
        currency: &CurrencyCode,
    ) -> CollectResult<Vec<DayOutcome>> {
        let (start, days) = (range.start(), range.days());
        info!(
            "Collecting {} rates: start={}, days={}, source={}",
            currency,
            start,
            days,
            self.fetcher.base_url()
        );

        let fetcher = &self.fetcher;
        let mut documents = std::pin::pin!(stream::iter(range.dates())
            .map(move |date| async move { (date, fetcher.fetch(date).await) })
            .buffered(self.concurrency));

        let mut outcomes = Vec::new();
        while let Some((date, fetched)) = documents.next().await {
            let document = fetched.map_err(|e: FetchError| {
                error!("Fetch failed for {}, aborting collection: {}", date, e);
                e
            })?;

            if let Some(published) = document.published_on() {
                if published != date {
                    debug!("Feed for {} carries rates published on {}", date, published);
                }
            }

            match extract_rate(&document, currency.as_str()) {
                Ok(value) => outcomes.push(DayOutcome::Collected(RateSnapshot {
                    date,
                    currency: currency.clone(),
                    value,
                })),
                Err(reason) => {
                    debug!("Skipping {}: {}", date, reason);
                    outcomes.push(DayOutcome::Skipped { date, reason });
                }
            }
        }

        let summary = CollectionSummary::from_outcomes(&outcomes);
        info!(
            "Collection finished: {} of {} days collected, {} skipped",
            summary.collected, summary.requested, summary.skipped
        );

        Ok(outcomes)
    }

    /// Collect snapshots in ascending date order, omitting skipped days
    ///
    /// An empty result is not an error.
    pub async fn collect(
        &self,
        start: NaiveDate,
        days: u32,
        currency: &CurrencyCode,
    ) -> CollectResult<Vec<RateSnapshot>> {
        let outcomes = self.collect_outcomes(start, days, currency).await?;
        Ok(outcomes.into_iter().filter_map(DayOutcome::into_snapshot).collect())
    }
}
