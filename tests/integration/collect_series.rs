//! Integration tests for series collection over a date range

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use exchange_rate_downloader::collector::{CollectError, CollectionSummary, DayOutcome, SeriesCollector};
use exchange_rate_downloader::config::MAX_DAYS;
use exchange_rate_downloader::fetcher::{
    ExtractionError, FetchError, FetchResult, RateDocument, RateDocumentFetcher,
};
use exchange_rate_downloader::validation::ValidationError;
use exchange_rate_downloader::CurrencyCode;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::support::feed_stub::feed_xml;

/// In-memory feed: weekends are closed, `down` dates fail at transport level.
///
/// Later dates answer faster, so buffered requests complete out of order.
struct CalendarFeed {
    down: HashSet<NaiveDate>,
    latency: bool,
    calls: AtomicUsize,
}

impl CalendarFeed {
    fn new() -> Self {
        Self {
            down: HashSet::new(),
            latency: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn down_on(mut self, date: NaiveDate) -> Self {
        self.down.insert(date);
        self
    }

    fn with_latency(mut self) -> Self {
        self.latency = true;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateDocumentFetcher for CalendarFeed {
    async fn fetch(&self, date: NaiveDate) -> FetchResult<RateDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.latency {
            let delay = 40u64.saturating_sub(u64::from(date.day()));
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.down.contains(&date) {
            return Err(FetchError::Network {
                date,
                message: "connection reset".to_string(),
            });
        }

        let published = date.format("%d.%m.%Y").to_string();
        let value = format!("{},{:04}", 90 + date.day(), date.day());
        let body = if date.weekday().number_from_monday() >= 6 {
            feed_xml(&published, &[])
        } else {
            feed_xml(
                &published,
                &[("USD", "1", "Доллар США", &value), ("EUR", "1", "Евро", "99,1")],
            )
        };
        Ok(RateDocument::from_bytes(&body).unwrap())
    }

    fn base_url(&self) -> &str {
        "memory://calendar"
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn usd() -> CurrencyCode {
    CurrencyCode::parse("USD").unwrap()
}

#[tokio::test]
async fn test_weekdays_only_week_is_ascending() {
    // 2024-03-04 is a Monday
    let collector = SeriesCollector::new(CalendarFeed::new());
    let series = collector.collect(ymd(2024, 3, 4), 7, &usd()).await.unwrap();

    let dates: Vec<_> = series.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![
            ymd(2024, 3, 4),
            ymd(2024, 3, 5),
            ymd(2024, 3, 6),
            ymd(2024, 3, 7),
            ymd(2024, 3, 8)
        ]
    );
    assert_eq!(series[0].value, Decimal::from_str("94.0004").unwrap());
    assert!(series.iter().all(|s| s.currency == usd() && s.validate().is_ok()));
    assert_eq!(collector.fetcher().calls(), 7);
}

#[tokio::test]
async fn test_every_day_has_snapshot_when_quoted() {
    let collector = SeriesCollector::new(CalendarFeed::new());
    let series = collector.collect(ymd(2024, 3, 4), 5, &usd()).await.unwrap();
    assert_eq!(series.len(), 5);
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn test_unquoted_currency_gives_empty_series() {
    let collector = SeriesCollector::new(CalendarFeed::new());
    let chf = CurrencyCode::parse("chf").unwrap();

    let outcomes = collector.collect_outcomes(ymd(2024, 3, 4), 3, &chf).await.unwrap();
    assert!(outcomes.iter().all(|o| matches!(
        o,
        DayOutcome::Skipped {
            reason: ExtractionError::CurrencyNotFound(_),
            ..
        }
    )));

    let series = collector.collect(ymd(2024, 3, 4), 3, &chf).await.unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn test_transport_failure_discards_collected_days() {
    let collector = SeriesCollector::new(CalendarFeed::new().down_on(ymd(2024, 3, 6)));

    let result = collector.collect(ymd(2024, 3, 4), 5, &usd()).await;
    match result {
        Err(CollectError::Fetch(FetchError::Network { date, .. })) => assert_eq!(date, ymd(2024, 3, 6)),
        other => panic!("expected network failure, got {other:?}"),
    }
    assert_eq!(collector.fetcher().calls(), 3);
}

#[tokio::test]
async fn test_day_count_outside_bounds_is_rejected_without_requests() {
    let collector = SeriesCollector::new(CalendarFeed::new());

    for days in [0, MAX_DAYS + 1, 400, u32::MAX] {
        let result = collector.collect(ymd(2024, 1, 1), days, &usd()).await;
        match result {
            Err(CollectError::Validation(ValidationError::DaysOutOfRange { value, max })) => {
                assert_eq!(value, i64::from(days));
                assert_eq!(max, MAX_DAYS);
            }
            other => panic!("days={days}: expected range rejection, got {other:?}"),
        }
    }
    assert_eq!(collector.fetcher().calls(), 0);

    let series = collector.collect(ymd(2024, 1, 1), MAX_DAYS, &usd()).await.unwrap();
    assert_eq!(series.last().map(|s| s.date), Some(ymd(2024, 1, 31)));
}

#[tokio::test]
async fn test_collection_is_repeatable() {
    let collector = SeriesCollector::new(CalendarFeed::new());
    let first = collector.collect(ymd(2024, 2, 26), 14, &usd()).await.unwrap();
    let second = collector.collect(ymd(2024, 2, 26), 14, &usd()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_collection_keeps_date_order() {
    let sequential = SeriesCollector::new(CalendarFeed::new())
        .collect(ymd(2024, 3, 1), 20, &usd())
        .await
        .unwrap();

    let collector = SeriesCollector::new(CalendarFeed::new().with_latency()).with_concurrency(8);
    let outcomes = collector.collect_outcomes(ymd(2024, 3, 1), 20, &usd()).await.unwrap();

    let dates: Vec<_> = outcomes.iter().map(DayOutcome::date).collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(
        CollectionSummary::from_outcomes(&outcomes).collected,
        sequential.len()
    );

    let concurrent: Vec<_> = outcomes.into_iter().filter_map(DayOutcome::into_snapshot).collect();
    assert_eq!(concurrent, sequential);
}

#[tokio::test]
async fn test_concurrent_collection_still_aborts() {
    let collector = SeriesCollector::new(
        CalendarFeed::new()
            .with_latency()
            .down_on(ymd(2024, 3, 3)),
    )
    .with_concurrency(4);

    let result = collector.collect(ymd(2024, 3, 1), 10, &usd()).await;
    assert!(matches!(result, Err(CollectError::Fetch(FetchError::Network { .. }))));
    // Only the buffered window ahead of the failing date is ever requested
    assert!(collector.fetcher().calls() < 10);
}
