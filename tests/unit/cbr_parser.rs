//! Unit tests for feed document parsing and rate extraction

use crate::support::feed_stub::{feed_xml, typical_feed};
use chrono::NaiveDate;
use exchange_rate_downloader::fetcher::{extract_rate, ExtractionError, RateDocument};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_typical_document_decodes_windows_1251() {
    let document = RateDocument::from_bytes(&typical_feed("04.03.2024")).unwrap();

    assert_eq!(document.len(), 3);
    assert_eq!(
        document.published_on(),
        Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    );

    let usd = document.entry("USD").unwrap();
    assert_eq!(usd.name.as_deref(), Some("Доллар США"));
    assert_eq!(usd.num_code.as_deref(), Some("840"));
}

#[test]
fn test_rate_is_value_per_one_unit() {
    let document = RateDocument::from_bytes(&typical_feed("04.03.2024")).unwrap();

    assert_eq!(extract_rate(&document, "USD").unwrap(), dec("91.3336"));
    assert_eq!(extract_rate(&document, "EUR").unwrap(), dec("99.1821"));
    // Quoted per 100 yen
    assert_eq!(extract_rate(&document, "JPY").unwrap(), dec("0.612345"));
}

#[test]
fn test_lookup_is_case_insensitive_on_request() {
    let document = RateDocument::from_bytes(&typical_feed("04.03.2024")).unwrap();
    assert_eq!(
        extract_rate(&document, "eur").unwrap(),
        extract_rate(&document, "EUR").unwrap()
    );
}

#[test]
fn test_unquoted_currency_is_not_found() {
    let document = RateDocument::from_bytes(&typical_feed("04.03.2024")).unwrap();
    assert_eq!(
        extract_rate(&document, "CHF"),
        Err(ExtractionError::CurrencyNotFound("CHF".to_string()))
    );
}

#[test]
fn test_empty_document_has_no_rates() {
    let document = RateDocument::from_bytes(&feed_xml("09.03.2024", &[])).unwrap();
    assert!(document.is_empty());
    assert!(matches!(
        extract_rate(&document, "USD"),
        Err(ExtractionError::CurrencyNotFound(_))
    ));
}

#[test]
fn test_broken_entry_only_affects_its_currency() {
    let document = RateDocument::from_bytes(&feed_xml(
        "04.03.2024",
        &[("USD", "0", "Доллар США", "91,3336"), ("EUR", "1", "Евро", "99,1821")],
    ))
    .unwrap();

    assert!(matches!(
        extract_rate(&document, "USD"),
        Err(ExtractionError::NonPositive { field: "Nominal", .. })
    ));
    assert_eq!(extract_rate(&document, "EUR").unwrap(), dec("99.1821"));
}

#[test]
fn test_truncated_body_is_a_parse_error() {
    let mut body = typical_feed("04.03.2024");
    body.truncate(body.len() / 2);
    assert!(RateDocument::from_bytes(&body).is_err());
}
