//! Integration tests for logging and tracing

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[test]
fn test_tracing_subscriber_initialization() {
    // Another test may have installed a global subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("exchange_rate_downloader=debug")),
        )
        .with_test_writer()
        .try_init();

    info!("subscriber ready");
}

#[test]
fn test_tracing_json_format() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("exchange_rate_downloader=info"))
        .with_test_writer()
        .try_init();

    warn!(date = "2024-03-09", "document without quotes");
}

#[test]
fn test_env_filter_directives_parse() {
    for directive in [
        "info",
        "exchange_rate_downloader=debug",
        "warn,exchange_rate_downloader::collector=trace",
        "exchange_rate_downloader::fetcher=debug,exchange_rate_downloader=info",
    ] {
        assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
    }
}

#[test]
fn test_structured_fields_and_spans() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("exchange_rate_downloader=debug"))
        .with_test_writer()
        .try_init();

    let span = tracing::info_span!("collect", currency = "USD", days = 7);
    let _enter = span.enter();
    debug!(date = %"2024-03-04", value = %"91.3336", "rate extracted");
}
