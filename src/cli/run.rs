//! Top-level command: configure, collect, preview and export

use crate::collector::SeriesCollector;
use crate::config::{AppConfig, MAX_CONCURRENCY};
use crate::currency::CurrencyCode;
use crate::fetcher::{CbrHttpClient, RateDocumentFetcher};
use crate::output::{export_csv, preview, render_chart, OutputError};
use crate::prompt::{InteractiveConfigurator, PromptDefaults, PromptError, RunParameters};
use crate::range::resolve_start_date;
use crate::validation::{parse_days, parse_start_date};
use chrono::NaiveDate;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use super::CliError;

fn parse_currency_arg(s: &str) -> Result<CurrencyCode, String> {
    CurrencyCode::parse(s).map_err(|e| e.to_string())
}

/// Whole number of at least 1; the upper bound is checked in [`Cli::to_config`]
fn parse_days_arg(s: &str) -> Result<u32, String> {
    parse_days(s, u32::MAX).map_err(|e| e.to_string())
}

fn parse_start_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_start_date(s).map_err(|e| e.to_string())
}

/// Parse and validate concurrency value
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    if value > MAX_CONCURRENCY {
        return Err(format!(
            "concurrency {value} exceeds maximum of {MAX_CONCURRENCY}"
        ));
    }
    Ok(value)
}

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Series collected and exported
    Completed {
        /// Number of snapshots exported
        collected: usize,
    },
    /// Every day was skipped; nothing exported
    NoData,
    /// User left the interactive configuration
    Cancelled,
}

/// Download official central bank exchange rates for one currency
#[derive(Parser, Debug)]
#[command(name = "exchange-rate-downloader", version, about, long_about = None)]
pub struct Cli {
    /// Currency code to collect (e.g. USD, EUR)
    #[arg(long, short = 'c', value_parser = parse_currency_arg)]
    pub currency: Option<CurrencyCode>,

    /// Number of days to collect (1-31)
    #[arg(long, short = 'd', value_parser = parse_days_arg)]
    pub days: Option<u32>,

    /// First date of the range (YYYY-MM-DD); by default the range ends today
    #[arg(long, value_parser = parse_start_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// Skip the interactive prompts and run with flags and defaults only
    #[arg(long, default_value_t = false)]
    pub no_interactive: bool,

    /// CSV destination (default: data/currency_rates.csv)
    #[arg(long)]
    pub csv_output: Option<PathBuf>,

    /// Chart destination (default: plots/currency_rates.svg)
    #[arg(long)]
    pub plot_output: Option<PathBuf>,

    /// Do not render a chart
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    /// Feed endpoint (default: the central bank daily feed)
    #[arg(long)]
    pub feed_url: Option<String>,

    /// Days fetched ahead while the current one is processed (1-8)
    #[arg(long, default_value = "1", value_parser = parse_concurrency)]
    pub concurrency: usize,
}

impl Cli {
    /// Build the run configuration from defaults and flags
    ///
    /// # Errors
    /// [`CliError::ValidationError`] when `--days` exceeds the configured
    /// maximum, [`CliError::InvalidArgument`] for a non-HTTP feed URL.
    pub fn to_config(&self) -> Result<AppConfig, CliError> {
        let mut config = AppConfig::default();

        if let Some(url) = &self.feed_url {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| CliError::InvalidArgument(format!("feed URL '{url}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CliError::InvalidArgument(format!(
                    "feed URL '{url}' must use http or https"
                )));
            }
            config.feed_url = url.clone();
        }
        if let Some(currency) = &self.currency {
            config.default_currency = currency.clone();
        }
        if let Some(days) = self.days {
            config.default_days = days;
        }
        if let Some(path) = &self.csv_output {
            config.csv_output = path.clone();
        }
        if let Some(path) = &self.plot_output {
            config.plot_output = path.clone();
        }
        config.concurrency = self.concurrency;

        config.validate()?;
        Ok(config)
    }

    /// Settle currency, day count and start date
    ///
    /// With `--no-interactive` the flags and defaults are used directly;
    /// otherwise they become the prompt defaults.
    pub fn resolve_parameters<R: BufRead, W: Write>(
        &self,
        config: &AppConfig,
        today: NaiveDate,
        input: R,
        output: W,
    ) -> Result<RunParameters, PromptError> {
        if self.no_interactive {
            let days = config.default_days;
            return Ok(RunParameters {
                currency: config.default_currency.clone(),
                days,
                start_date: resolve_start_date(today, days, self.start_date),
            });
        }

        let defaults = PromptDefaults {
            start_date: self.start_date,
            ..PromptDefaults::from_config(config)
        };
        InteractiveConfigurator::new(config.clone(), today)
            .with_defaults(defaults)
            .run(input, output)
    }

    /// Execute against the live feed, prompting on stdin/stdout
    pub async fn execute(&self, config: &AppConfig) -> Result<RunOutcome, CliError> {
        let today = chrono::Local::now().date_naive();

        let parameters = {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            match self.resolve_parameters(config, today, stdin.lock(), stdout.lock()) {
                Ok(parameters) => parameters,
                Err(PromptError::UserCancelled) => {
                    println!("Cancelled, nothing was downloaded.");
                    return Ok(RunOutcome::Cancelled);
                }
                Err(e) => return Err(e.into()),
            }
        };

        let fetcher = CbrHttpClient::from_config(config)?;
        self.run_pipeline(config, fetcher, &parameters, std::io::stdout())
            .await
    }

    /// Collect the series and hand it to the preview and exporters
    ///
    /// A fetch failure returns before anything is written.
    pub async fn run_pipeline<F: RateDocumentFetcher, W: Write>(
        &self,
        config: &AppConfig,
        fetcher: F,
        parameters: &RunParameters,
        mut output: W,
    ) -> Result<RunOutcome, CliError> {
        let collector = SeriesCollector::new(fetcher)
            .with_concurrency(config.concurrency)
            .with_max_days(config.max_days);
        let series = collector
            .collect(parameters.start_date, parameters.days, &parameters.currency)
            .await?;

        if series.is_empty() {
            writeln!(
                output,
                "No {} rates found between {} and the following {} day(s).",
                parameters.currency, parameters.start_date, parameters.days
            )
            .map_err(|e| OutputError::IoError(format!("Failed to write summary: {}", e)))?;
            return Ok(RunOutcome::NoData);
        }

        preview(&series, &mut output)?;
        export_csv(&series, &config.csv_output)?;
        if !self.no_plot {
            render_chart(&series, &config.plot_output)?;
        }

        info!("Run complete: {} snapshots", series.len());
        Ok(RunOutcome::Completed {
            collected: series.len(),
        })
    }
}
