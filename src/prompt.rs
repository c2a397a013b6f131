//! Interactive run configuration
//!
//! A line-oriented state machine:
//!
//! ```text
//! AskCurrency -> AskDays -> AskStartDate -> Done
//! ```
//!
//! Each state consumes one trimmed line. An exit keyword cancels everything, an
//! empty line takes the default, anything else is validated and either
//! advances or re-prompts in the same state. [`InteractiveConfigurator::transition`]
//! is pure; [`InteractiveConfigurator::run`] wires it to a reader and writer.

use crate::config::AppConfig;
use crate::currency::CurrencyCode;
use crate::range::resolve_start_date;
use crate::validation::{check_days, parse_days, parse_start_date, ValidationError, INPUT_DATE_FORMAT};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::debug;

/// Errors ending the interactive configuration
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// User typed an exit keyword or closed the input
    #[error("configuration cancelled by user")]
    UserCancelled,

    /// Prompt could not be written or input could not be read
    #[error("prompt IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameters needed by the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    /// Currency to collect
    pub currency: CurrencyCode,
    /// Number of days in the range
    pub days: u32,
    /// First date of the range
    pub start_date: NaiveDate,
}

/// Prompt state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    /// Waiting for a currency code
    AskCurrency,
    /// Waiting for a day count
    AskDays {
        /// Confirmed currency
        currency: CurrencyCode,
    },
    /// Waiting for a start date
    AskStartDate {
        /// Confirmed currency
        currency: CurrencyCode,
        /// Confirmed day count
        days: u32,
    },
    /// All answers collected
    Done(RunParameters),
}

/// Outcome of feeding one line to a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Input accepted; continue from the new state
    Advance(PromptState),
    /// Input rejected; ask again in the same state
    Reprompt {
        /// Unchanged state
        state: PromptState,
        /// Why the input was rejected
        error: ValidationError,
    },
    /// Exit keyword entered
    Cancelled,
}

/// Values offered when the user just presses enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDefaults {
    /// Default currency
    pub currency: CurrencyCode,
    /// Default day count
    pub days: u32,
    /// Fixed default start date; `None` derives it from the confirmed day count
    pub start_date: Option<NaiveDate>,
}

impl PromptDefaults {
    /// Defaults taken from the run configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            currency: config.default_currency.clone(),
            days: config.default_days,
            start_date: None,
        }
    }
}

/// Drives the prompt state machine
#[derive(Debug, Clone)]
pub struct InteractiveConfigurator {
    config: AppConfig,
    defaults: PromptDefaults,
    today: NaiveDate,
}

impl InteractiveConfigurator {
    /// Create a configurator whose defaults come from `config`
    ///
    /// `today` anchors the computed start date.
    pub fn new(config: AppConfig, today: NaiveDate) -> Self {
        let defaults = PromptDefaults::from_config(&config);
        Self {
            config,
            defaults,
            today,
        }
    }

    /// Override the offered defaults (e.g. with command-line values)
    pub fn with_defaults(mut self, defaults: PromptDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Offered defaults
    pub fn defaults(&self) -> &PromptDefaults {
        &self.defaults
    }

    /// Start date offered after `days` has been confirmed
    pub fn default_start(&self, days: u32) -> NaiveDate {
        resolve_start_date(self.today, days, self.defaults.start_date)
    }

    /// Prompt text for `state`, or `None` once done
    pub fn prompt(&self, state: &PromptState) -> Option<String> {
        let exit = self.config.exit_keywords.join("/");
        match state {
            PromptState::AskCurrency => Some(format!(
                "Currency code [{}] ({exit} to quit): ",
                self.defaults.currency
            )),
            PromptState::AskDays { .. } => Some(format!(
                "Number of days, 1-{} [{}]: ",
                self.config.max_days, self.defaults.days
            )),
            PromptState::AskStartDate { days, .. } => Some(format!(
                "Start date YYYY-MM-DD [{}] (empty or '{}' for the computed date): ",
                self.default_start(*days).format(INPUT_DATE_FORMAT),
                self.config.auto_keyword
            )),
            PromptState::Done(_) => None,
        }
    }

    /// Apply one line of input to `state`
    pub fn transition(&self, state: PromptState, input: &str) -> Transition {
        let input = input.trim();
        if self.config.is_exit_keyword(input) {
            return Transition::Cancelled;
        }

        match state {
            PromptState::AskCurrency => {
                if input.is_empty() {
                    return Transition::Advance(PromptState::AskDays {
                        currency: self.defaults.currency.clone(),
                    });
                }
                match CurrencyCode::parse(input) {
                    Ok(currency) => Transition::Advance(PromptState::AskDays { currency }),
                    Err(error) => Transition::Reprompt {
                        state: PromptState::AskCurrency,
                        error,
                    },
                }
            }
            PromptState::AskDays { currency } => {
                let parsed = if input.is_empty() {
                    check_days(i64::from(self.defaults.days), self.config.max_days)
                } else {
                    parse_days(input, self.config.max_days)
                };
                match parsed {
                    Ok(days) => Transition::Advance(PromptState::AskStartDate { currency, days }),
                    Err(error) => Transition::Reprompt {
                        state: PromptState::AskDays { currency },
                        error,
                    },
                }
            }
            PromptState::AskStartDate { currency, days } => {
                if input.is_empty() || self.config.is_auto_keyword(input) {
                    let start_date = self.default_start(days);
                    return Transition::Advance(PromptState::Done(RunParameters {
                        currency,
                        days,
                        start_date,
                    }));
                }
                match parse_start_date(input) {
                    Ok(start_date) => Transition::Advance(PromptState::Done(RunParameters {
                        currency,
                        days,
                        start_date,
                    })),
                    Err(error) => Transition::Reprompt {
                        state: PromptState::AskStartDate { currency, days },
                        error,
                    },
                }
            }
            done @ PromptState::Done(_) => Transition::Advance(done),
        }
    }

    /// Ask every question on `output`, reading answers from `input`
    ///
    /// Closed input counts as cancellation.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<RunParameters, PromptError> {
        let mut state = PromptState::AskCurrency;
        let mut line = String::new();

        loop {
            let Some(text) = self.prompt(&state) else {
                break;
            };
            write!(output, "{text}")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("Input closed during configuration");
                writeln!(output)?;
                return Err(PromptError::UserCancelled);
            }

            state = match self.transition(state, &line) {
                Transition::Advance(next) => next,
                Transition::Reprompt { state, error } => {
                    writeln!(output, "  {error}")?;
                    state
                }
                Transition::Cancelled => return Err(PromptError::UserCancelled),
            };
        }

        match state {
            PromptState::Done(parameters) => {
                debug!(
                    "Configured: currency={}, days={}, start={}",
                    parameters.currency, parameters.days, parameters.start_date
                );
                Ok(parameters)
            }
            // prompt() only returns None for Done
            _ => Err(PromptError::UserCancelled),
        }
    }
}
