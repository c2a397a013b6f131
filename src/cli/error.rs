//! CLI error types and conversions

use crate::collector::CollectError;
use crate::fetcher::FetchError;
use crate::output::OutputError;
use crate::prompt::PromptError;
use crate::validation::ValidationError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Fetch error; aborts the run before anything is exported
    #[error("fetch error: {0}")]
    FetchError(#[from] FetchError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Prompt error
    #[error("prompt error: {0}")]
    PromptError(#[from] PromptError),

    /// Validation error
    #[error("validation error: {0}")]
    ValidationError(#[from] ValidationError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<CollectError> for CliError {
    fn from(error: CollectError) -> Self {
        match error {
            CollectError::Validation(e) => CliError::ValidationError(e),
            CollectError::Fetch(e) => CliError::FetchError(e),
        }
    }
}
