//! Series writers: console preview, CSV export and chart rendering
//!
//! All writers take the ordered snapshot slice produced by the collector and
//! do nothing for an empty series.

use crate::RateSnapshot;
use std::io::Write;
use std::path::Path;

pub mod chart;
pub mod csv;

pub use self::chart::render_chart;
pub use self::csv::{export_csv, CsvRatesWriter};

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Chart drawing error
    #[error("chart error: {0}")]
    ChartError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer
pub trait OutputWriter {
    /// Flush any buffered data to disk
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Writer for rate snapshots
pub trait RatesWriter: OutputWriter {
    /// Write a single snapshot
    fn write_rate(&mut self, snapshot: &RateSnapshot) -> OutputResult<()>;

    /// Write several snapshots in order
    fn write_rates(&mut self, snapshots: &[RateSnapshot]) -> OutputResult<()> {
        for snapshot in snapshots {
            self.write_rate(snapshot)?;
        }
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one
pub fn ensure_parent_dir(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            OutputError::IoError(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }
    Ok(())
}

/// Print one `YYYY-MM-DD | CUR: 12.3456` line per snapshot
pub fn preview<W: Write>(records: &[RateSnapshot], mut writer: W) -> OutputResult<()> {
    for snapshot in records {
        writeln!(
            writer,
            "{} | {}: {:.4}",
            snapshot.date.format("%Y-%m-%d"),
            snapshot.currency,
            snapshot.value.round_dp(4)
        )
        .map_err(|e| OutputError::IoError(format!("Failed to write preview: {}", e)))?;
    }
    writer
        .flush()
        .map_err(|e| OutputError::IoError(format!("Failed to flush preview: {}", e)))
}
