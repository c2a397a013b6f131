//! CSV output writer for rate series

use crate::RateSnapshot;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{ensure_parent_dir, OutputError, OutputResult, OutputWriter, RatesWriter};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// CSV record for one snapshot
#[derive(Debug, Serialize)]
struct RateRecord {
    date: String,
    currency: String,
    value: String,
}

impl From<&RateSnapshot> for RateRecord {
    fn from(snapshot: &RateSnapshot) -> Self {
        Self {
            date: snapshot.date.format("%Y-%m-%d").to_string(),
            currency: snapshot.currency.to_string(),
            value: snapshot.value.to_string(),
        }
    }
}

/// CSV writer producing `date,currency,value` rows
pub struct CsvRatesWriter {
    writer: Writer<BufWriter<File>>,
    rates_written: u64,
}

impl CsvRatesWriter {
    /// Create a new CSV writer, creating parent directories as needed
    ///
    /// The header is written together with the first row.
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new CSV writer with a custom buffer size
    pub fn new_with_buffer_size<P: AsRef<Path>>(path: P, buffer_size: usize) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        ensure_parent_dir(path)?;

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        let buf_writer = BufWriter::with_capacity(buffer_size, file);
        Ok(Self {
            writer: Writer::from_writer(buf_writer),
            rates_written: 0,
        })
    }

    /// Get number of rows written so far
    pub fn rates_written(&self) -> u64 {
        self.rates_written
    }
}

impl RatesWriter for CsvRatesWriter {
    fn write_rate(&mut self, snapshot: &RateSnapshot) -> OutputResult<()> {
        self.writer
            .serialize(RateRecord::from(snapshot))
            .map_err(|e| OutputError::CsvError(format!("Failed to write rate: {}", e)))?;

        self.rates_written += 1;
        Ok(())
    }
}

impl OutputWriter for CsvRatesWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush: {}", e)))
    }

    fn close(mut self) -> OutputResult<()> {
        debug!("Closing CSV writer: {} rates written", self.rates_written);

        self.flush()?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {}", e)))?;

        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {}", e)))?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        Ok(())
    }
}

/// Write `records` to `destination` as CSV
///
/// An empty series writes nothing: no file and no header. Returns the number
/// of rows written.
pub fn export_csv<P: AsRef<Path>>(records: &[RateSnapshot], destination: P) -> OutputResult<u64> {
    let destination = destination.as_ref();
    if records.is_empty() {
        debug!("No rates to export, skipping {}", destination.display());
        return Ok(0);
    }

    let mut writer = CsvRatesWriter::new(destination)?;
    writer.write_rates(records)?;
    let written = writer.rates_written();
    writer.close()?;

    info!("Exported {} rates to {}", written, destination.display());
    Ok(written)
}
