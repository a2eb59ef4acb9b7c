//! Writers for the final lead set.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rfqscout_core::{LeadRecord, LEAD_COLUMNS};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Persists an ordered set of lead records.
pub trait OutputSink {
    /// # Errors
    ///
    /// Returns [`OutputError`] if the records cannot be written.
    fn write(&mut self, records: &[LeadRecord]) -> Result<(), OutputError>;
}

/// One header row, then one row per record; every value written as text.
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        let file = create_file(path)?;
        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        Ok(Self { writer })
    }
}

impl OutputSink for CsvSink {
    fn write(&mut self, records: &[LeadRecord]) -> Result<(), OutputError> {
        self.writer.write_record(LEAD_COLUMNS)?;
        for record in records {
            self.writer.write_record(record.to_row())?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// A pretty-printed JSON array keyed by column name.
pub struct JsonSink {
    writer: BufWriter<File>,
}

impl JsonSink {
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            writer: BufWriter::new(create_file(path)?),
        })
    }
}

impl OutputSink for JsonSink {
    fn write(&mut self, records: &[LeadRecord]) -> Result<(), OutputError> {
        serde_json::to_writer_pretty(&mut self.writer, records)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

fn create_file(path: &Path) -> Result<File, OutputError> {
    File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `records` to `path` in `format`.
pub fn write_records(
    format: OutputFormat,
    path: &Path,
    records: &[LeadRecord],
) -> Result<(), OutputError> {
    let mut sink: Box<dyn OutputSink> = match format {
        OutputFormat::Csv => Box::new(CsvSink::create(path)?),
        OutputFormat::Json => Box::new(JsonSink::create(path)?),
    };
    sink.write(records)?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote leads");
    Ok(())
}
