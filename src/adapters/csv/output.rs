//! CSV output sink

use crate::adapters::traits::OutputSink;
use crate::config::CsvOutputConfig;
use crate::domain::{OutputError, Result};
use crate::frame::{Batch, LazyBatch, Value};
use async_trait::async_trait;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Writes every batch into one CSV file
///
/// The header comes from the first batch. Later batches must have the same
/// column names in the same order. Nulls are written as empty fields.
#[derive(Debug)]
pub struct CsvOutput {
    path: PathBuf,
    separator: u8,
    writer: Option<csv::Writer<File>>,
    header: Option<Vec<String>>,
    rows_written: usize,
}

impl CsvOutput {
    pub fn new(config: &CsvOutputConfig) -> Self {
        Self::with_separator(&config.path, config.separator_byte())
    }

    pub fn with_separator(path: impl AsRef<Path>, separator: u8) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            separator,
            writer: None,
            header: None,
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn open(&self) -> Result<csv::Writer<File>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.open_failed(e))?;
        }
        let file = File::create(&self.path).map_err(|e| self.open_failed(e))?;
        Ok(csv::WriterBuilder::new()
            .delimiter(self.separator)
            .from_writer(file))
    }

    fn open_failed(&self, err: impl std::fmt::Display) -> OutputError {
        OutputError::OpenFailed {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn write_rows(writer: &mut csv::Writer<File>, batch: &Batch) -> Result<()> {
        let columns: Vec<_> = batch.columns().collect();
        let mut record: Vec<String> = Vec::with_capacity(columns.len());

        for row in 0..batch.height() {
            record.clear();
            record.extend(columns.iter().map(|c| {
                c.get(row)
                    .and_then(Value::cast_to_string)
                    .unwrap_or_default()
            }));
            writer.write_record(&record).map_err(OutputError::from)?;
        }
        Ok(())
    }
}

#[async_trait]
impl OutputSink for CsvOutput {
    async fn write_batch(&mut self, batch: LazyBatch) -> Result<usize> {
        let batch = batch.collect()?;
        let names = batch.column_names();

        if let Some(expected) = &self.header {
            if *expected != names {
                return Err(OutputError::SchemaMismatch {
                    expected: expected.clone(),
                    actual: names,
                }
                .into());
            }
        } else {
            let mut writer = self.open()?;
            writer.write_record(&names).map_err(OutputError::from)?;
            self.writer = Some(writer);
            self.header = Some(names);
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| OutputError::WriteFailed("Output writer already closed".to_string()))?;
        Self::write_rows(writer, &batch)?;

        self.rows_written += batch.height();
        tracing::debug!(
            path = %self.path.display(),
            rows = batch.height(),
            total = self.rows_written,
            "Wrote batch"
        );
        Ok(batch.height())
    }

    async fn finish(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer
                .flush()
                .map_err(|e| OutputError::WriteFailed(e.to_string()))?,
            // No batches: leave an empty file behind
            None if self.header.is_none() => {
                self.open()?;
            }
            None => {}
        }

        tracing::info!(
            path = %self.path.display(),
            rows = self.rows_written,
            "Output written"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}
