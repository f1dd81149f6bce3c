//! One-shot CSV file source

use super::scan::CsvScan;
use crate::adapters::traits::Source;
use crate::config::CsvSourceConfig;
use crate::domain::{Result, SourceError};
use crate::frame::{BatchScan, LazyBatch};
use async_trait::async_trait;
use std::sync::Arc;

/// Yields the whole file as a single lazy batch, then ends
#[derive(Debug)]
pub struct FileSource {
    config: CsvSourceConfig,
    exhausted: bool,
}

impl FileSource {
    pub fn new(config: CsvSourceConfig) -> Self {
        Self {
            config,
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Plan a scan of the file
    ///
    /// Only the header and the inference sample are read here.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Exhausted`] if the file was already handed out,
    /// or a CSV error if the header or sample cannot be read.
    pub fn read_data(&mut self) -> Result<LazyBatch> {
        if self.exhausted {
            return Err(SourceError::Exhausted(self.config.path.clone()).into());
        }

        let scan = CsvScan::open(
            &self.config.path,
            self.config.separator_byte(),
            self.config.infer_schema_rows,
        )?;
        self.exhausted = true;

        tracing::info!(
            path = %self.config.path,
            columns = scan.schema().len(),
            "Scanning CSV file"
        );
        Ok(LazyBatch::from_scan(Arc::new(scan)))
    }
}

#[async_trait]
impl Source for FileSource {
    async fn next_batch(&mut self) -> Result<Option<LazyBatch>> {
        if self.exhausted {
            return Ok(None);
        }
        self.read_data().map(Some)
    }

    fn is_paginated(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.config.path)
    }
}
