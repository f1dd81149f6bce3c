//! Source and sink traits
//!
//! These traits are the seams between the pipeline and the outside world.
//! The pipeline only ever sees `Box<dyn Source>` and `Box<dyn OutputSink>`.

use crate::domain::Result;
use crate::frame::{Batch, LazyBatch};
use async_trait::async_trait;

/// A finite sequence of batches
///
/// `Ok(None)` marks the end of the sequence and is returned again on every
/// later call. `Err(_)` is a read failure and is never retried.
#[async_trait]
pub trait Source: Send {
    /// Next batch, not yet materialized
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file or database read fails.
    async fn next_batch(&mut self) -> Result<Option<LazyBatch>>;

    /// Whether the source reads in pages
    fn is_paginated(&self) -> bool;

    /// Description for logs; never contains credentials
    fn describe(&self) -> String;
}

/// Consumer of the transformed stream
///
/// `write_batch` is where plans are evaluated.
#[async_trait]
pub trait OutputSink: Send {
    /// Evaluate and write one batch, returning the rows written
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation or writing fails, or if the batch does
    /// not fit what has been written so far.
    async fn write_batch(&mut self, batch: LazyBatch) -> Result<usize>;

    /// Flush and close the destination
    async fn finish(&mut self) -> Result<()>;

    /// Description for logs
    fn describe(&self) -> String;

    /// Write every batch in order, then finish
    async fn write_data(&mut self, batches: Vec<LazyBatch>) -> Result<usize> {
        let mut rows = 0;
        for batch in batches {
            rows += self.write_batch(batch).await?;
        }
        self.finish().await?;
        Ok(rows)
    }
}

/// One page of a table read with `LIMIT`/`OFFSET`
///
/// Implemented by [`PostgreSQLClient`](crate::adapters::postgresql::PostgreSQLClient);
/// tests substitute an in-memory fetcher.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch at most `limit` rows starting at row `offset`
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the query fails.
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Batch>;

    /// Description for logs; never contains credentials
    fn describe(&self) -> String;
}
