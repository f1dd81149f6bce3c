//! Paginated table source

use crate::adapters::traits::{PageFetcher, Source};
use crate::domain::Result;
use crate::frame::LazyBatch;
use async_trait::async_trait;

/// Iteration state of a paginated read
///
/// The offset advances by exactly the page size after every request,
/// whatever the page held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    offset: usize,
    pages_requested: usize,
    exhausted: bool,
}

impl PageCursor {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn pages_requested(&self) -> usize {
        self.pages_requested
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance(&mut self, page_size: usize) {
        self.offset += page_size;
        self.pages_requested += 1;
    }

    fn exhaust(&mut self) {
        self.exhausted = true;
    }
}

/// Reads a table page by page with `LIMIT`/`OFFSET`
///
/// The first empty page ends the sequence and is never yielded.
pub struct PaginatedQuerySource<F: PageFetcher> {
    fetcher: F,
    page_size: usize,
    cursor: PageCursor,
}

impl<F: PageFetcher> PaginatedQuerySource<F> {
    pub fn new(fetcher: F, page_size: usize) -> Self {
        Self {
            fetcher,
            page_size,
            cursor: PageCursor::default(),
        }
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[async_trait]
impl<F: PageFetcher> Source for PaginatedQuerySource<F> {
    async fn next_batch(&mut self) -> Result<Option<LazyBatch>> {
        if self.cursor.is_exhausted() {
            return Ok(None);
        }

        let offset = self.cursor.offset();
        let page = self.fetcher.fetch_page(self.page_size, offset).await?;
        self.cursor.advance(self.page_size);

        if page.is_empty() {
            self.cursor.exhaust();
            tracing::info!(
                source = %self.fetcher.describe(),
                pages = self.cursor.pages_requested() - 1,
                "Source exhausted"
            );
            return Ok(None);
        }

        tracing::info!(
            offset,
            rows = page.height(),
            page_size = self.page_size,
            "Fetched page"
        );
        Ok(Some(LazyBatch::from_batch(page)))
    }

    fn is_paginated(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!(
            "{} (page size {})",
            self.fetcher.describe(),
            self.page_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnonymizeError, SourceError};
    use crate::frame::{Batch, Column};
    use std::sync::{Arc, Mutex};

    /// Serves `rows` total rows in pages and records every requested offset
    struct MockFetcher {
        rows: usize,
        offsets: Arc<Mutex<Vec<usize>>>,
        fail_at: Option<usize>,
    }

    impl MockFetcher {
        fn new(rows: usize) -> (Self, Arc<Mutex<Vec<usize>>>) {
            let offsets = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    rows,
                    offsets: offsets.clone(),
                    fail_at: None,
                },
                offsets,
            )
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Batch> {
            self.offsets.lock().unwrap().push(offset);
            if self.fail_at == Some(offset) {
                return Err(SourceError::QueryFailed("boom".to_string()).into());
            }
            let ids: Vec<i64> = (offset..self.rows.min(offset + limit))
                .map(|i| i as i64)
                .collect();
            if ids.is_empty() {
                return Ok(Batch::empty());
            }
            Batch::new(vec![Column::from_i64s("id", &ids)])
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }

    async fn drain<F: PageFetcher>(source: &mut PaginatedQuerySource<F>) -> Vec<usize> {
        let mut heights = Vec::new();
        while let Some(batch) = source.next_batch().await.unwrap() {
            heights.push(batch.collect().unwrap().height());
        }
        heights
    }

    #[tokio::test]
    async fn test_offsets_advance_by_page_size() {
        let (fetcher, offsets) = MockFetcher::new(250);
        let mut source = PaginatedQuerySource::new(fetcher, 100);

        let heights = drain(&mut source).await;

        assert_eq!(heights, vec![100, 100, 50]);
        assert_eq!(*offsets.lock().unwrap(), vec![0, 100, 200, 300]);
        assert_eq!(source.cursor().offset(), 400);
        assert!(source.cursor().is_exhausted());
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_one_empty_page() {
        let (fetcher, offsets) = MockFetcher::new(200);
        let mut source = PaginatedQuerySource::new(fetcher, 100);

        assert_eq!(drain(&mut source).await, vec![100, 100]);
        assert_eq!(*offsets.lock().unwrap(), vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn test_empty_table() {
        let (fetcher, offsets) = MockFetcher::new(0);
        let mut source = PaginatedQuerySource::new(fetcher, 10);

        assert!(source.next_batch().await.unwrap().is_none());
        assert_eq!(*offsets.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_no_requests_after_exhaustion() {
        let (fetcher, offsets) = MockFetcher::new(5);
        let mut source = PaginatedQuerySource::new(fetcher, 10);

        drain(&mut source).await;
        assert!(source.next_batch().await.unwrap().is_none());
        assert!(source.next_batch().await.unwrap().is_none());
        assert_eq!(*offsets.lock().unwrap(), vec![0, 10]);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let (mut fetcher, _offsets) = MockFetcher::new(300);
        fetcher.fail_at = Some(100);
        let mut source = PaginatedQuerySource::new(fetcher, 100);

        assert!(source.next_batch().await.unwrap().is_some());
        let result = source.next_batch().await;
        assert!(matches!(
            result,
            Err(AnonymizeError::Source(SourceError::QueryFailed(_)))
        ));
        assert!(source.is_paginated());
    }
}
