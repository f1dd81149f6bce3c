//! Pipeline - drives batches from the source through the engine into the sink
//!
//! Only one batch is in flight at a time: a batch is pulled, planned and
//! written before the next one is requested.

use crate::adapters::factory::{create_output, create_source};
use crate::adapters::traits::{OutputSink, Source};
use crate::anonymization::{AnonymizationEngine, Generator};
use crate::config::ColmaskConfig;
use crate::core::summary::RunSummary;
use crate::domain::Result;
use std::time::Instant;
use tokio::sync::watch;

/// Source, engine and sink for one run
///
/// In a dry run there is no sink: every plan is collected and discarded.
pub struct Pipeline {
    source: Box<dyn Source>,
    engine: AnonymizationEngine,
    sink: Option<Box<dyn OutputSink>>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn Source>,
        engine: AnonymizationEngine,
        sink: Box<dyn OutputSink>,
    ) -> Self {
        Self {
            source,
            engine,
            sink: Some(sink),
            shutdown: None,
        }
    }

    /// Pipeline that evaluates every batch without writing it
    pub fn dry_run(source: Box<dyn Source>, engine: AnonymizationEngine) -> Self {
        Self {
            source,
            engine,
            sink: None,
            shutdown: None,
        }
    }

    /// Build the pipeline described by the configuration
    ///
    /// Rules are compiled before the source is created, so an invalid rule
    /// fails the run before any connection is opened.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid rule, or a source error
    /// if the source cannot be reached.
    pub async fn from_config(config: &ColmaskConfig) -> Result<Self> {
        let generator = Generator::from_seed_opt(config.application.seed);
        let engine = AnonymizationEngine::new(&config.rules, generator)?;
        let source = create_source(&config.source).await?;

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            Ok(Self::dry_run(source, engine))
        } else {
            Ok(Self::new(source, engine, create_output(&config.output)))
        }
    }

    /// Stop between batches once the receiver reads `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.sink.is_none()
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Run until the source is exhausted
    ///
    /// The sink is finished even when a shutdown signal stops the run early.
    ///
    /// # Errors
    ///
    /// Source, evaluation and sink failures are fatal and returned as-is.
    pub async fn run(mut self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new(self.is_dry_run());

        tracing::info!(
            source = %self.source.describe(),
            sink = %self
                .sink
                .as_ref()
                .map(|s| s.describe())
                .unwrap_or_else(|| "none (dry run)".to_string()),
            rules = self.engine.len(),
            "Starting anonymization run"
        );

        loop {
            if self.shutdown_requested() {
                tracing::info!(
                    batches_read = summary.batches_read,
                    "Shutdown requested, stopping before next batch"
                );
                summary.interrupted = true;
                break;
            }

            let Some(batch) = self.source.next_batch().await? else {
                break;
            };
            summary.batches_read += 1;

            let planned = self.engine.apply(batch)?;
            summary.rules_applied += planned.applied;
            summary.rules_skipped += planned.skipped();
            summary.warnings.extend(planned.warnings);

            let rows = match self.sink.as_mut() {
                Some(sink) => sink.write_batch(planned.plan).await?,
                None => planned.plan.collect()?.height(),
            };
            summary.rows_written += rows;

            tracing::debug!(
                batch = summary.batches_read,
                rows,
                "Batch processed"
            );
        }

        if let Some(sink) = self.sink.as_mut() {
            sink.finish().await?;
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}
