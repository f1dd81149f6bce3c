//! Run summary
//!
//! Counters collected by the pipeline and printed by the `run` command.

use crate::anonymization::BatchWarning;
use std::fmt;
use std::time::Duration;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Batches pulled from the source (empty terminating pages excluded)
    pub batches_read: usize,

    /// Rows evaluated; in a dry run these were collected but not written
    pub rows_written: usize,

    /// Rule applications that produced a stage, summed over batches
    pub rules_applied: usize,

    /// Rule applications skipped because the column was absent
    pub rules_skipped: usize,

    /// Every warning raised, in order
    pub warnings: Vec<BatchWarning>,

    /// Wall time of the run
    pub duration: Duration,

    /// Whether the sink was bypassed
    pub dry_run: bool,

    /// Whether a shutdown signal stopped the run early
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// True if no warning was raised
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            batches_read = self.batches_read,
            rows_written = self.rows_written,
            rules_applied = self.rules_applied,
            rules_skipped = self.rules_skipped,
            warnings = self.warnings.len(),
            duration_secs = self.duration.as_secs_f64(),
            dry_run = self.dry_run,
            interrupted = self.interrupted,
            "Run completed"
        );
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows_label = if self.dry_run {
            "Rows processed"
        } else {
            "Rows written"
        };
        writeln!(f, "Run Summary:")?;
        writeln!(f, "  Batches read: {}", self.batches_read)?;
        writeln!(f, "  {}: {}", rows_label, self.rows_written)?;
        writeln!(f, "  Rules applied: {}", self.rules_applied)?;
        writeln!(f, "  Rules skipped: {}", self.rules_skipped)?;
        writeln!(f, "  Duration: {:.2}s", self.duration.as_secs_f64())?;
        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {}", warning)?;
            }
        }
        Ok(())
    }
}
