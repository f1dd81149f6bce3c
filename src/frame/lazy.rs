//! Deferred batch plans
//!
//! A [`LazyBatch`] is a scan plus an ordered list of column stages. Building
//! one never touches the data; [`LazyBatch::collect`] is the only operation
//! that reads the scan and runs the stages.

use super::batch::{Batch, Column, Schema};
use super::value::DataType;
use crate::domain::{AnonymizeError, Result};
use std::fmt;
use std::sync::Arc;

/// A column-level operation that can be deferred in a plan
pub trait ColumnOp: Send + Sync + fmt::Debug {
    /// Short name for plan descriptions and logs
    fn name(&self) -> &str;

    /// Output type given the input column type
    fn output_dtype(&self, input: DataType) -> DataType;

    /// Compute the replacement column
    fn apply(&self, column: &Column) -> Result<Column>;
}

/// A data source whose rows are read only when the plan is collected
pub trait BatchScan: Send + Sync + fmt::Debug {
    /// Schema of the rows the scan will produce
    fn schema(&self) -> &Schema;

    /// Read the full batch
    fn materialize(&self) -> Result<Batch>;

    /// Human-readable description for plan output
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
enum Scan {
    Memory(Batch),
    Deferred(Arc<dyn BatchScan>),
}

#[derive(Debug, Clone)]
struct Stage {
    column: String,
    op: Arc<dyn ColumnOp>,
}

/// A deferred batch: scan + ordered column stages
#[derive(Debug, Clone)]
pub struct LazyBatch {
    scan: Scan,
    stages: Vec<Stage>,
    schema: Schema,
}

impl LazyBatch {
    /// Plan over an already materialized batch
    pub fn from_batch(batch: Batch) -> Self {
        let schema = batch.schema();
        Self {
            scan: Scan::Memory(batch),
            stages: Vec::new(),
            schema,
        }
    }

    /// Plan over a deferred scan
    pub fn from_scan(scan: Arc<dyn BatchScan>) -> Self {
        let schema = scan.schema().clone();
        Self {
            scan: Scan::Deferred(scan),
            stages: Vec::new(),
            schema,
        }
    }

    /// Schema after all stages appended so far
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of deferred stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Append a stage replacing `column` with the output of `op`
    ///
    /// # Errors
    ///
    /// Returns an error if `column` is not in the current schema.
    pub fn with_column_op(mut self, column: &str, op: Arc<dyn ColumnOp>) -> Result<Self> {
        let input = self.schema.dtype_of(column).ok_or_else(|| {
            AnonymizeError::Frame(format!("Column '{column}' not found in plan schema"))
        })?;

        self.schema = self.schema.with_dtype(column, op.output_dtype(input));
        self.stages.push(Stage {
            column: column.to_string(),
            op,
        });
        Ok(self)
    }

    /// Evaluate the plan
    ///
    /// Reads the scan, then runs each stage in declaration order so every
    /// stage sees the output of the previous one.
    pub fn collect(self) -> Result<Batch> {
        let mut batch = match self.scan {
            Scan::Memory(batch) => batch,
            Scan::Deferred(scan) => scan.materialize()?,
        };

        for stage in &self.stages {
            let input = batch.column(&stage.column).ok_or_else(|| {
                AnonymizeError::Dispatch(format!(
                    "Column '{}' disappeared before stage '{}'",
                    stage.column,
                    stage.op.name()
                ))
            })?;
            let output = stage.op.apply(input)?;
            if output.len() != input.len() {
                return Err(AnonymizeError::Dispatch(format!(
                    "Stage '{}' on column '{}' produced {} rows from {}",
                    stage.op.name(),
                    stage.column,
                    output.len(),
                    input.len()
                )));
            }
            batch = batch.replace_column(output)?;
        }

        Ok(batch)
    }

    /// One line per plan node, scan first
    pub fn describe_plan(&self) -> String {
        let mut lines = vec![match &self.scan {
            Scan::Memory(batch) => format!(
                "SCAN memory [{} rows x {} cols]",
                batch.height(),
                batch.width()
            ),
            Scan::Deferred(scan) => format!("SCAN {}", scan.describe()),
        }];
        for stage in &self.stages {
            lines.push(format!("  WITH {} <- {}", stage.column, stage.op.name()));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Upper;

    impl ColumnOp for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn output_dtype(&self, _input: DataType) -> DataType {
            DataType::String
        }

        fn apply(&self, column: &Column) -> Result<Column> {
            let values = column
                .values()
                .iter()
                .map(|v| Value::from(v.cast_to_string().map(|s| s.to_uppercase())))
                .collect();
            Ok(column.with_values(DataType::String, values))
        }
    }

    #[derive(Debug)]
    struct CountingScan {
        schema: Schema,
        reads: AtomicUsize,
    }

    impl BatchScan for CountingScan {
        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn materialize(&self) -> Result<Batch> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Batch::new(vec![Column::from_strs("name", &["ann", "bob"])])
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn test_with_column_op_updates_schema_without_evaluating() {
        let scan = Arc::new(CountingScan {
            schema: Schema::new(vec![("name".to_string(), DataType::String)]),
            reads: AtomicUsize::new(0),
        });
        let plan = LazyBatch::from_scan(scan.clone())
            .with_column_op("name", Arc::new(Upper))
            .unwrap();

        assert_eq!(plan.stage_count(), 1);
        assert_eq!(scan.reads.load(Ordering::SeqCst), 0);

        let batch = plan.collect().unwrap();
        assert_eq!(scan.reads.load(Ordering::SeqCst), 1);
        assert_eq!(
            batch.column("name").unwrap().str_values(),
            vec![Some("ANN"), Some("BOB")]
        );
    }

    #[test]
    fn test_with_column_op_unknown_column() {
        let batch = Batch::new(vec![Column::from_strs("name", &["a"])]).unwrap();
        let result = LazyBatch::from_batch(batch).with_column_op("email", Arc::new(Upper));
        assert!(result.is_err());
    }

    #[test]
    fn test_integer_column_retyped_in_schema() {
        let batch = Batch::new(vec![Column::from_i64s("id", &[1, 2])]).unwrap();
        let plan = LazyBatch::from_batch(batch)
            .with_column_op("id", Arc::new(Upper))
            .unwrap();
        assert_eq!(plan.schema().dtype_of("id"), Some(DataType::String));
        assert!(plan.describe_plan().contains("WITH id <- upper"));
    }
}
