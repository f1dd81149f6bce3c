//! Columnar batches
//!
//! A [`Batch`] is an ordered list of named, typed columns of equal length.
//! Columns sit behind `Arc`, so replacing one column produces a new batch
//! that shares every other column with the original.

use super::value::{DataType, Value};
use crate::domain::{AnonymizeError, Result};
use std::sync::Arc;

/// A named, typed column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DataType,
    values: Vec<Value>,
}

impl Column {
    /// Create a column with an explicit type
    pub fn new(name: impl Into<String>, dtype: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Create a string column from string slices
    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            DataType::String,
            values.iter().map(|v| Value::from(*v)).collect(),
        )
    }

    /// Create an integer column
    pub fn from_i64s(name: impl Into<String>, values: &[i64]) -> Self {
        Self::new(
            name,
            DataType::Int64,
            values.iter().map(|v| Value::Int64(*v)).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// New column with the same name and the given values
    pub fn with_values(&self, dtype: DataType, values: Vec<Value>) -> Self {
        Self::new(self.name.clone(), dtype, values)
    }

    /// String payloads of the column (`None` for null cells)
    pub fn str_values(&self) -> Vec<Option<&str>> {
        self.values.iter().map(Value::as_str).collect()
    }
}

/// Ordered column names and types, known without evaluating a plan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: Vec<(String, DataType)>,
}

impl Schema {
    pub fn new(fields: Vec<(String, DataType)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, DataType)] {
        &self.fields
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn dtype_of(&self, name: &str) -> Option<DataType> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, dtype)| *dtype)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema with `name` retyped to `dtype`; unknown names are left alone
    pub fn with_dtype(&self, name: &str, dtype: DataType) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(n, t)| {
                if n == name {
                    (n.clone(), dtype)
                } else {
                    (n.clone(), *t)
                }
            })
            .collect();
        Self { fields }
    }
}

/// An immutable tabular frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    columns: Vec<Arc<Column>>,
    height: usize,
}

impl Batch {
    /// Build a batch from columns
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length or a name repeats.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map(Column::len).unwrap_or(0);

        for (i, column) in columns.iter().enumerate() {
            if column.len() != height {
                return Err(AnonymizeError::Frame(format!(
                    "Column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    height
                )));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(AnonymizeError::Frame(format!(
                    "Duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self {
            columns: columns.into_iter().map(Arc::new).collect(),
            height,
        })
    }

    /// Batch with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True if the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.dtype))
                .collect(),
        )
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.as_ref())
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|c| c.as_ref())
    }

    /// New batch with the column of the same name replaced
    ///
    /// The replacement keeps the original column's position. All other
    /// columns are shared with `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if no column has that name or the row count differs.
    pub fn replace_column(&self, column: Column) -> Result<Self> {
        let position = self
            .columns
            .iter()
            .position(|c| c.name == column.name)
            .ok_or_else(|| {
                AnonymizeError::Frame(format!("Column '{}' not found in batch", column.name))
            })?;

        if column.len() != self.height {
            return Err(AnonymizeError::Frame(format!(
                "Replacement column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.height
            )));
        }

        let mut columns = self.columns.clone();
        columns[position] = Arc::new(column);

        Ok(Self {
            columns,
            height: self.height,
        })
    }
}
