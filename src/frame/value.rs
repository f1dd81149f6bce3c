//! Cell values and column data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Column with no typed values
    Null,
    /// true/false
    Boolean,
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float64,
    /// UTF-8 string
    String,
}

impl DataType {
    /// Label used in logs and warnings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "bool",
            Self::Int64 => "i64",
            Self::Float64 => "f64",
            Self::String => "str",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    /// Cell read from text that parses as `dtype`, kept as written
    Raw { dtype: DataType, text: String },
}

impl Value {
    /// Typed cell that keeps its source text
    pub fn raw(dtype: DataType, text: impl Into<String>) -> Self {
        Self::Raw {
            dtype,
            text: text.into(),
        }
    }

    /// Data type of this cell; `Null` for missing values
    pub fn dtype(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Boolean(_) => DataType::Boolean,
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::String(_) => DataType::String,
            Self::Raw { dtype, .. } => *dtype,
        }
    }

    /// Check if the cell is missing
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string payload, if this is a string cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell as a string, or `None` for nulls
    pub fn cast_to_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Boolean(b) => Some(b.to_string()),
            Self::Int64(i) => Some(i.to_string()),
            Self::Float64(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Raw { text, .. } => Some(text.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
