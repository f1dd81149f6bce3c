//! Row to batch conversion
//!
//! Maps PostgreSQL column types onto frame [`DataType`]s. Types without a
//! native cell type (UUID, dates, times, intervals, JSON) are carried as
//! strings. `NUMERIC` is a float column that keeps its exact decimal text.

use crate::domain::{Result, SourceError};
use crate::frame::{Batch, Column, DataType, Value};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::Row;

/// Supported PostgreSQL column kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    Json,
}

impl PgKind {
    /// Kind for a PostgreSQL type, `None` if unsupported
    pub fn of(ty: &Type) -> Option<Self> {
        let kind = if *ty == Type::BOOL {
            Self::Bool
        } else if *ty == Type::INT2 {
            Self::Int2
        } else if *ty == Type::INT4 {
            Self::Int4
        } else if *ty == Type::INT8 {
            Self::Int8
        } else if *ty == Type::FLOAT4 {
            Self::Float4
        } else if *ty == Type::FLOAT8 {
            Self::Float8
        } else if *ty == Type::NUMERIC {
            Self::Numeric
        } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
            Self::Text
        } else if *ty == Type::UUID {
            Self::Uuid
        } else if *ty == Type::DATE {
            Self::Date
        } else if *ty == Type::TIME {
            Self::Time
        } else if *ty == Type::TIMESTAMP {
            Self::Timestamp
        } else if *ty == Type::TIMESTAMPTZ {
            Self::TimestampTz
        } else if *ty == Type::INTERVAL {
            Self::Interval
        } else if *ty == Type::JSON || *ty == Type::JSONB {
            Self::Json
        } else {
            return None;
        };
        Some(kind)
    }

    /// Frame type the column is loaded as
    pub fn dtype(&self) -> DataType {
        match self {
            Self::Bool => DataType::Boolean,
            Self::Int2 | Self::Int4 | Self::Int8 => DataType::Int64,
            Self::Float4 | Self::Float8 | Self::Numeric => DataType::Float64,
            Self::Text
            | Self::Uuid
            | Self::Date
            | Self::Time
            | Self::Timestamp
            | Self::TimestampTz
            | Self::Interval
            | Self::Json => DataType::String,
        }
    }
}

/// Convert a page of rows into a batch
///
/// An empty page yields an empty batch with no columns.
///
/// # Errors
///
/// Returns an error for an unsupported column type or a cell that cannot be
/// decoded.
pub fn rows_to_batch(rows: &[Row], offset: usize) -> Result<Batch> {
    let Some(first) = rows.first() else {
        return Ok(Batch::empty());
    };

    let mut columns = Vec::with_capacity(first.columns().len());
    for (index, column) in first.columns().iter().enumerate() {
        let kind = PgKind::of(column.type_()).ok_or_else(|| SourceError::UnsupportedType {
            column: column.name().to_string(),
            type_name: column.type_().name().to_string(),
        })?;

        let values = rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                read_cell(row, index, kind).map_err(|e| SourceError::Parse {
                    row: offset + row_index + 1,
                    column: column.name().to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        columns.push(Column::new(column.name(), kind.dtype(), values));
    }

    Batch::new(columns)
}

fn read_cell(
    row: &Row,
    index: usize,
    kind: PgKind,
) -> std::result::Result<Value, tokio_postgres::Error> {
    let value = match kind {
        PgKind::Bool => get::<bool>(row, index)?.map(Value::Boolean),
        PgKind::Int2 => get::<i16>(row, index)?.map(|v| Value::Int64(i64::from(v))),
        PgKind::Int4 => get::<i32>(row, index)?.map(|v| Value::Int64(i64::from(v))),
        PgKind::Int8 => get::<i64>(row, index)?.map(Value::Int64),
        PgKind::Float4 => get::<f32>(row, index)?.map(|v| Value::Float64(f64::from(v))),
        PgKind::Float8 => get::<f64>(row, index)?.map(Value::Float64),
        PgKind::Numeric => {
            get::<Decimal>(row, index)?.map(|v| Value::raw(DataType::Float64, v.to_string()))
        }
        PgKind::Text => get::<String>(row, index)?.map(Value::String),
        PgKind::Uuid => get::<uuid::Uuid>(row, index)?.map(|v| Value::String(v.to_string())),
        PgKind::Date => {
            get::<chrono::NaiveDate>(row, index)?.map(|v| Value::String(v.to_string()))
        }
        PgKind::Time => {
            get::<chrono::NaiveTime>(row, index)?.map(|v| Value::String(v.to_string()))
        }
        PgKind::Timestamp => {
            get::<chrono::NaiveDateTime>(row, index)?.map(|v| Value::String(v.to_string()))
        }
        PgKind::TimestampTz => get::<chrono::DateTime<chrono::Utc>>(row, index)?
            .map(|v| Value::String(v.to_rfc3339())),
        PgKind::Interval => {
            get::<PgInterval>(row, index)?.map(|v| Value::String(v.to_string()))
        }
        PgKind::Json => {
            get::<serde_json::Value>(row, index)?.map(|v| Value::String(v.to_string()))
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

fn get<'a, T: FromSql<'a>>(
    row: &'a Row,
    index: usize,
) -> std::result::Result<Option<T>, tokio_postgres::Error> {
    row.try_get::<_, Option<T>>(index)
}

/// Binary `INTERVAL` value, rendered in PostgreSQL's default output style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgInterval {
    pub months: i32,
    pub days: i32,
    pub microseconds: i64,
}

impl<'a> FromSql<'a> for PgInterval {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> std::result::Result<Self, Box<dyn Error + Sync + Send>> {
        if raw.len() != 16 {
            return Err(format!("invalid interval length {}", raw.len()).into());
        }
        let (micros, rest) = raw.split_at(8);
        let (days, months) = rest.split_at(4);
        Ok(Self {
            microseconds: i64::from_be_bytes(micros.try_into()?),
            days: i32::from_be_bytes(days.try_into()?),
            months: i32::from_be_bytes(months.try_into()?),
        })
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::INTERVAL
    }
}

impl fmt::Display for PgInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let years = self.months / 12;
        let months = self.months % 12;
        for (amount, unit) in [(years, "year"), (months, "mon"), (self.days, "day")] {
            if amount != 0 {
                let plural = if amount == 1 { "" } else { "s" };
                parts.push(format!("{amount} {unit}{plural}"));
            }
        }

        if self.microseconds != 0 || parts.is_empty() {
            let sign = if self.microseconds < 0 { "-" } else { "" };
            let total = self.microseconds.unsigned_abs();
            let seconds = total / 1_000_000;
            let fraction = total % 1_000_000;
            let mut clock = format!(
                "{sign}{:02}:{:02}:{:02}",
                seconds / 3600,
                seconds / 60 % 60,
                seconds % 60
            );
            if fraction != 0 {
                let digits = format!("{fraction:06}");
                clock.push('.');
                clock.push_str(digits.trim_end_matches('0'));
            }
            parts.push(clock);
        }

        f.write_str(&parts.join(" "))
    }
}
