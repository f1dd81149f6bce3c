//! Deferred CSV scan with schema inference

use crate::domain::{AnonymizeError, Result, SourceError};
use crate::frame::{Batch, BatchScan, Column, DataType, Schema, Value};
use std::fs::File;
use std::path::{Path, PathBuf};

/// A CSV file whose schema is known and whose rows are read on collect
#[derive(Debug, Clone)]
pub struct CsvScan {
    path: PathBuf,
    separator: u8,
    schema: Schema,
}

impl CsvScan {
    /// Read the header and the first `infer_rows` records to infer a schema
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed, or if a
    /// header name repeats.
    pub fn open(path: impl AsRef<Path>, separator: u8, infer_rows: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = reader(&path, separator)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(SourceError::from)?
            .iter()
            .map(str::to_string)
            .collect();

        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(SourceError::Csv(format!(
                    "Duplicate column '{}' in {}",
                    name,
                    path.display()
                ))
                .into());
            }
        }

        let mut samples: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records().take(infer_rows) {
            let record = record.map_err(SourceError::from)?;
            for (column, field) in samples.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let fields = headers
            .into_iter()
            .zip(samples.iter())
            .map(|(name, cells)| (name, infer_dtype(cells.iter().map(String::as_str))))
            .collect();

        Ok(Self {
            path,
            separator,
            schema: Schema::new(fields),
        })
    }
}

impl BatchScan for CsvScan {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn materialize(&self) -> Result<Batch> {
        let mut reader = reader(&self.path, self.separator)?;
        let fields = self.schema.fields();
        let mut values: Vec<Vec<Value>> = vec![Vec::new(); fields.len()];

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(SourceError::from)?;
            let row = index + 1;
            for ((column, (name, dtype)), field) in
                values.iter_mut().zip(fields).zip(record.iter())
            {
                column.push(parse_cell(field, *dtype).map_err(|message| {
                    SourceError::Parse {
                        row,
                        column: name.clone(),
                        message,
                    }
                })?);
            }
        }

        let columns = fields
            .iter()
            .zip(values)
            .map(|((name, dtype), values)| Column::new(name.clone(), *dtype, values))
            .collect();

        tracing::debug!(path = %self.path.display(), "Materialized CSV scan");
        Batch::new(columns)
    }

    fn describe(&self) -> String {
        format!(
            "csv {} [{} cols]",
            self.path.display(),
            self.schema.len()
        )
    }
}

fn reader(path: &Path, separator: u8) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| {
            AnonymizeError::Source(SourceError::Csv(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        })
}

/// Narrowest type every non-empty cell parses as
///
/// Int64, then Float64, then Boolean, else String. No non-empty cells
/// means String. Floats need at least one digit, so `nan` and `inf` stay
/// text.
pub fn infer_dtype<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> DataType {
    let mut non_empty = cells.filter(|c| !c.is_empty()).peekable();
    if non_empty.peek().is_none() {
        return DataType::String;
    }

    if non_empty.clone().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if non_empty.clone().all(|c| parse_float(c).is_some()) {
        DataType::Float64
    } else if non_empty.all(|c| parse_bool(c).is_some()) {
        DataType::Boolean
    } else {
        DataType::String
    }
}

/// Check one field against `dtype`; empty fields are null
///
/// Typed cells keep the field text, so untouched columns are written back
/// exactly as read.
fn parse_cell(field: &str, dtype: DataType) -> std::result::Result<Value, String> {
    if field.is_empty() {
        return Ok(Value::Null);
    }

    let valid = match dtype {
        DataType::Int64 => field.parse::<i64>().is_ok(),
        DataType::Float64 => parse_float(field).is_some(),
        DataType::Boolean => parse_bool(field).is_some(),
        DataType::String | DataType::Null => return Ok(Value::String(field.to_string())),
    };

    if valid {
        Ok(Value::raw(dtype, field))
    } else {
        Err(format!("'{field}' is not a valid {dtype}"))
    }
}

fn parse_float(field: &str) -> Option<f64> {
    if !field.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse::<f64>().ok()
}

fn parse_bool(field: &str) -> Option<bool> {
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test_case(&["1", "2", "-3"], DataType::Int64 ; "integers")]
    #[test_case(&["1", "2.5"], DataType::Float64 ; "mixed numbers")]
    #[test_case(&["true", "FALSE", ""], DataType::Boolean ; "booleans")]
    #[test_case(&["1", "x"], DataType::String ; "mixed text")]
    #[test_case(&["", ""], DataType::String ; "all empty")]
    #[test_case(&["", "7"], DataType::Int64 ; "empty ignored")]
    #[test_case(&["Nan", "Inf"], DataType::String ; "float keywords are text")]
    #[test_case(&["nan", "1.5"], DataType::String ; "nan among floats")]
    #[test_case(&["00123", "04500"], DataType::Int64 ; "leading zeros")]
    fn test_infer_dtype(cells: &[&str], expected: DataType) {
        assert_eq!(infer_dtype(cells.iter().copied()), expected);
    }

    #[test]
    fn test_open_infers_without_reading_everything() {
        let file = csv_file("id,name,score\n1,John,1.5\n2,Doe,\n3,Alice,2\n");
        let scan = CsvScan::open(file.path(), b',', 100).unwrap();
        assert_eq!(
            scan.schema().fields(),
            &[
                ("id".to_string(), DataType::Int64),
                ("name".to_string(), DataType::String),
                ("score".to_string(), DataType::Float64),
            ]
        );

        let batch = scan.materialize().unwrap();
        assert_eq!(batch.height(), 3);
        assert_eq!(batch.column("score").unwrap().get(1), Some(&Value::Null));
        assert_eq!(
            batch.column("id").unwrap().get(2),
            Some(&Value::raw(DataType::Int64, "3"))
        );
    }

    #[test]
    fn test_parse_failure_past_sample_names_row_and_column() {
        let file = csv_file("age\n1\n2\nunknown\n");
        let scan = CsvScan::open(file.path(), b',', 2).unwrap();
        assert_eq!(scan.schema().dtype_of("age"), Some(DataType::Int64));

        match scan.materialize() {
            Err(AnonymizeError::Source(SourceError::Parse { row, column, .. })) => {
                assert_eq!(row, 3);
                assert_eq!(column, "age");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_cells_keep_field_text() {
        let file = csv_file("zip,price,flag,name\n00123,3.0,TRUE,Nan\n04500,1.50,False,Inf\n");
        let scan = CsvScan::open(file.path(), b',', 100).unwrap();
        assert_eq!(scan.schema().dtype_of("zip"), Some(DataType::Int64));
        assert_eq!(scan.schema().dtype_of("price"), Some(DataType::Float64));
        assert_eq!(scan.schema().dtype_of("flag"), Some(DataType::Boolean));
        assert_eq!(scan.schema().dtype_of("name"), Some(DataType::String));

        let batch = scan.materialize().unwrap();
        let text = |name: &str| -> Vec<Option<String>> {
            batch
                .column(name)
                .unwrap()
                .values()
                .iter()
                .map(Value::cast_to_string)
                .collect()
        };
        assert_eq!(text("zip"), vec![Some("00123".into()), Some("04500".into())]);
        assert_eq!(text("price"), vec![Some("3.0".into()), Some("1.50".into())]);
        assert_eq!(text("flag"), vec![Some("TRUE".into()), Some("False".into())]);
        assert_eq!(text("name"), vec![Some("Nan".into()), Some("Inf".into())]);
    }

    #[test]
    fn test_custom_separator() {
        let file = csv_file("a;b\nx;y\n");
        let scan = CsvScan::open(file.path(), b';', 100).unwrap();
        assert_eq!(scan.schema().names(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let file = csv_file("a,a\n1,2\n");
        assert!(CsvScan::open(file.path(), b',', 100).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = CsvScan::open("/nonexistent/input.csv", b',', 100);
        assert!(matches!(result, Err(AnonymizeError::Source(_))));
    }

    #[test]
    fn test_header_only_file() {
        let file = csv_file("id,name\n");
        let batch = CsvScan::open(file.path(), b',', 100)
            .unwrap()
            .materialize()
            .unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.column_names(), vec!["id", "name"]);
    }
}
