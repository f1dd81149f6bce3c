//! Domain error types
//!
//! This module defines the error hierarchy for colmask.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main colmask error type
///
/// This is the primary error type used throughout the application.
/// Per-batch problems that do not stop a run (missing columns, type
/// coercion) are not errors; see [`crate::anonymization::BatchWarning`].
#[derive(Debug, Error)]
pub enum AnonymizeError {
    /// Invalid configuration or rule parameters, raised before any batch is read
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading from a source failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Writing to an output sink failed
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// A planned stage does not match the data it is evaluated against
    #[error("Dispatch inconsistency: {0}")]
    Dispatch(String),

    /// Plan evaluation failed (column length mismatch, unknown column)
    #[error("Frame error: {0}")]
    Frame(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl AnonymizeError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::Source(_) => 4,
            _ => 5,
        }
    }
}

/// Source-specific errors
///
/// Errors that occur when reading batches from a file or database.
/// These are always fatal; the core never retries them.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A one-shot source was asked to read a second time
    #[error("Source already exhausted: {0}")]
    Exhausted(String),

    /// Failed to connect to the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// CSV reading or parsing failed
    #[error("CSV read failed: {0}")]
    Csv(String),

    /// A cell could not be parsed as its column type
    #[error("Parse error at row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    /// Database column type has no tabular mapping
    #[error("Unsupported column type '{type_name}' for column '{column}'")]
    UnsupportedType { column: String, type_name: String },
}

/// Output-specific errors
///
/// Errors that occur while forcing evaluation and writing the final stream.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to open the destination
    #[error("Failed to open output {path}: {message}")]
    OpenFailed { path: String, message: String },

    /// Failed to write rows
    #[error("Failed to write output: {0}")]
    WriteFailed(String),

    /// A later batch does not match the schema of the first batch
    #[error("Schema mismatch: expected columns {expected:?}, got {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymizeError {
    fn from(err: std::io::Error) -> Self {
        AnonymizeError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizeError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizeError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Csv(err.to_string())
    }
}

impl From<csv::Error> for OutputError {
    fn from(err: csv::Error) -> Self {
        OutputError::WriteFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymize_error_display() {
        let err = AnonymizeError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::ConnectionFailed("Network error".to_string());
        let err: AnonymizeError = source_err.into();
        assert!(matches!(err, AnonymizeError::Source(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_output_error_conversion() {
        let output_err = OutputError::WriteFailed("disk full".to_string());
        let err: AnonymizeError = output_err.into();
        assert!(matches!(err, AnonymizeError::Output(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_parse_error_display() {
        let err = SourceError::Parse {
            row: 3,
            column: "age".to_string(),
            message: "invalid digit".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at row 3, column 'age': invalid digit"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AnonymizeError = io_err.into();
        assert!(matches!(err, AnonymizeError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AnonymizeError = toml_err.into();
        assert!(matches!(err, AnonymizeError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = AnonymizeError::Dispatch("hash".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
