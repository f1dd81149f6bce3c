//! Source and sink factory
//!
//! Builds the configured [`Source`] and [`OutputSink`] implementations.

use crate::adapters::csv::{CsvOutput, FileSource};
use crate::adapters::postgresql::{PaginatedQuerySource, PostgreSQLClient};
use crate::adapters::traits::{OutputSink, Source};
use crate::config::{OutputConfig, SourceConfig};
use crate::domain::Result;

/// Create the source described by the configuration
///
/// A PostgreSQL source is checked with a test query before it is returned.
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the database
/// cannot be reached.
pub async fn create_source(config: &SourceConfig) -> Result<Box<dyn Source>> {
    match config {
        SourceConfig::Csv(csv_config) => {
            tracing::info!(path = %csv_config.path, "Creating CSV file source");
            Ok(Box::new(FileSource::new(csv_config.clone())))
        }
        SourceConfig::Postgres(pg_config) => {
            tracing::info!(
                table = %pg_config.table,
                page_size = pg_config.page_size,
                "Creating PostgreSQL paginated source"
            );
            let client = PostgreSQLClient::new(pg_config.clone())?;
            client.test_connection().await?;
            Ok(Box::new(PaginatedQuerySource::new(
                client,
                pg_config.page_size,
            )))
        }
    }
}

/// Create the output sink described by the configuration
///
/// Nothing is opened until the first batch is written.
pub fn create_output(config: &OutputConfig) -> Box<dyn OutputSink> {
    match config {
        OutputConfig::Csv(csv_config) => {
            tracing::info!(path = %csv_config.path, "Creating CSV output");
            Box::new(CsvOutput::new(csv_config))
        }
    }
}
