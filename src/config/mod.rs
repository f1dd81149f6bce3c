//! Configuration management for colmask.
//!
//! # Overview
//!
//! colmask uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COLMASK_*` environment overrides
//! - Default values for optional settings
//! - Validation before any data is read
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry run, RNG seed
//! - [`SourceConfig`] - CSV file or PostgreSQL table
//! - [`OutputConfig`] - CSV file
//! - `rules` - ordered [`RuleConfig`](crate::anonymization::RuleConfig) list
//! - [`LoggingConfig`] - optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! type = "postgres"
//! uri = "${DATABASE_URL}"
//! table = "public.customers"
//! order_by = "id"
//! page_size = 5000
//!
//! [output]
//! type = "csv"
//! path = "customers_anonymized.csv"
//!
//! [[rules]]
//! column = "email"
//! method = "hash"
//! algorithm = "sha256"
//! salt = "${COLMASK_SALT}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ColmaskConfig, CsvOutputConfig, CsvSourceConfig, LoggingConfig,
    OutputConfig, PostgresSourceConfig, SourceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
