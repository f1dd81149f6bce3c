//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - human-readable console output
//! - configurable log levels, overridable with `RUST_LOG`
//! - optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use colmask::logging::init_logging;
//! use colmask::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::warn!(column = "ssn", "Column not found, skipping rule");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};
