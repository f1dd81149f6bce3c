// colmask - Rule-driven column anonymizer
// Copyright (c) 2025 colmask Contributors
// Licensed under the MIT License

//! # colmask - rule-driven column anonymizer
//!
//! colmask rewrites selected columns of a CSV file or a PostgreSQL table
//! according to a declared list of rules and writes the result to CSV.
//!
//! ## Overview
//!
//! Each rule names a column and one method:
//! - **hash**: hex digest of the value plus a salt
//! - **fake**: synthetic email, first name, last name or full name
//! - **mask_right** / **mask_left**: mask the last or first characters
//! - **destroy**: replace every value with a constant
//! - **shuffle**: substitute digits and letters through a random mapping
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The pipeline driving source, engine and sink
//! - [`anonymization`] - Rules, transforms and the rule engine
//! - [`adapters`] - CSV and PostgreSQL sources, the CSV sink
//! - [`frame`] - Columnar batches and lazy plans
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use colmask::config::load_config;
//! use colmask::core::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("colmask.toml")?;
//!     let summary = Pipeline::from_config(&config).await?.run().await?;
//!
//!     println!("Anonymized {} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Lazy Evaluation
//!
//! Sources hand out [`frame::LazyBatch`] plans. The engine appends one stage
//! per applied rule; nothing is computed until the sink calls
//! [`collect`](frame::LazyBatch::collect):
//!
//! ```rust
//! use colmask::anonymization::config::{RuleConfig, TransformConfig};
//! use colmask::anonymization::{AnonymizationEngine, Generator};
//! use colmask::frame::{Batch, Column, LazyBatch, Value};
//!
//! # fn main() -> colmask::domain::Result<()> {
//! let rules = vec![RuleConfig::new(
//!     "name",
//!     TransformConfig::Destroy { replace_with: "REDACTED".to_string() },
//! )];
//! let engine = AnonymizationEngine::new(&rules, Generator::seeded(1))?;
//!
//! let batch = Batch::new(vec![Column::from_strs("name", &["John"])])?;
//! let planned = engine.apply(LazyBatch::from_batch(batch))?;
//! assert_eq!(planned.plan.stage_count(), 1);
//!
//! let result = planned.plan.collect()?;
//! assert_eq!(
//!     result.column("name").and_then(|c| c.get(0)),
//!     Some(&Value::String("REDACTED".to_string()))
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type
//! [`domain::AnonymizeError`] maps onto the process exit code.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod frame;
pub mod logging;
