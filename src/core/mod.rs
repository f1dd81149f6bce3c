//! Core orchestration for colmask.
//!
//! - [`pipeline`] - pulls batches from the source, plans the rule list onto
//!   each one and hands the plan to the sink
//! - [`summary`] - counters reported at the end of a run
//!
//! # Example
//!
//! ```rust,no_run
//! use colmask::config::load_config;
//! use colmask::core::Pipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("colmask.toml")?;
//! let summary = Pipeline::from_config(&config).await?.run().await?;
//!
//! println!("Batches: {}", summary.batches_read);
//! println!("Rows: {}", summary.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
pub mod summary;

pub use pipeline::Pipeline;
pub use summary::RunSummary;
