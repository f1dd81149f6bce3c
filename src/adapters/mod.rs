//! External system integrations for colmask.
//!
//! - [`csv`] - CSV file source and output
//! - [`postgresql`] - paginated PostgreSQL table source
//! - [`traits`] - the [`Source`](traits::Source), [`OutputSink`](traits::OutputSink)
//!   and [`PageFetcher`](traits::PageFetcher) seams
//! - [`factory`] - builds the configured source and sink
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the pipeline can
//! be driven by in-memory implementations in tests.
//!
//! ```rust,no_run
//! use colmask::adapters::factory::{create_output, create_source};
//!
//! # async fn example() -> colmask::domain::Result<()> {
//! let config = colmask::config::load_config("colmask.toml")?;
//! let mut source = create_source(&config.source).await?;
//! let mut sink = create_output(&config.output);
//!
//! while let Some(batch) = source.next_batch().await? {
//!     sink.write_batch(batch).await?;
//! }
//! sink.finish().await?;
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod factory;
pub mod postgresql;
pub mod traits;
