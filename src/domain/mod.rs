//! Domain types for colmask.
//!
//! The domain layer holds the error hierarchy and the crate-wide
//! [`Result`] alias. Tabular data types live in [`crate::frame`].
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AnonymizeError>`]:
//!
//! ```rust,no_run
//! use colmask::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = colmask::config::load_config("colmask.toml")?;
//!     println!("{} rules", config.rules.len());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{AnonymizeError, OutputError, SourceError};
pub use result::Result;
