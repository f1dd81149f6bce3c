//! CSV file adapters
//!
//! - [`FileSource`] - reads a CSV file as one lazy batch
//! - [`CsvScan`] - the deferred scan behind that batch
//! - [`CsvOutput`] - writes batches to a CSV file

pub mod output;
pub mod scan;
pub mod source;

pub use output::CsvOutput;
pub use scan::CsvScan;
pub use source::FileSource;
