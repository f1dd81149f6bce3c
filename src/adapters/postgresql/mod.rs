//! PostgreSQL source
//!
//! Reads a table in `LIMIT`/`OFFSET` pages through a pooled client.

pub mod client;
pub mod rows;
pub mod source;

pub use client::PostgreSQLClient;
pub use source::{PageCursor, PaginatedQuerySource};
