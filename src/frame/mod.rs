//! Tabular data model
//!
//! - [`Value`] / [`DataType`] - typed cells
//! - [`Column`] / [`Batch`] / [`Schema`] - immutable columnar frames
//! - [`LazyBatch`] - a deferred plan (scan + column stages) materialized by
//!   [`LazyBatch::collect`]

pub mod batch;
pub mod lazy;
pub mod value;

pub use batch::{Batch, Column, Schema};
pub use lazy::{BatchScan, ColumnOp, LazyBatch};
pub use value::{DataType, Value};
