//! Rule-driven column anonymization
//!
//! # Architecture
//!
//! - **Config**: declared rules (`column`, `method`, parameters)
//! - **Transform**: the closed set of methods (hash, fake, mask_right,
//!   mask_left, destroy, shuffle)
//! - **Engine**: compiles rules once and plans them onto each batch
//! - **Generator**: explicit, seedable randomness for `fake` and `shuffle`

pub mod config;
pub mod engine;
pub mod generator;
pub mod transform;

pub use config::{FakeCategory, HashAlgorithm, RuleConfig, TransformConfig};
pub use engine::{AnonymizationEngine, CompiledRule, PlannedBatch};
pub use generator::Generator;
pub use transform::Transform;

use crate::frame::DataType;
use std::fmt;

/// A recoverable issue found while planning rules onto a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWarning {
    /// The rule's column is not in the batch
    MissingColumn { column: String },
    /// The rule's column is not a string column and will be cast
    TypeCoercion { column: String, from: DataType },
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "column '{column}' not found"),
            Self::TypeCoercion { column, from } => {
                write!(f, "column '{column}' cast from {from} to str")
            }
        }
    }
}
