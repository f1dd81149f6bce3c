//! Rule engine
//!
//! The [`AnonymizationEngine`] compiles the configured rule list into
//! [`Transform`]s once and then plans them onto every batch the source
//! produces.
//!
//! # Examples
//!
//! ```no_run
//! use colmask::anonymization::{AnonymizationEngine, Generator};
//! use colmask::anonymization::config::{RuleConfig, TransformConfig};
//! use colmask::frame::{Batch, Column, LazyBatch};
//!
//! # fn example() -> colmask::domain::Result<()> {
//! let rules = vec![RuleConfig::new("name", TransformConfig::Shuffle)];
//! let engine = AnonymizationEngine::new(&rules, Generator::seeded(7))?;
//!
//! let batch = Batch::new(vec![Column::from_strs("name", &["John", "Doe"])])?;
//! let planned = engine.apply(LazyBatch::from_batch(batch))?;
//! let anonymized = planned.plan.collect()?;
//! # Ok(())
//! # }
//! ```

use crate::anonymization::config::RuleConfig;
use crate::anonymization::generator::Generator;
use crate::anonymization::transform::Transform;
use crate::anonymization::BatchWarning;
use crate::domain::{AnonymizeError, Result};
use crate::frame::{ColumnOp, DataType, LazyBatch};
use std::sync::Arc;

/// A rule with its transform resolved
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub column: String,
    pub transform: Arc<Transform>,
}

/// Outcome of planning the rule list onto one batch
#[derive(Debug, Clone)]
pub struct PlannedBatch {
    /// The batch with one stage per applied rule, still unevaluated
    pub plan: LazyBatch,
    /// Rules that were planned
    pub applied: usize,
    /// Recoverable issues, in rule order
    pub warnings: Vec<BatchWarning>,
}

impl PlannedBatch {
    /// Rules skipped because their column was absent
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BatchWarning::MissingColumn { .. }))
            .count()
    }
}

/// Ordered anonymization rules, compiled once per run
///
/// Rules run in declaration order. Two rules on the same column compose:
/// the second sees the output of the first.
///
/// # Thread Safety
///
/// Compiled transforms sit behind `Arc` and are shared by every batch plan.
#[derive(Debug, Clone)]
pub struct AnonymizationEngine {
    rules: Vec<CompiledRule>,
}

impl AnonymizationEngine {
    /// Compile the rule list
    ///
    /// # Arguments
    ///
    /// * `rules` - Declared rules, in order
    /// * `generator` - Randomness for `fake` and `shuffle`
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the first invalid rule.
    pub fn new(rules: &[RuleConfig], generator: Generator) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                rule.validate().map_err(AnonymizeError::Configuration)?;
                let transform = Transform::from_config(&rule.transform, &generator)?;
                Ok(CompiledRule {
                    column: rule.column.clone(),
                    transform: Arc::new(transform),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(rules = rules.len(), "Compiled anonymization rules");
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Plan every rule onto `batch`
    ///
    /// Columns are resolved against the batch schema, so no data is read.
    /// A rule whose column is absent is skipped with a warning. A rule on a
    /// non-string column is planned with a coercion warning.
    pub fn apply(&self, batch: LazyBatch) -> Result<PlannedBatch> {
        let mut plan = batch;
        let mut applied = 0;
        let mut warnings = Vec::new();

        for rule in &self.rules {
            let Some(dtype) = plan.schema().dtype_of(&rule.column) else {
                tracing::warn!(
                    column = %rule.column,
                    method = rule.transform.method(),
                    "Column not found in batch, skipping rule"
                );
                warnings.push(BatchWarning::MissingColumn {
                    column: rule.column.clone(),
                });
                continue;
            };

            if dtype != DataType::String && rule.transform.reads_input_as_string() {
                tracing::warn!(
                    column = %rule.column,
                    dtype = %dtype,
                    method = rule.transform.method(),
                    "Column is not a string column, values will be cast to strings"
                );
                warnings.push(BatchWarning::TypeCoercion {
                    column: rule.column.clone(),
                    from: dtype,
                });
            }

            tracing::info!(
                column = %rule.column,
                method = rule.transform.method(),
                "Applying transformation"
            );
            let op: Arc<dyn ColumnOp> = rule.transform.clone();
            plan = plan.with_column_op(&rule.column, op)?;
            applied += 1;
        }

        Ok(PlannedBatch {
            plan,
            applied,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::{HashAlgorithm, TransformConfig};
    use crate::frame::{Batch, Column, Value};

    fn people() -> LazyBatch {
        LazyBatch::from_batch(
            Batch::new(vec![
                Column::from_i64s("id", &[1, 2, 3, 4]),
                Column::from_strs("name", &["John", "Doe", "Alice", "Bob"]),
            ])
            .unwrap(),
        )
    }

    fn mask_right(column: &str) -> RuleConfig {
        RuleConfig::new(
            column,
            TransformConfig::MaskRight {
                n_chars: 2,
                mask_char: "*".to_string(),
            },
        )
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let rules = vec![RuleConfig::new(
            "non_existent",
            TransformConfig::Hash {
                algorithm: HashAlgorithm::Sha256,
                salt: "salt".to_string(),
            },
        )];
        let engine = AnonymizationEngine::new(&rules, Generator::seeded(1)).unwrap();

        let original = people().collect().unwrap();
        let planned = engine.apply(people()).unwrap();

        assert_eq!(planned.applied, 0);
        assert_eq!(planned.skipped(), 1);
        assert_eq!(
            planned.warnings,
            vec![BatchWarning::MissingColumn {
                column: "non_existent".to_string()
            }]
        );
        assert_eq!(planned.plan.collect().unwrap(), original);
    }

    #[test]
    fn test_rules_compose_in_order() {
        let rules = vec![
            mask_right("name"),
            RuleConfig::new(
                "name",
                TransformConfig::Hash {
                    algorithm: HashAlgorithm::Md5,
                    salt: String::new(),
                },
            ),
        ];
        let engine = AnonymizationEngine::new(&rules, Generator::seeded(1)).unwrap();
        let first = engine.apply(people()).unwrap().plan.collect().unwrap();

        let masked_then_hashed =
            AnonymizationEngine::new(&rules[1..], Generator::seeded(1))
                .unwrap()
                .apply(
                    AnonymizationEngine::new(&rules[..1], Generator::seeded(1))
                        .unwrap()
                        .apply(people())
                        .unwrap()
                        .plan,
                )
                .unwrap()
                .plan
                .collect()
                .unwrap();
        assert_eq!(first, masked_then_hashed);

        let reversed: Vec<RuleConfig> = rules.iter().rev().cloned().collect();
        let engine = AnonymizationEngine::new(&reversed, Generator::seeded(1)).unwrap();
        let second = engine.apply(people()).unwrap().plan.collect().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_non_string_column_warns() {
        let engine = AnonymizationEngine::new(&[mask_right("id")], Generator::seeded(1)).unwrap();
        let ids = LazyBatch::from_batch(
            Batch::new(vec![Column::from_i64s("id", &[1234, 7])]).unwrap(),
        );
        let planned = engine.apply(ids).unwrap();

        assert_eq!(
            planned.warnings,
            vec![BatchWarning::TypeCoercion {
                column: "id".to_string(),
                from: DataType::Int64
            }]
        );
        let batch = planned.plan.collect().unwrap();
        let id = batch.column("id").unwrap();
        assert_eq!(id.get(0), Some(&Value::from("12**")));
        // Shorter than n_chars: fully masked
        assert_eq!(id.get(1), Some(&Value::from("*")));
    }

    #[test]
    fn test_destroy_on_integer_column_does_not_warn() {
        let rules = vec![RuleConfig::new(
            "id",
            TransformConfig::Destroy {
                replace_with: "X".to_string(),
            },
        )];
        let engine = AnonymizationEngine::new(&rules, Generator::seeded(1)).unwrap();
        let planned = engine.apply(people()).unwrap();
        assert!(planned.warnings.is_empty());
        assert_eq!(planned.applied, 1);
    }

    #[test]
    fn test_apply_keeps_column_position() {
        let engine = AnonymizationEngine::new(&[mask_right("name")], Generator::seeded(1)).unwrap();
        let batch = engine.apply(people()).unwrap().plan.collect().unwrap();
        assert_eq!(batch.column_names(), vec!["id", "name"]);
        assert_eq!(
            batch.column("name").unwrap().str_values(),
            vec![Some("Jo**"), Some("D**"), Some("Ali**"), Some("B**")]
        );
    }

    #[test]
    fn test_invalid_rule_fails_construction() {
        let rules = vec![RuleConfig::new(
            "name",
            TransformConfig::MaskRight {
                n_chars: 1,
                mask_char: "*".to_string(),
            },
        )];
        let result = AnonymizationEngine::new(&rules, Generator::seeded(1));
        assert!(matches!(result, Err(AnonymizeError::Configuration(_))));
    }

    #[test]
    fn test_empty_rule_list_is_identity() {
        let engine = AnonymizationEngine::new(&[], Generator::seeded(1)).unwrap();
        assert!(engine.is_empty());
        let planned = engine.apply(people()).unwrap();
        assert_eq!(planned.plan.stage_count(), 0);
    }
}
