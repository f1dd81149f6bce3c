//! Column transforms
//!
//! [`Transform`] is the closed set of anonymization methods. Each variant
//! wraps the method's resolved parameters and rewrites one column into a
//! `String` column of the same length.

pub mod destroy;
pub mod fake;
pub mod hash;
pub mod mask;
pub mod shuffle;

pub use destroy::DestroyTransform;
pub use fake::FakeTransform;
pub use hash::HashTransform;
pub use mask::{MaskSide, MaskTransform};
pub use shuffle::ShuffleTransform;

use crate::anonymization::config::TransformConfig;
use crate::anonymization::generator::Generator;
use crate::domain::{AnonymizeError, Result};
use crate::frame::{Column, ColumnOp, DataType, Value};

/// A resolved anonymization method
#[derive(Debug, Clone)]
pub enum Transform {
    Hash(HashTransform),
    Fake(FakeTransform),
    MaskRight(MaskTransform),
    MaskLeft(MaskTransform),
    Destroy(DestroyTransform),
    Shuffle(ShuffleTransform),
}

impl Transform {
    /// Resolve a rule's method and parameters
    ///
    /// `fake` and `shuffle` keep a handle on `generator`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the parameters are out of range.
    pub fn from_config(config: &TransformConfig, generator: &Generator) -> Result<Self> {
        config.validate().map_err(AnonymizeError::Configuration)?;

        let transform = match config {
            TransformConfig::Hash { algorithm, salt } => {
                Self::Hash(HashTransform::new(*algorithm, salt.clone()))
            }
            TransformConfig::Fake { faker_type } => {
                Self::Fake(FakeTransform::new(*faker_type, generator.clone()))
            }
            TransformConfig::MaskRight { n_chars, mask_char } => {
                Self::MaskRight(MaskTransform::right(*n_chars, single_char(mask_char)?))
            }
            TransformConfig::MaskLeft { n_chars, mask_char } => {
                Self::MaskLeft(MaskTransform::left(*n_chars, single_char(mask_char)?))
            }
            TransformConfig::Destroy { replace_with } => {
                Self::Destroy(DestroyTransform::new(replace_with.clone()))
            }
            TransformConfig::Shuffle => Self::Shuffle(ShuffleTransform::new(generator.clone())),
        };
        Ok(transform)
    }

    /// Method name as written in configuration
    pub fn method(&self) -> &'static str {
        match self {
            Self::Hash(_) => "hash",
            Self::Fake(_) => "fake",
            Self::MaskRight(_) => "mask_right",
            Self::MaskLeft(_) => "mask_left",
            Self::Destroy(_) => "destroy",
            Self::Shuffle(_) => "shuffle",
        }
    }

    /// Whether the input cells are read as strings
    ///
    /// `destroy` ignores its input, so it never coerces.
    pub fn reads_input_as_string(&self) -> bool {
        !matches!(self, Self::Destroy(_))
    }

    /// Rewrite a whole column
    pub fn apply_column(&self, column: &Column) -> Column {
        let values = match self {
            Self::Hash(hash) => map_strings(column, |s| hash.hash_str(s)),
            Self::Fake(fake) => map_strings(column, |_| fake.generate()),
            Self::MaskRight(mask) | Self::MaskLeft(mask) => {
                map_strings(column, |s| mask.mask_str(s))
            }
            Self::Destroy(destroy) => {
                vec![Value::String(destroy.replacement().to_string()); column.len()]
            }
            Self::Shuffle(shuffle) => {
                let mapping = shuffle.draw_mapping();
                map_strings(column, |s| mapping.substitute(s))
            }
        };
        column.with_values(DataType::String, values)
    }
}

impl ColumnOp for Transform {
    fn name(&self) -> &str {
        self.method()
    }

    fn output_dtype(&self, _input: DataType) -> DataType {
        DataType::String
    }

    fn apply(&self, column: &Column) -> Result<Column> {
        Ok(self.apply_column(column))
    }
}

/// Cast each cell to a string and map it; nulls stay null
fn map_strings(column: &Column, mut f: impl FnMut(&str) -> String) -> Vec<Value> {
    column
        .values()
        .iter()
        .map(|value| match value {
            Value::String(s) => Value::String(f(s.as_str())),
            other => match other.cast_to_string() {
                Some(s) => Value::String(f(&s)),
                None => Value::Null,
            },
        })
        .collect()
}

fn single_char(mask_char: &str) -> Result<char> {
    let mut chars = mask_char.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AnonymizeError::Configuration(format!(
            "mask_char must be exactly one character, got '{mask_char}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::{FakeCategory, HashAlgorithm};

    fn names() -> Column {
        Column::new(
            "name",
            DataType::String,
            vec![
                Value::from("John"),
                Value::Null,
                Value::from("Alice"),
                Value::from("Bob"),
            ],
        )
    }

    fn build(config: TransformConfig) -> Transform {
        Transform::from_config(&config, &Generator::seeded(11)).unwrap()
    }

    #[test]
    fn test_hash_column_keeps_nulls() {
        let transform = build(TransformConfig::Hash {
            algorithm: HashAlgorithm::Sha256,
            salt: "salt".to_string(),
        });
        let column = Column::from_strs("data", &["ABC123", "Hello World!"]);
        let out = transform.apply_column(&column);
        assert_eq!(
            out.str_values(),
            vec![
                Some("f1e453052b58b0d982cc2c3222983f901ff9814dec4ecae666f795570f17f07a"),
                Some("f13d75a86ecce97c9aef2bd350a7e81b4c0c914861bf914b1429c7db141666d5"),
            ]
        );

        let out = transform.apply_column(&names());
        assert_eq!(out.get(1), Some(&Value::Null));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_hash_integer_column_is_coerced() {
        let transform = build(TransformConfig::Hash {
            algorithm: HashAlgorithm::Md5,
            salt: String::new(),
        });
        let ints = transform.apply_column(&Column::from_i64s("id", &[42]));
        let strs = transform.apply_column(&Column::from_strs("id", &["42"]));
        assert_eq!(ints.dtype(), DataType::String);
        assert_eq!(ints.values(), strs.values());
    }

    #[test]
    fn test_mask_column() {
        let right = build(TransformConfig::MaskRight {
            n_chars: 2,
            mask_char: "*".to_string(),
        });
        assert_eq!(
            right.apply_column(&names()).str_values(),
            vec![Some("Jo**"), None, Some("Ali**"), Some("B**")]
        );

        let left = build(TransformConfig::MaskLeft {
            n_chars: 2,
            mask_char: "*".to_string(),
        });
        assert_eq!(
            left.apply_column(&names()).str_values(),
            vec![Some("**hn"), None, Some("**ice"), Some("**b")]
        );
    }

    #[test]
    fn test_destroy_overwrites_everything() {
        let destroy = build(TransformConfig::Destroy {
            replace_with: "CONFIDENTIAL".to_string(),
        });
        let out = destroy.apply_column(&names());
        assert!(out
            .values()
            .iter()
            .all(|v| v == &Value::from("CONFIDENTIAL")));

        let out = destroy.apply_column(&Column::from_i64s("id", &[1, 2, 3]));
        assert_eq!(out.len(), 3);
        assert_eq!(out.dtype(), DataType::String);
        assert!(!destroy.reads_input_as_string());
    }

    #[test]
    fn test_fake_column_keeps_nulls() {
        let fake = build(TransformConfig::Fake {
            faker_type: FakeCategory::Email,
        });
        let out = fake.apply_column(&names());
        assert_eq!(out.get(1), Some(&Value::Null));
        assert!(out.str_values().iter().flatten().all(|s| s.contains('@')));
    }

    #[test]
    fn test_shuffle_column() {
        let shuffle = build(TransformConfig::Shuffle);
        let column = Column::from_strs("code", &["ABC-123", "xyz"]);
        let out = shuffle.apply_column(&column);
        let values = out.str_values();

        assert_eq!(values[0].map(|s| s.chars().count()), Some(7));
        assert_ne!(values[0], Some("ABC-123"));
        assert_eq!(values[0].and_then(|s| s.chars().nth(3)), Some('-'));
        assert_ne!(values[1], Some("xyz"));
    }

    #[test]
    fn test_out_of_range_parameters_rejected() {
        let result = Transform::from_config(
            &TransformConfig::MaskLeft {
                n_chars: 0,
                mask_char: "*".to_string(),
            },
            &Generator::seeded(1),
        );
        assert!(matches!(result, Err(AnonymizeError::Configuration(_))));
    }

    #[test]
    fn test_column_op_name() {
        let transform = build(TransformConfig::Shuffle);
        assert_eq!(ColumnOp::name(&transform), "shuffle");
        assert_eq!(
            transform.output_dtype(DataType::Int64),
            DataType::String
        );
    }
}
