//! Rule configuration
//!
//! A rule is `{ column, method, params }`. The `method` key selects the
//! [`TransformConfig`] variant; the remaining keys are the variant's
//! parameters:
//!
//! ```toml
//! [[rules]]
//! column = "email"
//! method = "hash"
//! algorithm = "sha256"
//! salt = "pepper"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Digest algorithms accepted by the `hash` method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b,
    Blake2s,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Blake2b => "blake2b",
            Self::Blake2s => "blake2s",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthetic value categories accepted by the `fake` method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FakeCategory {
    Email,
    Firstname,
    Lastname,
    Fullname,
}

impl FakeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Firstname => "firstname",
            Self::Lastname => "lastname",
            Self::Fullname => "fullname",
        }
    }
}

impl fmt::Display for FakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method-specific rule parameters, tagged by `method`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TransformConfig {
    /// Salted digest, hex encoded
    Hash {
        algorithm: HashAlgorithm,
        salt: String,
    },
    /// Fresh synthetic value per row
    Fake {
        #[serde(alias = "category")]
        faker_type: FakeCategory,
    },
    /// Mask the last `n_chars` characters
    MaskRight { n_chars: usize, mask_char: String },
    /// Mask the first `n_chars` characters
    MaskLeft { n_chars: usize, mask_char: String },
    /// Replace every cell with a constant
    Destroy {
        #[serde(default = "default_replace_with")]
        replace_with: String,
    },
    /// Per-run character substitution over digits and ASCII letters
    Shuffle,
}

impl TransformConfig {
    /// Method name as written in configuration
    pub fn method(&self) -> &'static str {
        match self {
            Self::Hash { .. } => "hash",
            Self::Fake { .. } => "fake",
            Self::MaskRight { .. } => "mask_right",
            Self::MaskLeft { .. } => "mask_left",
            Self::Destroy { .. } => "destroy",
            Self::Shuffle => "shuffle",
        }
    }

    /// Validate method parameters
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::MaskRight { n_chars, mask_char } | Self::MaskLeft { n_chars, mask_char } => {
                if *n_chars <= 1 {
                    return Err(format!(
                        "{}.n_chars must be greater than 1, got {}",
                        self.method(),
                        n_chars
                    ));
                }
                if mask_char.chars().count() != 1 {
                    return Err(format!(
                        "{}.mask_char must be exactly one character, got '{}'",
                        self.method(),
                        mask_char
                    ));
                }
                Ok(())
            }
            Self::Hash { .. } | Self::Fake { .. } | Self::Destroy { .. } | Self::Shuffle => Ok(()),
        }
    }
}

/// One declared anonymization rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Column the rule rewrites
    pub column: String,

    /// Method and parameters
    #[serde(flatten)]
    pub transform: TransformConfig,
}

impl RuleConfig {
    pub fn new(column: impl Into<String>, transform: TransformConfig) -> Self {
        Self {
            column: column.into(),
            transform,
        }
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), String> {
        if self.column.trim().is_empty() {
            return Err(format!(
                "Rule with method '{}' has an empty column name",
                self.transform.method()
            ));
        }
        self.transform
            .validate()
            .map_err(|e| format!("Rule for column '{}': {}", self.column, e))
    }
}

fn default_replace_with() -> String {
    "CONFIDENTIAL".to_string()
}
