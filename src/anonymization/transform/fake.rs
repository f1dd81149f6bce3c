//! Synthetic value generation

use crate::anonymization::config::FakeCategory;
use crate::anonymization::generator::Generator;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;

/// Replaces each non-null cell with a fresh value of the configured category
#[derive(Debug, Clone)]
pub struct FakeTransform {
    category: FakeCategory,
    generator: Generator,
}

impl FakeTransform {
    pub fn new(category: FakeCategory, generator: Generator) -> Self {
        Self {
            category,
            generator,
        }
    }

    /// Draw one synthetic value
    pub fn generate(&self) -> String {
        self.generator.with_rng(|rng| match self.category {
            FakeCategory::Email => SafeEmail().fake_with_rng(rng),
            FakeCategory::Firstname => FirstName().fake_with_rng(rng),
            FakeCategory::Lastname => LastName().fake_with_rng(rng),
            FakeCategory::Fullname => Name().fake_with_rng(rng),
        })
    }
}
