//! Character substitution over `[0-9a-zA-Z]`

use crate::anonymization::generator::Generator;
use rand::seq::SliceRandom;
use std::collections::HashMap;

const ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Substitutes alphanumerics through a random bijection
///
/// A new mapping is drawn for every application: a uniformly random
/// permutation of the alphabet.
#[derive(Debug, Clone)]
pub struct ShuffleTransform {
    generator: Generator,
}

impl ShuffleTransform {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    /// Draw the mapping for one application
    pub fn draw_mapping(&self) -> CharMapping {
        let source: Vec<char> = ALPHABET.chars().collect();
        let mut target = source.clone();

        self.generator.with_rng(|rng| target.shuffle(rng));

        CharMapping {
            map: source.into_iter().zip(target).collect(),
        }
    }
}

/// One drawn substitution table
#[derive(Debug, Clone)]
pub struct CharMapping {
    map: HashMap<char, char>,
}

impl CharMapping {
    pub fn substitute(&self, value: &str) -> String {
        value
            .chars()
            .map(|c| self.map.get(&c).copied().unwrap_or(c))
            .collect()
    }
}
