//! Explicit source of randomness for non-deterministic transforms

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared random number generator
///
/// Cloning shares the underlying RNG. `fake` and `shuffle` transforms draw
/// from the generator they were built with, so a seeded generator makes a
/// whole run reproducible.
#[derive(Debug, Clone)]
pub struct Generator {
    rng: Arc<Mutex<StdRng>>,
}

impl Generator {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded if `seed` is set, entropy otherwise
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Run `f` with exclusive access to the RNG
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
