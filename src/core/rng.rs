//! Seedable random number generation for rule assignment.
//!
//! ## Key Features
//!
//! - **Deterministic when seeded**: Same seed assigns the same rules in the
//!   same order of first contact, which keeps tests and replays stable
//! - **Entropy by default**: Production servers draw a fresh seed at startup
//! - **Weighted choice**: The rule catalog picks entries by weight
//!
//! ```
//! use ng_chat::core::RuleRng;
//!
//! let mut a = RuleRng::new(42);
//! let mut b = RuleRng::new(42);
//! assert_eq!(a.choose_weighted(&[1.0, 1.0, 1.0]), b.choose_weighted(&[1.0, 1.0, 1.0]));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable RNG owned by the player registry.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct RuleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl RuleRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    /// Create from an optional seed, falling back to entropy.
    #[must_use]
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// The seed this RNG was created with. Passing it back to [`RuleRng::new`]
    /// replays the same sequence of choices.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Choose a random element with weighted probability.
    ///
    /// Returns the index of the chosen element.
    /// Weights do not need to sum to 1.0.
    ///
    /// Returns `None` if weights are empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f32>() * total;

        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold <= 0.0 && weight > 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|&w| w > 0.0)
    }
}
