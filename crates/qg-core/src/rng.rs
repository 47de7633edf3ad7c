//! Random tokens for generated identifiers.
//!
//! Behaviors registered without an explicit id get `bhv_<token>` where the
//! token is a random `u64` rendered in base 36.  Production schedulers seed
//! from OS entropy; tests pass a fixed seed so generated ids are stable.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generator of short random identifier tokens.
pub struct IdRng(SmallRng);

impl IdRng {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        IdRng(SmallRng::from_entropy())
    }

    /// Seed deterministically.
    pub fn seeded(seed: u64) -> Self {
        IdRng(SmallRng::seed_from_u64(seed))
    }

    /// A base-36 token of a fresh random `u64` (1–13 characters).
    pub fn token(&mut self) -> String {
        let mut n: u64 = self.0.r#gen();
        if n == 0 {
            return "0".to_owned();
        }
        let mut digits = Vec::with_capacity(13);
        while n > 0 {
            digits.push(ALPHABET[(n % 36) as usize]);
            n /= 36;
        }
        digits.reverse();
        // ALPHABET is ASCII, so every byte is a valid char.
        digits.into_iter().map(char::from).collect()
    }

    /// `"{prefix}_{token}"`.
    pub fn prefixed(&mut self, prefix: &str) -> String {
        format!("{prefix}_{}", self.token())
    }
}

impl Default for IdRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
