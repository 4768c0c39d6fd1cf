//! Keyed deterministic randomness and the entropy source.
//!
//! Anything decoding has to reproduce draws from [`DeterministicRng`], seeded
//! from a string. Noise and padding choices draw from [`entropy_rng`] and are
//! never reproduced.

use digest::Digest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Seeded generator producing reproducible integers and shuffles
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    inner: ChaCha20Rng,
}

impl DeterministicRng {
    /// Seed from the SHA-256 digest of `seed`
    pub fn from_seed_str(seed: &str) -> Self {
        Self {
            inner: ChaCha20Rng::from_seed(seed_bytes(seed)),
        }
    }

    /// Seed from `"{key}|{tag}"`
    pub fn tagged(key: &str, tag: impl std::fmt::Display) -> Self {
        Self::from_seed_str(&format!("{}|{}", key, tag))
    }

    /// Restart the stream from a new seed string
    pub fn reseed(&mut self, seed: &str) {
        self.inner = ChaCha20Rng::from_seed(seed_bytes(seed));
    }

    /// Uniform integer in `[min, max]`. `max < min` yields `min`.
    pub fn random_int(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Fisher-Yates walk from the end
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random_int(0, i);
            items.swap(i, j);
        }
    }
}

fn seed_bytes(seed: &str) -> [u8; 32] {
    Sha256::digest(seed.as_bytes()).into()
}

/// Non-reproducible generator for noise and pad selection
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}
