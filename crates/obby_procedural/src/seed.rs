//! # Seeds
//!
//! Every random draw in a world descends from one [`WorldSeed`]. Each
//! section gets its own stream, so sections can be built in any order
//! (or in parallel) and still come out identical.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for a purpose (e.g. a section index).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Random stream for one section.
    #[must_use]
    pub fn section_rng(self, section: usize) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive(section as u64).value())
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x0BB1_F0A6_E5EE_D000)
    }
}
