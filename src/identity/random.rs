//! Randomness seam used for user-agent rotation, retry jitter and pacing.

use std::fmt::Debug;

use rand::Rng;

/// Source of randomness for identity rotation and backoff jitter.
///
/// Production code uses [`ThreadRandom`]; tests substitute a fixed source so
/// header choice and delays are reproducible.
pub trait RandomSource: Send + Sync + Debug {
    /// Returns an index in `0..len`. Returns 0 when `len` is 0.
    fn index(&self, len: usize) -> usize;

    /// Returns a value uniformly distributed in `[0, 1)`.
    fn unit(&self) -> f64;
}

/// Process-wide thread-local RNG, not seeded deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }

    fn unit(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Deterministic source that always returns the same index and unit value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    index: usize,
    unit: f64,
}

impl FixedRandom {
    /// Creates a source returning `index` (clamped to the pool) and `unit`
    /// (clamped to `[0, 1)`).
    #[must_use]
    pub fn new(index: usize, unit: f64) -> Self {
        Self {
            index,
            unit: unit.clamp(0.0, 0.999_999),
        }
    }
}

impl Default for FixedRandom {
    fn default() -> Self {
        Self::new(0, 0.0)
    }
}

impl RandomSource for FixedRandom {
    fn index(&self, len: usize) -> usize {
        if len == 0 { 0 } else { self.index.min(len - 1) }
    }

    fn unit(&self) -> f64 {
        self.unit
    }
}
