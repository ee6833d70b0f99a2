//! Random input generation for the benchmark harness.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BenchError;

/// Reject a value range no element can be drawn from.
pub fn check_range(range: &Range<u32>) -> Result<(), BenchError> {
    if range.is_empty() {
        return Err(BenchError::EmptyRange {
            low: range.start,
            high: range.end,
        });
    }
    Ok(())
}

/// Source of uniformly distributed network inputs.
pub struct InputSource {
    rng: StdRng,
    range: Range<u32>,
}

impl InputSource {
    /// Seeded source, reproducible across runs.
    pub fn seeded(seed: u64, range: Range<u32>) -> Self {
        InputSource {
            rng: StdRng::seed_from_u64(seed),
            range,
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy(range: Range<u32>) -> Self {
        InputSource {
            rng: StdRng::from_entropy(),
            range,
        }
    }

    /// Generate `size` elements, each in `[low, high)`.
    ///
    /// The range must be non-empty; callers validate it with [`check_range`].
    pub fn generate(&mut self, size: usize) -> Vec<u32> {
        let range = self.range.clone();
        (0..size).map(|_| self.rng.gen_range(range.clone())).collect()
    }
}
