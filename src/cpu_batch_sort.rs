//! Vectorized-Batch Systolic Sort
//!
//! Same schedule as the scalar reference, but each phase is applied to all of
//! its pairs at once:
//!
//! 1. **Gather** the left and right operand of every pair into two vectors
//! 2. **Mask** the pairs where `left > right`
//! 3. **Scatter** the ordered operands back for masked pairs only
//!
//! All operands of a phase are read before any position is written. Since no
//! index appears in two pairs of the same phase, this produces exactly the
//! values the element-by-element walk produces.

use crate::network::{compare_exchange, NetworkStats, Phase};

/// Reusable operand and mask vectors for one batched run.
///
/// Sized for the larger (even) phase once per call and reused by every phase.
struct PhaseBuffers<T> {
    left: Vec<T>,
    right: Vec<T>,
    mask: Vec<bool>,
}

impl<T: Ord + Copy> PhaseBuffers<T> {
    fn with_capacity(pairs: usize) -> Self {
        PhaseBuffers {
            left: Vec::with_capacity(pairs),
            right: Vec::with_capacity(pairs),
            mask: Vec::with_capacity(pairs),
        }
    }

    /// Apply one phase to `data`, returning the number of exchanged pairs.
    fn apply(&mut self, data: &mut [T], phase: Phase) -> usize {
        let offset = phase.offset();
        let pairs = phase.pair_count(data.len());

        self.left.clear();
        self.right.clear();
        self.left.extend((0..pairs).map(|k| data[offset + 2 * k]));
        self.right.extend((0..pairs).map(|k| data[offset + 2 * k + 1]));

        self.mask.clear();
        self.mask
            .extend(self.left.iter().zip(&self.right).map(|(l, r)| l > r));

        let mut exchanged = 0;
        for (k, _) in self.mask.iter().enumerate().filter(|&(_, &m)| m) {
            let i = offset + 2 * k;
            (data[i], data[i + 1]) = compare_exchange(self.left[k], self.right[k]);
            exchanged += 1;
        }
        exchanged
    }
}

/// Sort a slice in-place, evaluating each phase as one masked bulk exchange.
pub fn sort<T: Ord + Copy>(data: &mut [T]) -> NetworkStats {
    let n = data.len();
    let mut buffers = PhaseBuffers::with_capacity(Phase::Even.pair_count(n));
    let mut exchanges = 0;

    for _cycle in 0..n {
        for phase in Phase::CYCLE {
            exchanges += buffers.apply(data, phase);
        }
    }

    NetworkStats {
        cycles: n,
        exchanges,
    }
}
