//! Parallel CPU Systolic Sort using Rayon
//!
//! The batched phase evaluated as a parallel map: every phase is split into
//! its disjoint two-element windows and rayon fans them out across cores.
//! The implicit join at the end of each parallel iterator is the barrier
//! between phases, so phase `k + 1` always sees the writes of phase `k`.
//!
//! This is its own backend with its own label. It gives the GPU a
//! multi-threaded CPU baseline and never stands in for the device.

use rayon::prelude::*;

use crate::network::{compare_exchange_at, NetworkStats, Phase};

/// Pairs per rayon task. Smaller phases are not worth splitting further.
const MIN_PAIRS_PER_TASK: usize = 1024;

/// Sort a slice in-place, running the pairs of each phase in parallel.
pub fn sort<T: Ord + Send>(data: &mut [T]) -> NetworkStats {
    let n = data.len();
    let mut exchanges = 0;

    for _cycle in 0..n {
        for phase in Phase::CYCLE {
            exchanges += apply_phase(data, phase);
        }
    }

    NetworkStats {
        cycles: n,
        exchanges,
    }
}

fn apply_phase<T: Ord + Send>(data: &mut [T], phase: Phase) -> usize {
    let Some(window) = data.get_mut(phase.offset()..) else {
        return 0;
    };

    window
        .par_chunks_exact_mut(2)
        .with_min_len(MIN_PAIRS_PER_TASK)
        .map(|pair| usize::from(compare_exchange_at(pair, 0, 1)))
        .sum()
}
