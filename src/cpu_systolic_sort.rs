//! Scalar Systolic Sort
//!
//! Reference execution of the odd-even transposition network. Every cycle walks
//! the even-phase pairs, then the odd-phase pairs, one compare-exchange at a
//! time with ordinary control flow. The other strategies are checked against
//! this one.
//!
//! Complexity: n cycles × (n - 1) comparisons = O(n²)

use crate::network::{compare_exchange_at, NetworkStats, Phase};

/// Sort a slice in-place by simulating the network element by element.
///
/// Runs exactly `data.len()` cycles, so inputs of length 0 or 1 are returned
/// unchanged.
pub fn sort<T: Ord>(data: &mut [T]) -> NetworkStats {
    let n = data.len();
    let mut exchanges = 0;

    for _cycle in 0..n {
        for phase in Phase::CYCLE {
            for (i, j) in phase.pairs(n) {
                if compare_exchange_at(data, i, j) {
                    exchanges += 1;
                }
            }
        }
    }

    NetworkStats {
        cycles: n,
        exchanges,
    }
}
