//! Odd-Even Transposition Network Topology
//!
//! A systolic sorting network is a line of processing elements (PEs). On every
//! clock cycle each PE pairs with one neighbour and performs a compare-exchange.
//! Two fixed pairings alternate within a cycle:
//!
//! - **Even phase**: `(0,1), (2,3), (4,5), ...`
//! - **Odd phase**: `(1,2), (3,4), (5,6), ...`
//!
//! A network of `n` PEs is sorted after exactly `n` cycles, each made of one
//! even pass followed by one odd pass.
//!
//! All pairs of a phase are disjoint. That is what allows the batched and
//! device strategies to evaluate a whole phase at once and still agree with
//! the element-by-element reference.

/// Counters reported by every strategy after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkStats {
    /// Full cycles executed (always equal to the element count).
    pub cycles: usize,
    /// Compare-exchanges that actually swapped their operands.
    pub exchanges: usize,
}

/// One of the two fixed connection patterns applied in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Even,
    Odd,
}

impl Phase {
    /// Both phases in the order they run inside a cycle.
    pub const CYCLE: [Phase; 2] = [Phase::Even, Phase::Odd];

    /// Index of the left operand of the first pair.
    #[inline]
    pub fn offset(self) -> usize {
        match self {
            Phase::Even => 0,
            Phase::Odd => 1,
        }
    }

    /// Number of pairs this phase connects in a network of `n` PEs.
    #[inline]
    pub fn pair_count(self, n: usize) -> usize {
        n.saturating_sub(self.offset()) / 2
    }

    /// Pairs `(i, i + 1)` in ascending order, excluding any pair whose right
    /// index would fall outside the network.
    pub fn pairs(self, n: usize) -> impl Iterator<Item = (usize, usize)> {
        (self.offset()..n.saturating_sub(1))
            .step_by(2)
            .map(|i| (i, i + 1))
    }
}

/// Both phase pairings for a network of fixed size.
///
/// Depends on `n` alone, so it is computed once per network and reused on
/// every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phases {
    pub even: Vec<(usize, usize)>,
    pub odd: Vec<(usize, usize)>,
}

impl Phases {
    pub fn new(n: usize) -> Self {
        Phases {
            even: Phase::Even.pairs(n).collect(),
            odd: Phase::Odd.pairs(n).collect(),
        }
    }

    pub fn get(&self, phase: Phase) -> &[(usize, usize)] {
        match phase {
            Phase::Even => &self.even,
            Phase::Odd => &self.odd,
        }
    }
}

/// Order two values, exchanging only when `a > b`.
#[inline]
pub fn compare_exchange<T: Ord>(a: T, b: T) -> (T, T) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// In-place compare-exchange of `data[i]` and `data[j]`.
///
/// Returns `true` if the two positions were swapped. Equal elements are left
/// untouched.
#[inline]
pub fn compare_exchange_at<T: Ord>(data: &mut [T], i: usize, j: usize) -> bool {
    if data[i] > data[j] {
        data.swap(i, j);
        true
    } else {
        false
    }
}

/// Check if a slice is sorted in non-descending order.
#[inline]
pub fn is_sorted<T: Ord>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_even_size() {
        let phases = Phases::new(6);
        assert_eq!(phases.even, vec![(0, 1), (2, 3), (4, 5)]);
        assert_eq!(phases.odd, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_phases_odd_size() {
        let phases = Phases::new(5);
        assert_eq!(phases.even, vec![(0, 1), (2, 3)]);
        assert_eq!(phases.odd, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_phases_tiny_networks_are_empty() {
        for n in [0, 1] {
            let phases = Phases::new(n);
            assert!(phases.even.is_empty());
            assert!(phases.odd.is_empty());
        }
        let phases = Phases::new(2);
        assert_eq!(phases.even, vec![(0, 1)]);
        assert!(phases.odd.is_empty());
    }

    #[test]
    fn test_pair_count_matches_pairs() {
        for n in 0..20 {
            for phase in Phase::CYCLE {
                assert_eq!(phase.pair_count(n), phase.pairs(n).count(), "n={n} {phase:?}");
            }
        }
    }

    #[test]
    fn test_phase_pairs_are_disjoint() {
        for n in 0..33 {
            let phases = Phases::new(n);
            for phase in Phase::CYCLE {
                let mut seen = vec![false; n];
                for &(i, j) in phases.get(phase) {
                    assert_eq!(j, i + 1);
                    assert!(j < n);
                    assert!(!seen[i] && !seen[j], "index reused in {phase:?} for n={n}");
                    seen[i] = true;
                    seen[j] = true;
                }
            }
        }
    }

    #[test]
    fn test_compare_exchange() {
        assert_eq!(compare_exchange(5, 3), (3, 5));
        assert_eq!(compare_exchange(3, 5), (3, 5));
        assert_eq!(compare_exchange(4, 4), (4, 4));
    }

    #[test]
    fn test_compare_exchange_at_leaves_equal_pairs() {
        let mut data = [(7, 'a'), (7, 'a')];
        assert!(!compare_exchange_at(&mut data, 0, 1));

        let mut data = [9u32, 2];
        assert!(compare_exchange_at(&mut data, 0, 1));
        assert_eq!(data, [2, 9]);
    }

    #[test]
    fn test_is_sorted() {
        assert!(is_sorted(&[1, 2, 3, 4, 5]));
        assert!(is_sorted(&[1, 1, 1, 1]));
        assert!(is_sorted(&[1]));
        assert!(is_sorted::<u32>(&[]));
        assert!(!is_sorted(&[5, 4, 3, 2, 1]));
        assert!(!is_sorted(&[1, 3, 2]));
    }
}
