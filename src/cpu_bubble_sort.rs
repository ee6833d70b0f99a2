//! CPU Bubble Sort Baseline
//!
//! The classic sequential bubble sort: pass `i` bubbles the largest remaining
//! element to position `n - 1 - i`. It performs the same adjacent
//! compare-exchanges as the network but without the fixed phase topology,
//! which makes it the natural baseline for the systolic strategies.

use crate::network::{compare_exchange_at, NetworkStats};

/// Sort a slice in-place using bubble sort.
///
/// Reports the `n` outer passes as `cycles` so its stats line up with the
/// network strategies.
pub fn sort<T: Ord>(data: &mut [T]) -> NetworkStats {
    let n = data.len();
    let mut exchanges = 0;

    for i in 0..n {
        for j in 0..n - 1 - i {
            if compare_exchange_at(data, j, j + 1) {
                exchanges += 1;
            }
        }
    }

    NetworkStats {
        cycles: n,
        exchanges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::is_sorted;
    use rand::Rng;

    #[test]
    fn test_sort_empty() {
        let mut data: Vec<u32> = vec![];
        sort(&mut data);
        assert!(data.is_empty());
    }

    #[test]
    fn test_sort_single() {
        let mut data = vec![42u32];
        sort(&mut data);
        assert_eq!(data, vec![42]);
    }

    #[test]
    fn test_sort_reverse() {
        let mut data: Vec<u32> = (0..100).rev().collect();
        let stats = sort(&mut data);
        assert_eq!(data, (0..100).collect::<Vec<u32>>());
        assert_eq!(stats.exchanges, 100 * 99 / 2);
    }

    #[test]
    fn test_sort_random() {
        let mut rng = rand::thread_rng();
        let mut data: Vec<u32> = (0..1000).map(|_| rng.gen_range(0..10_000)).collect();
        let mut expected = data.clone();
        expected.sort_unstable();

        sort(&mut data);
        assert!(is_sorted(&data));
        assert_eq!(data, expected);
    }
}
