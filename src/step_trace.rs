//! Step Trace of the Systolic Network
//!
//! Runs the scalar schedule one clock cycle at a time and records what every
//! cycle did, for visualisation. Each [`StepEntry`] holds the array as it
//! stands after the cycle and the pairs that swapped during it, in visit
//! order: even-phase pairs ascending, then odd-phase pairs ascending.
//!
//! [`StepTrace`] is a pull-model iterator. It yields exactly `n` entries and
//! is never rewound; build a new one from the same input to replay.

use std::fmt::{Display, Write};

use crate::network::{compare_exchange_at, Phase, Phases};

/// Indices `(i, j)` exchanged during a cycle.
pub type SwapRecord = (usize, usize);

/// State of the network after one clock cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry<T> {
    /// Array contents after both phases of the cycle
    pub snapshot: Vec<T>,
    /// Pairs that swapped during the cycle, in the order they were visited
    pub swaps: Vec<SwapRecord>,
}

/// Lazy sequence of [`StepEntry`] values, one per clock cycle.
#[derive(Debug, Clone)]
pub struct StepTrace<T> {
    state: Vec<T>,
    phases: Phases,
    cycle: usize,
}

impl<T: Ord + Clone> StepTrace<T> {
    /// Start a trace over a private copy of `input`.
    pub fn new(input: &[T]) -> Self {
        StepTrace {
            state: input.to_vec(),
            phases: Phases::new(input.len()),
            cycle: 0,
        }
    }

    /// Number of PEs in the traced network.
    pub fn size(&self) -> usize {
        self.state.len()
    }
}

impl<T: Ord + Clone> Iterator for StepTrace<T> {
    type Item = StepEntry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cycle >= self.state.len() {
            return None;
        }

        let mut swaps = Vec::new();
        for phase in Phase::CYCLE {
            for &(i, j) in self.phases.get(phase) {
                if compare_exchange_at(&mut self.state, i, j) {
                    swaps.push((i, j));
                }
            }
        }
        self.cycle += 1;

        Some(StepEntry {
            snapshot: self.state.clone(),
            swaps,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.state.len() - self.cycle;
        (remaining, Some(remaining))
    }
}

impl<T: Ord + Clone> ExactSizeIterator for StepTrace<T> {}

/// Collect the full trace for `input`.
pub fn generate_steps<T: Ord + Clone>(input: &[T]) -> Vec<StepEntry<T>> {
    StepTrace::new(input).collect()
}

impl<T: Display> StepEntry<T> {
    /// Render the entry as a text frame: PE labels, values, one swap marker
    /// row per phase, and the clock cycle caption.
    ///
    /// Pairs of one phase never share a PE, so arrows on the same row cannot
    /// overlap.
    pub fn render(&self, cycle: usize) -> String {
        let values: Vec<String> = self.snapshot.iter().map(|v| v.to_string()).collect();
        let width = values
            .iter()
            .map(String::len)
            .chain(std::iter::once(format!("PE{}", self.snapshot.len()).len()))
            .max()
            .unwrap_or(0)
            + 2;

        let mut labels = String::new();
        let mut cells = String::new();
        for (i, value) in values.iter().enumerate() {
            write!(labels, "{:^width$}", format!("PE{}", i)).unwrap();
            write!(cells, "{:^width$}", value).unwrap();
        }

        let mut frame = String::new();
        writeln!(frame, "{}", labels.trim_end()).unwrap();
        writeln!(frame, "{}", cells.trim_end()).unwrap();
        for phase in Phase::CYCLE {
            let mut markers = vec![' '; width * values.len()];
            for &(i, j) in self.swaps.iter().filter(|&&(i, _)| i % 2 == phase.offset()) {
                // Arrow from the middle of PE i to the middle of PE j
                let from = i * width + width / 2;
                let to = j * width + width / 2;
                for m in &mut markers[from..to] {
                    *m = '-';
                }
                markers[to] = '>';
                markers[from] = '<';
            }
            let markers: String = markers.into_iter().collect();
            writeln!(frame, "{}", markers.trim_end()).unwrap();
        }
        write!(frame, "Clock Cycle: {}", cycle).unwrap();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_systolic_sort;
    use rand::Rng;

    #[test]
    fn test_trace_five_elements() {
        let steps = generate_steps(&[5u32, 3, 4, 1, 2]);
        assert_eq!(steps.len(), 5);

        assert_eq!(steps[0].swaps, vec![(0, 1), (2, 3), (1, 2), (3, 4)]);
        assert_eq!(steps[0].snapshot, vec![3, 1, 5, 2, 4]);

        assert_eq!(steps[1].swaps, vec![(0, 1), (2, 3), (1, 2), (3, 4)]);
        assert_eq!(steps[1].snapshot, vec![1, 2, 3, 4, 5]);

        for step in &steps[2..] {
            assert!(step.swaps.is_empty());
        }
        assert_eq!(steps.last().unwrap().snapshot, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_trace_is_lazy_and_exact_size() {
        let mut trace = StepTrace::new(&[3u32, 2, 1]);
        assert_eq!(trace.len(), 3);
        assert!(trace.next().is_some());
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.by_ref().count(), 2);
        assert!(trace.next().is_none());
    }

    #[test]
    fn test_trace_empty_and_single() {
        assert!(generate_steps::<u32>(&[]).is_empty());

        let steps = generate_steps(&[9u32]);
        assert_eq!(
            steps,
            vec![StepEntry {
                snapshot: vec![9],
                swaps: vec![]
            }]
        );
    }

    #[test]
    fn test_trace_does_not_touch_input() {
        let input = vec![4u32, 3, 2, 1];
        let first: Vec<_> = StepTrace::new(&input).collect();
        let replay: Vec<_> = StepTrace::new(&input).collect();
        assert_eq!(input, vec![4, 3, 2, 1]);
        assert_eq!(first, replay);
    }

    #[test]
    fn test_trace_matches_scalar_sort() {
        let mut rng = rand::thread_rng();
        let input: Vec<u32> = (0..40).map(|_| rng.gen_range(0..50)).collect();

        let mut sorted = input.clone();
        let stats = cpu_systolic_sort::sort(&mut sorted);

        let steps = generate_steps(&input);
        assert_eq!(steps.len(), stats.cycles);
        assert_eq!(steps.last().unwrap().snapshot, sorted);
        let swaps: usize = steps.iter().map(|s| s.swaps.len()).sum();
        assert_eq!(swaps, stats.exchanges);
    }

    #[test]
    fn test_swaps_follow_phase_pairs() {
        let input = [6u32, 5, 4, 3, 2, 1, 0];
        let phases = Phases::new(input.len());
        let trace = StepTrace::new(&input);
        assert_eq!(trace.phases, phases);

        for step in trace {
            for swap in &step.swaps {
                let phase = if swap.0 % 2 == 0 { Phase::Even } else { Phase::Odd };
                assert!(phases.get(phase).contains(swap), "{swap:?} not in {phase:?}");
            }
        }
    }

    #[test]
    fn test_render_frame() {
        let entry = StepEntry {
            snapshot: vec![3u32, 1, 5],
            swaps: vec![(0, 1)],
        };
        let frame = entry.render(0);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("PE0") && lines[0].contains("PE2"));
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), vec!["3", "1", "5"]);
        assert!(lines[2].contains('>'));
        assert!(lines[3].is_empty());
        assert_eq!(lines[4], "Clock Cycle: 0");
    }

    #[test]
    fn test_render_keeps_arrows_sharing_a_pe() {
        let entry = StepEntry {
            snapshot: vec![2u32, 3, 1],
            swaps: vec![(0, 1), (1, 2)],
        };
        let frame = entry.render(0);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 5);

        // Cells are 5 wide ("PE3" + 2), so PE k is centred at column 5k + 2
        assert_eq!(lines[2], "  <---->");
        assert_eq!(lines[3], "       <---->");
        for row in &lines[2..4] {
            assert_eq!(row.matches('<').count(), 1);
            assert_eq!(row.matches('>').count(), 1);
        }
    }
}
