//! Benchmark Harness
//!
//! Drives one backend across a list of input sizes. For every size it runs the
//! backend `repetitions` times on fresh random input, timing only the sort
//! call. Each result is checked for sortedness before its timing is kept; an
//! unsorted result aborts the whole sweep.
//!
//! The first [`WARMUP_RUNS`] timings of every size are discarded and the
//! arithmetic mean of the rest is reported.

use std::ops::Range;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::backend::SortBackend;
use crate::error::BenchError;
use crate::input::{check_range, InputSource};
use crate::network::is_sorted;
use crate::results::{BenchmarkRow, ResultSet};

/// Leading runs per size excluded from the reported mean.
pub const WARMUP_RUNS: usize = 2;

/// Sweep configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Input sizes in the order they are run
    pub sizes: Vec<usize>,
    /// Runs per size, warm-up included
    pub repetitions: usize,
    /// Element values are drawn from `[range.start, range.end)`
    pub range: Range<u32>,
    /// Seed for reproducible inputs; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![10, 100, 1000, 10000],
            repetitions: 25,
            range: 0..10_000,
            seed: None,
        }
    }
}

impl BenchmarkConfig {
    /// Reject configurations that cannot produce a trimmed mean.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.repetitions <= WARMUP_RUNS {
            return Err(BenchError::TooFewRepetitions {
                repetitions: self.repetitions,
            });
        }
        if self.sizes.iter().any(|&size| size == 0) {
            return Err(BenchError::InvalidSize);
        }
        check_range(&self.range)
    }

    fn input_source(&self) -> InputSource {
        match self.seed {
            Some(seed) => InputSource::seeded(seed, self.range.clone()),
            None => InputSource::from_entropy(self.range.clone()),
        }
    }
}

/// Durations of every run for one (backend, size) pair, in run order.
#[derive(Debug, Clone, Default)]
pub struct TimingSamples {
    durations: Vec<Duration>,
}

impl TimingSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, duration: Duration) {
        self.durations.push(duration);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Mean in seconds of the samples after the first `warmup`.
    ///
    /// Returns `None` when no samples remain.
    pub fn trimmed_mean(&self, warmup: usize) -> Option<f64> {
        let kept = self.durations.get(warmup..)?;
        if kept.is_empty() {
            return None;
        }
        let total: f64 = kept.iter().map(Duration::as_secs_f64).sum();
        Some(total / kept.len() as f64)
    }
}

/// Run `backend` over every configured size and collect one row per size.
pub fn run_benchmark(
    backend: &mut dyn SortBackend,
    config: &BenchmarkConfig,
) -> Result<ResultSet, BenchError> {
    config.validate()?;

    let label = backend.label();
    let mut source = config.input_source();
    let mut results = ResultSet::new();

    for &size in &config.sizes {
        info!(backend = label, size, runs = config.repetitions, "benchmarking");

        let mut samples = TimingSamples::new();
        for run in 0..config.repetitions {
            let mut data = source.generate(size);

            let start = Instant::now();
            let stats = backend.sort(&mut data)?;
            let elapsed = start.elapsed();

            if !is_sorted(&data) {
                return Err(BenchError::InvariantViolated {
                    backend: label,
                    size,
                    run,
                });
            }

            debug!(
                backend = label,
                size,
                run,
                secs = elapsed.as_secs_f64(),
                exchanges = stats.exchanges,
                "run finished"
            );
            samples.push(elapsed);
        }

        // validate() guarantees repetitions > WARMUP_RUNS
        let mean_secs = samples.trimmed_mean(WARMUP_RUNS).unwrap_or_default();
        info!(
            backend = label,
            size,
            mean_secs,
            "average execution time ({} runs)",
            samples.len() - WARMUP_RUNS
        );

        results.push(BenchmarkRow {
            backend: label.to_string(),
            size,
            mean_secs,
            runs: samples.len() - WARMUP_RUNS,
        });
    }

    Ok(results)
}
