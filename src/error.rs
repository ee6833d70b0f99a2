//! Error types for network simulation and benchmarking.

use thiserror::Error;

use crate::benchmark::WARMUP_RUNS;

/// Failure raised by a sorting backend.
#[derive(Debug, Error)]
pub enum SortError {
    /// The requested parallel-compute device cannot be used on this machine.
    #[error("parallel-compute device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device was found but compiling or running the kernel failed.
    #[error("device execution failed: {0}")]
    Device(String),
}

/// Failure raised by the benchmark harness.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("repetition count {repetitions} must exceed the {} warm-up runs", WARMUP_RUNS)]
    TooFewRepetitions { repetitions: usize },

    #[error("input sizes must be positive")]
    InvalidSize,

    #[error("input range {low}..{high} is empty")]
    EmptyRange { low: u32, high: u32 },

    /// The oracle found an unsorted result. Never retried.
    #[error("sort invariant violated: backend {backend} left size {size} unsorted on run {run}")]
    InvariantViolated {
        backend: &'static str,
        size: usize,
        run: usize,
    },

    #[error(transparent)]
    Sort(#[from] SortError),
}

/// Failure reading stored benchmark results.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("line {line}: expected `backend,exe time`, got {content:?}")]
    MalformedRow { line: usize, content: String },

    #[error("backend {backend} has {rows} rows but {sizes} sizes were given")]
    SizeMismatch {
        backend: String,
        rows: usize,
        sizes: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
