//! Systolic Odd-Even Transposition Sort
//!
//! Simulates a line of compare-exchange processing elements that sorts in
//! lock-step clock cycles, and measures the simulation under several
//! execution strategies:
//!
//! - **Scalar**: element-by-element reference ([`cpu_systolic_sort`])
//! - **Batch**: masked bulk exchange per phase ([`cpu_batch_sort`])
//! - **Parallel**: phase pairs spread over rayon ([`cpu_parallel_sort`])
//! - **GPU**: one Metal dispatch per phase ([`gpu_systolic_sort`])
//!
//! A sequential bubble sort ([`cpu_bubble_sort`]) serves as a baseline, and
//! [`step_trace`] records the network cycle by cycle for visualisation.

pub mod backend;
pub mod benchmark;
pub mod cpu_batch_sort;
pub mod cpu_bubble_sort;
pub mod cpu_parallel_sort;
pub mod cpu_systolic_sort;
pub mod error;
pub mod gpu_systolic_sort;
pub mod input;
pub mod network;
pub mod results;
pub mod step_trace;

pub use backend::{BackendKind, SortBackend};
pub use benchmark::{run_benchmark, BenchmarkConfig, WARMUP_RUNS};
pub use error::{BenchError, ResultsError, SortError};
pub use network::{is_sorted, NetworkStats, Phase, Phases};
pub use results::{BenchmarkRow, ResultSet};
pub use step_trace::{StepEntry, StepTrace};
