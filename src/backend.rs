//! Interchangeable execution strategies behind one interface.

use clap::ValueEnum;

use crate::error::SortError;
use crate::gpu_systolic_sort::GpuSystolicSorter;
use crate::network::NetworkStats;
use crate::{cpu_batch_sort, cpu_bubble_sort, cpu_parallel_sort, cpu_systolic_sort};

/// A strategy the benchmark harness can time.
pub trait SortBackend {
    /// Label written to result rows.
    fn label(&self) -> &'static str;

    /// Sort `data` in place.
    fn sort(&mut self, data: &mut [u32]) -> Result<NetworkStats, SortError>;
}

/// Selectable backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Element-by-element network simulation
    Scalar,
    /// Masked bulk exchange per phase
    Batch,
    /// Phase pairs fanned out over rayon
    Parallel,
    /// Phase dispatches on a Metal GPU
    Gpu,
    /// Sequential bubble sort baseline
    Bubble,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        BackendKind::Bubble,
        BackendKind::Scalar,
        BackendKind::Batch,
        BackendKind::Parallel,
        BackendKind::Gpu,
    ];

    /// Build the backend.
    ///
    /// Selecting [`BackendKind::Gpu`] without a usable device fails here with
    /// [`SortError::DeviceUnavailable`] instead of running on something else.
    pub fn create(self) -> Result<Box<dyn SortBackend>, SortError> {
        let backend: Box<dyn SortBackend> = match self {
            BackendKind::Scalar => Box::new(ScalarBackend),
            BackendKind::Batch => Box::new(BatchBackend),
            BackendKind::Parallel => Box::new(ParallelBackend),
            BackendKind::Gpu => Box::new(GpuSystolicSorter::new()?),
            BackendKind::Bubble => Box::new(BubbleBackend),
        };
        Ok(backend)
    }
}

pub struct ScalarBackend;

impl SortBackend for ScalarBackend {
    fn label(&self) -> &'static str {
        "cpu_systolic_scalar"
    }

    fn sort(&mut self, data: &mut [u32]) -> Result<NetworkStats, SortError> {
        Ok(cpu_systolic_sort::sort(data))
    }
}

pub struct BatchBackend;

impl SortBackend for BatchBackend {
    fn label(&self) -> &'static str {
        "cpu_systolic_batch"
    }

    fn sort(&mut self, data: &mut [u32]) -> Result<NetworkStats, SortError> {
        Ok(cpu_batch_sort::sort(data))
    }
}

pub struct ParallelBackend;

impl SortBackend for ParallelBackend {
    fn label(&self) -> &'static str {
        "cpu_systolic_parallel"
    }

    fn sort(&mut self, data: &mut [u32]) -> Result<NetworkStats, SortError> {
        Ok(cpu_parallel_sort::sort(data))
    }
}

pub struct BubbleBackend;

impl SortBackend for BubbleBackend {
    fn label(&self) -> &'static str {
        "cpu_bubble"
    }

    fn sort(&mut self, data: &mut [u32]) -> Result<NetworkStats, SortError> {
        Ok(cpu_bubble_sort::sort(data))
    }
}

impl SortBackend for GpuSystolicSorter {
    fn label(&self) -> &'static str {
        "gpu_systolic_metal"
    }

    fn sort(&mut self, data: &mut [u32]) -> Result<NetworkStats, SortError> {
        GpuSystolicSorter::sort(self, data)
    }
}
