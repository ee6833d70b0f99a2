//! GPU Systolic Sort using Metal
//!
//! Runs the odd-even transposition network on the GPU. Each half-cycle is one
//! compute dispatch in which thread `k` owns pair `k` of the phase: it loads
//! both operands, compares them, and writes them back exchanged if the left is
//! greater.
//!
//! ## Execution model
//!
//! 1. **Acquire**: the device, command queue and pipeline are created when the
//!    sorter is constructed, so a missing device fails at selection time
//! 2. **Upload**: the input is copied into a device buffer once per call
//! 3. **Compute**: the host commits one command buffer per phase and waits for
//!    it to complete before encoding the next, since each phase reads what the
//!    previous one wrote
//! 4. **Download**: the sorted buffer is copied back once at the end
//! 5. **Release**: all buffers are dropped when the call returns
//!
//! This module only compiles on macOS. On other platforms, a stub implementation
//! is provided that returns an error.

#[cfg(target_os = "macos")]
mod metal_impl {
    use metal::*;
    use std::mem;
    use tracing::{debug, info};

    use crate::error::SortError;
    use crate::network::{NetworkStats, Phase};

    /// Shader source for one phase of the network.
    ///
    /// `offset` is 0 for the even phase and 1 for the odd phase. Pairs within a
    /// phase never share an index, so threads never race on the same element.
    const SHADER_SOURCE: &str = r#"
#include <metal_stdlib>
using namespace metal;

kernel void odd_even_phase(
    device uint *data [[buffer(0)]],
    device atomic_uint *exchanges [[buffer(1)]],
    constant uint &array_size [[buffer(2)]],
    constant uint &offset [[buffer(3)]],
    uint gid [[thread_position_in_grid]])
{
    uint left_idx = offset + gid * 2;
    uint right_idx = left_idx + 1;
    if (right_idx >= array_size) {
        return;
    }

    uint left_val = data[left_idx];
    uint right_val = data[right_idx];

    if (left_val > right_val) {
        data[left_idx] = right_val;
        data[right_idx] = left_val;
        atomic_fetch_add_explicit(exchanges, 1, memory_order_relaxed);
    }
}
"#;

    /// Systolic network sorter backed by a Metal device.
    pub struct GpuSystolicSorter {
        device: Device,
        command_queue: CommandQueue,
        phase_pipeline: ComputePipelineState,
        /// Maximum threads per threadgroup supported by the pipeline
        max_threadgroup_size: usize,
    }

    impl GpuSystolicSorter {
        /// Acquire the default Metal device and compile the phase kernel.
        ///
        /// Returns [`SortError::DeviceUnavailable`] if there is no device.
        pub fn new() -> Result<Self, SortError> {
            let device = Device::system_default().ok_or_else(|| {
                SortError::DeviceUnavailable("no Metal device found".to_string())
            })?;

            info!(device = %device.name(), "using GPU");

            let command_queue = device.new_command_queue();

            let options = CompileOptions::new();
            let library = device
                .new_library_with_source(SHADER_SOURCE, &options)
                .map_err(|e| SortError::Device(format!("failed to compile shader: {}", e)))?;

            let phase_fn = library
                .get_function("odd_even_phase", None)
                .map_err(|e| SortError::Device(format!("failed to get odd_even_phase: {}", e)))?;

            let phase_pipeline = device
                .new_compute_pipeline_state_with_function(&phase_fn)
                .map_err(|e| SortError::Device(format!("failed to create pipeline: {}", e)))?;

            let max_threadgroup_size = phase_pipeline.max_total_threads_per_threadgroup() as usize;

            Ok(Self {
                device,
                command_queue,
                phase_pipeline,
                max_threadgroup_size,
            })
        }

        fn u32_buffer(&self, value: u32) -> Buffer {
            self.device.new_buffer_with_data(
                &value as *const u32 as *const _,
                mem::size_of::<u32>() as u64,
                MTLResourceOptions::StorageModeShared,
            )
        }

        /// Sort the given data in-place by running the network on the GPU.
        pub fn sort(&self, data: &mut [u32]) -> Result<NetworkStats, SortError> {
            let n = data.len();

            if n <= 1 {
                return Ok(NetworkStats {
                    cycles: n,
                    exchanges: 0,
                });
            }

            let n_u32 = u32::try_from(n).map_err(|_| {
                SortError::Device(format!("array of {} elements exceeds u32 indexing", n))
            })?;

            // Upload once
            let buffer_size = (n * mem::size_of::<u32>()) as u64;
            let buffer = self.device.new_buffer_with_data(
                data.as_ptr() as *const _,
                buffer_size,
                MTLResourceOptions::StorageModeShared,
            );
            let exchange_buffer = self.u32_buffer(0);
            let array_size_buffer = self.u32_buffer(n_u32);
            let offset_buffers = Phase::CYCLE.map(|phase| self.u32_buffer(phase.offset() as u32));

            let exchange_counter = exchange_buffer.contents() as *mut u32;
            let mut exchanges = 0usize;

            for _cycle in 0..n {
                for (phase, offset_buffer) in Phase::CYCLE.iter().zip(&offset_buffers) {
                    let pairs = phase.pair_count(n);
                    if pairs == 0 {
                        continue;
                    }

                    let command_buffer = self.command_queue.new_command_buffer();
                    let encoder = command_buffer.new_compute_command_encoder();

                    encoder.set_compute_pipeline_state(&self.phase_pipeline);
                    encoder.set_buffer(0, Some(&buffer), 0);
                    encoder.set_buffer(1, Some(&exchange_buffer), 0);
                    encoder.set_buffer(2, Some(&array_size_buffer), 0);
                    encoder.set_buffer(3, Some(offset_buffer), 0);

                    let grid_size = MTLSize::new(pairs as u64, 1, 1);
                    let threadgroup_size =
                        MTLSize::new(self.max_threadgroup_size.min(pairs) as u64, 1, 1);

                    encoder.dispatch_threads(grid_size, threadgroup_size);
                    encoder.end_encoding();

                    // Barrier: the next phase reads this phase's writes.
                    command_buffer.commit();
                    command_buffer.wait_until_completed();
                }

                // At most n - 1 exchanges per cycle, so the device counter is
                // drained every cycle and never wraps.
                unsafe {
                    exchanges += *exchange_counter as usize;
                    *exchange_counter = 0;
                }
            }

            // Download once
            let result_ptr = buffer.contents() as *const u32;
            unsafe {
                std::ptr::copy_nonoverlapping(result_ptr, data.as_mut_ptr(), n);
            }

            debug!(size = n, exchanges, "gpu network finished");

            Ok(NetworkStats {
                cycles: n,
                exchanges,
            })
        }

        /// Get the name of the GPU device.
        pub fn device_name(&self) -> String {
            self.device.name().to_string()
        }
    }
}

// Re-export the macOS implementation
#[cfg(target_os = "macos")]
pub use metal_impl::GpuSystolicSorter;

#[cfg(not(target_os = "macos"))]
use crate::error::SortError;
#[cfg(not(target_os = "macos"))]
use crate::network::NetworkStats;

// Stub implementation for non-macOS platforms
#[cfg(not(target_os = "macos"))]
pub struct GpuSystolicSorter;

#[cfg(not(target_os = "macos"))]
impl GpuSystolicSorter {
    /// Acquire a GPU sorter.
    ///
    /// On non-macOS platforms, this always returns an error.
    pub fn new() -> Result<Self, SortError> {
        Err(SortError::DeviceUnavailable(
            "the Metal backend is only available on macOS".to_string(),
        ))
    }

    /// On non-macOS platforms, this always returns an error.
    pub fn sort(&self, _data: &mut [u32]) -> Result<NetworkStats, SortError> {
        Err(SortError::DeviceUnavailable(
            "the Metal backend is only available on macOS".to_string(),
        ))
    }

    pub fn device_name(&self) -> String {
        "N/A (Metal not available on this platform)".to_string()
    }
}

#[cfg(all(test, target_os = "macos"))]
mod tests {
    use super::*;
    use crate::cpu_batch_sort;
    use crate::network::is_sorted;
    use rand::Rng;

    fn sorter() -> Option<GpuSystolicSorter> {
        match GpuSystolicSorter::new() {
            Ok(s) => Some(s),
            Err(_) => {
                println!("Skipping GPU test: Metal not available");
                None
            }
        }
    }

    #[test]
    fn test_gpu_matches_batch_on_boundary_sizes() {
        let Some(sorter) = sorter() else { return };
        let mut rng = rand::thread_rng();

        for size in [0, 1, 2, 7] {
            let input: Vec<u32> = (0..size).map(|_| rng.gen_range(0..100)).collect();

            let mut expected = input.clone();
            let expected_stats = cpu_batch_sort::sort(&mut expected);

            let mut data = input;
            let stats = sorter.sort(&mut data).unwrap();
            assert_eq!(data, expected, "size {size}");
            assert_eq!(stats, expected_stats, "size {size}");
        }
    }

    #[test]
    fn test_gpu_sort_small() {
        let Some(sorter) = sorter() else { return };
        let mut data = vec![5, 3, 4, 1, 2];
        let stats = sorter.sort(&mut data).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 5]);
        assert_eq!(stats.cycles, 5);
    }

    #[test]
    fn test_gpu_sort_random() {
        let Some(sorter) = sorter() else { return };
        let mut rng = rand::thread_rng();
        let mut data: Vec<u32> = (0..1000).map(|_| rng.gen_range(0..10_000)).collect();
        let mut expected = data.clone();
        expected.sort_unstable();

        sorter.sort(&mut data).unwrap();
        assert!(is_sorted(&data));
        assert_eq!(data, expected);
    }

    #[test]
    fn test_gpu_sort_already_sorted() {
        let Some(sorter) = sorter() else { return };
        let mut data: Vec<u32> = (0..300).collect();
        let stats = sorter.sort(&mut data).unwrap();
        assert_eq!(data, (0..300).collect::<Vec<u32>>());
        assert_eq!(stats.exchanges, 0);
        assert_eq!(stats.cycles, 300);
    }

    #[test]
    fn test_gpu_sort_reverse_sorted() {
        let Some(sorter) = sorter() else { return };
        let mut data: Vec<u32> = (0..257).rev().collect();
        let stats = sorter.sort(&mut data).unwrap();
        assert_eq!(data, (0..257).collect::<Vec<u32>>());
        assert_eq!(stats.exchanges, 257 * 256 / 2);
    }
}

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_unavailable_off_macos() {
        assert!(matches!(
            GpuSystolicSorter::new(),
            Err(SortError::DeviceUnavailable(_))
        ));
    }
}
