//! Systolic Sort Benchmark
//!
//! Command-line driver for the odd-even transposition network:
//!
//! - `bench`: time one or all backends across input sizes and optionally
//!   append the results to a CSV file
//! - `trace`: print the network state after every clock cycle

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use systolic_sort::benchmark::{run_benchmark, BenchmarkConfig};
use systolic_sort::input::{check_range, InputSource};
use systolic_sort::step_trace::StepTrace;
use systolic_sort::{BackendKind, BenchError, ResultSet, SortError};

#[derive(Parser)]
#[command(name = "systolic-sort", about = "Systolic odd-even transposition sort simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Benchmark backends across input sizes
    Bench {
        /// Backend to run; all backends when omitted
        #[arg(long, value_enum)]
        backend: Option<BackendKind>,
        /// Input sizes, in run order
        #[arg(long, value_delimiter = ',', default_value = "10,100,1000,10000")]
        sizes: Vec<usize>,
        /// Runs per size, including the warm-up runs
        #[arg(long, default_value_t = 25)]
        runs: usize,
        /// Smallest element value (inclusive)
        #[arg(long, default_value_t = 0)]
        low: u32,
        /// Largest element value (exclusive)
        #[arg(long, default_value_t = 10_000)]
        high: u32,
        /// Seed for reproducible inputs
        #[arg(long)]
        seed: Option<u64>,
        /// CSV file to append results to
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the network state after every clock cycle
    Trace {
        /// Number of processing elements
        #[arg(long, default_value_t = 10)]
        size: usize,
        /// Element values are drawn from [0, high)
        #[arg(long, default_value_t = 100)]
        high: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Bench {
            backend,
            sizes,
            runs,
            low,
            high,
            seed,
            output,
        } => {
            let config = BenchmarkConfig {
                sizes,
                repetitions: runs,
                range: low..high,
                seed,
            };
            bench(backend, &config, output)
        }
        Command::Trace { size, high, seed } => trace(size, high, seed),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn bench(
    backend: Option<BackendKind>,
    config: &BenchmarkConfig,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let mut results = ResultSet::new();

    match backend {
        Some(kind) => {
            let mut backend = kind.create()?;
            results.extend(run_benchmark(backend.as_mut(), config)?);
        }
        None => {
            for kind in BackendKind::ALL {
                let mut backend = match kind.create() {
                    Ok(b) => b,
                    Err(SortError::DeviceUnavailable(reason)) => {
                        warn!(?kind, %reason, "backend not available, skipping");
                        continue;
                    }
                    Err(e) => return Err(BenchError::from(e).into()),
                };
                results.extend(run_benchmark(backend.as_mut(), config)?);
            }
        }
    }

    print_summary(&results, config);

    if let Some(path) = output {
        results.append_csv(&path)?;
        println!("\nResults appended to: {}", path.display());
    }

    Ok(())
}

fn print_summary(results: &ResultSet, config: &BenchmarkConfig) {
    let backends = results.backends();

    println!();
    print!("{:>10}", "Size");
    for backend in &backends {
        print!(" | {:>22}", backend);
    }
    println!();
    print!("{:-<10}", "");
    for _ in &backends {
        print!("-+-{:-<22}", "");
    }
    println!();

    for &size in &config.sizes {
        print!("{:>10}", size);
        for backend in &backends {
            let cell = results
                .rows()
                .iter()
                .find(|r| r.backend == *backend && r.size == size)
                .map(|r| format!("{:.6} s", r.mean_secs))
                .unwrap_or_else(|| "N/A".to_string());
            print!(" | {:>22}", cell);
        }
        println!();
    }
}

fn trace(size: usize, high: u32, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let range = 0..high;
    check_range(&range)?;
    let mut source = InputSource::seeded(seed, range);
    let data = source.generate(size);
    let steps = StepTrace::new(&data);
    println!("Initial data ({} PEs): {:?}\n", steps.size(), data);

    for (cycle, step) in steps.enumerate() {
        println!("{}\n", step.render(cycle));
    }
    Ok(())
}
