//! CSV to Markdown Converter
//!
//! A simple CLI tool to convert stored benchmark results to a Markdown report.
//!
//! Usage:
//!   csv2md input.csv --sizes 10,100,1000,10000 [output.md]
//!
//! If output is not specified, prints to stdout.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use systolic_sort::results::parse_csv;

#[derive(Parser)]
#[command(name = "csv2md", about = "Convert a benchmark results CSV to Markdown")]
struct Args {
    /// Path to the results CSV file
    input: PathBuf,
    /// Optional output path (prints to stdout if not specified)
    output: Option<PathBuf>,
    /// Sizes the results were produced with, in sweep order
    #[arg(long, value_delimiter = ',', default_value = "10,100,1000,10000")]
    sizes: Vec<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(&args.input)?;
    let results = parse_csv(&content, &args.sizes)?;

    if results.is_empty() {
        return Err(format!("no benchmark rows in {}", args.input.display()).into());
    }

    match &args.output {
        Some(path) => {
            results.save_markdown(path)?;
            println!("Markdown report written to: {}", path.display());
        }
        None => print!("{}", results.to_markdown_table()),
    }
    Ok(())
}
