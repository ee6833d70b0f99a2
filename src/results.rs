//! Benchmark Result Accumulation and Reports
//!
//! [`ResultSet`] collects one [`BenchmarkRow`] per (backend, size) and is
//! handed back to the caller, who persists it once.
//!
//! The CSV form keeps the two-column layout shared with earlier result files:
//!
//! ```text
//! backend,exe time
//! cpu_systolic_scalar,0.000012
//! cpu_systolic_scalar,0.000803
//! ```
//!
//! Sizes are implicit in the CSV: rows of a backend appear in sweep order, so
//! reading a file back requires the size list it was produced with. A file
//! appended to by several sweeps holds one series per sweep; the latest
//! series of each backend wins.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::ResultsError;

/// Header written when a results file is created.
pub const CSV_HEADER: &str = "backend,exe time";

/// Backend the comparison table measures speedups against.
const REFERENCE_BACKEND: &str = "cpu_systolic_scalar";

/// Trimmed-mean timing of one backend at one input size
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    /// Backend label (e.g., "cpu_systolic_batch", "gpu_systolic_metal")
    pub backend: String,
    /// Input size in elements
    pub size: usize,
    /// Mean execution time in seconds, warm-up runs excluded
    pub mean_secs: f64,
    /// Number of runs the mean was taken over
    pub runs: usize,
}

/// Ordered collection of benchmark rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<BenchmarkRow>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: BenchmarkRow) {
        self.rows.push(row);
    }

    /// Append every row of `other`, keeping order.
    pub fn extend(&mut self, other: ResultSet) {
        self.rows.extend(other.rows);
    }

    pub fn rows(&self) -> &[BenchmarkRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Backend labels in first-seen order.
    pub fn backends(&self) -> Vec<&str> {
        let mut backends: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !backends.contains(&row.backend.as_str()) {
                backends.push(&row.backend);
            }
        }
        backends
    }

    /// Sorted, de-duplicated sizes.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.rows.iter().map(|r| r.size).collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    fn find(&self, backend: &str, size: usize) -> Option<&BenchmarkRow> {
        self.rows
            .iter()
            .find(|r| r.backend == backend && r.size == size)
    }

    /// CSV rows without the header.
    pub fn to_csv_rows(&self) -> String {
        let mut output = String::new();
        for row in &self.rows {
            writeln!(output, "{},{}", row.backend, row.mean_secs).unwrap();
        }
        output
    }

    /// Append the rows to a CSV file, writing the header only if the file is
    /// new or empty.
    pub fn append_csv(&self, path: &Path) -> io::Result<()> {
        let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if needs_header {
            writeln!(file, "{}", CSV_HEADER)?;
        }
        file.write_all(self.to_csv_rows().as_bytes())
    }

    /// Generate a markdown report: timings per size, then speedups against the
    /// scalar reference.
    pub fn to_markdown_table(&self) -> String {
        let mut output = String::new();
        let backends = self.backends();
        let sizes = self.sizes();

        writeln!(output, "# Systolic Sort Benchmark Report").unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Mean Execution Time (s)").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Size | {} |", backends.join(" | ")).unwrap();
        writeln!(output, "|------|{}", "------|".repeat(backends.len())).unwrap();

        for &size in &sizes {
            let cells: Vec<String> = backends
                .iter()
                .map(|b| {
                    self.find(b, size)
                        .map(|r| format_secs(r.mean_secs))
                        .unwrap_or_else(|| "N/A".to_string())
                })
                .collect();
            writeln!(output, "| {} | {} |", format_size(size), cells.join(" | ")).unwrap();
        }
        writeln!(output).unwrap();

        let others: Vec<&str> = backends
            .iter()
            .copied()
            .filter(|b| *b != REFERENCE_BACKEND)
            .collect();

        if backends.contains(&REFERENCE_BACKEND) && !others.is_empty() {
            writeln!(output, "## Speedup vs {}", REFERENCE_BACKEND).unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Size | {} |", others.join(" | ")).unwrap();
            writeln!(output, "|------|{}", "------|".repeat(others.len())).unwrap();

            for &size in &sizes {
                let reference = self.find(REFERENCE_BACKEND, size);
                let cells: Vec<String> = others
                    .iter()
                    .map(|b| match (reference, self.find(b, size)) {
                        (Some(r), Some(o)) if o.mean_secs > 0.0 => {
                            format!("{:.2}x", r.mean_secs / o.mean_secs)
                        }
                        _ => "N/A".to_string(),
                    })
                    .collect();
                writeln!(output, "| {} | {} |", format_size(size), cells.join(" | ")).unwrap();
            }
            writeln!(output).unwrap();
        }

        writeln!(output, "---").unwrap();
        writeln!(output, "*Report generated by systolic-sort csv2md*").unwrap();

        output
    }

    /// Save the report as a markdown file
    pub fn save_markdown(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_markdown_table())
    }
}

/// Parse a results CSV, pairing each backend's rows with `sizes` in order.
///
/// Rows past the first `sizes.len()` of a backend belong to a later sweep and
/// replace the earlier timing for the same size.
pub fn parse_csv(content: &str, sizes: &[usize]) -> Result<ResultSet, ResultsError> {
    let mut results = ResultSet::new();
    let mut seen: Vec<(String, usize)> = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == CSV_HEADER {
            continue;
        }

        let malformed = || ResultsError::MalformedRow {
            line: index + 1,
            content: trimmed.to_string(),
        };
        let (backend, secs) = trimmed.split_once(',').ok_or_else(malformed)?;
        let mean_secs: f64 = secs.trim().parse().map_err(|_| malformed())?;
        let backend = backend.trim().to_string();

        let position = match seen.iter_mut().find(|(b, _)| *b == backend) {
            Some((_, count)) => {
                *count += 1;
                *count - 1
            }
            None => {
                seen.push((backend.clone(), 1));
                0
            }
        };
        if sizes.is_empty() {
            return Err(ResultsError::SizeMismatch {
                backend,
                rows: position + 1,
                sizes: 0,
            });
        }
        // Every sizes.len() rows of a backend is one appended sweep
        let size = sizes[position % sizes.len()];

        match results
            .rows
            .iter_mut()
            .find(|r| r.backend == backend && r.size == size)
        {
            Some(existing) => existing.mean_secs = mean_secs,
            None => results.push(BenchmarkRow {
                backend,
                size,
                mean_secs,
                runs: 0,
            }),
        }
    }

    Ok(results)
}

/// Format a duration in seconds, switching to scientific notation below 1 ms.
fn format_secs(secs: f64) -> String {
    if secs > 0.0 && secs < 0.001 {
        let exponent = secs.log10().floor() as i32;
        let base = secs / 10f64.powi(exponent);
        format!("{:.1}×10^{}", base, exponent)
    } else {
        format!("{:.6}", secs)
    }
}

/// Format a size as a human-readable string (e.g., "1K", "1M")
fn format_size(size: usize) -> String {
    if size >= 1_000_000 {
        format!("{}M", size / 1_000_000)
    } else if size >= 1_000 {
        format!("{}K", size / 1_000)
    } else {
        size.to_string()
    }
}
