use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::{BenchError, Result};

/// Bytes in one gigabyte as the size budgets count them (1024³).
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

// ---------------------------------------------------------------------------
// FileDescriptor – one candidate input file
// ---------------------------------------------------------------------------

/// A CSV file found by the scanner. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// File name without extension; tagged onto every row read from it.
    pub label: String,
}

impl FileDescriptor {
    /// Build a descriptor from filesystem metadata.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(BenchError::io(path))?;
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: meta.len(),
            label: derive_label(path),
        })
    }

    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_GB
    }
}

/// `archive/RELIANCE.csv` → `RELIANCE`.
pub fn derive_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// SizeBudget – cumulative ceiling for one benchmark iteration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SizeBudget {
    pub gb: f64,
}

impl SizeBudget {
    pub fn new(gb: f64) -> Self {
        Self { gb }
    }

    /// Label used in the results table, e.g. `1 GB`.
    pub fn label(&self) -> String {
        format!("{} GB", self.gb)
    }
}

impl fmt::Display for SizeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} GB", self.gb)
    }
}

// ---------------------------------------------------------------------------
// Operation timings
// ---------------------------------------------------------------------------

/// Wall-clock time of each timed operation for one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperationTimes {
    pub aggregation: Duration,
    pub filter: Duration,
    pub sort: Duration,
}

pub const BUDGET_HEADER: &str = "Data Size (GB)";
pub const LOAD_HEADER: &str = "Reading Time(s)";
pub const AGGREGATION_HEADER: &str = "Group By & Aggregation Time (s)";
pub const FILTER_HEADER: &str = "Search Time (s)";
pub const SORT_HEADER: &str = "Sorting Time (s)";
pub const MEMORY_HEADER: &str = "Estimated Memory (GB)";

/// Round to `places` decimals the way the table displays figures.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// MetricRecord – one row of a results table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub budget: String,
    pub load: Duration,
    pub times: OperationTimes,
    /// Already rounded to one decimal by the strategy's estimator.
    pub memory_gb: f64,
}

/// Flat, serializable view of a [`MetricRecord`] used for exports.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRow {
    #[serde(rename = "Data Size (GB)")]
    pub budget: String,
    #[serde(rename = "Reading Time(s)")]
    pub load_secs: f64,
    #[serde(rename = "Group By & Aggregation Time (s)")]
    pub aggregation_secs: f64,
    #[serde(rename = "Search Time (s)")]
    pub filter_secs: f64,
    #[serde(rename = "Sorting Time (s)")]
    pub sort_secs: f64,
    #[serde(rename = "Estimated Memory (GB)")]
    pub memory_gb: f64,
}

impl From<&MetricRecord> for MetricRow {
    fn from(r: &MetricRecord) -> Self {
        MetricRow {
            budget: r.budget.clone(),
            load_secs: r.load.as_secs_f64(),
            aggregation_secs: round_to(r.times.aggregation.as_secs_f64(), 2),
            filter_secs: round_to(r.times.filter.as_secs_f64(), 2),
            sort_secs: round_to(r.times.sort.as_secs_f64(), 2),
            memory_gb: r.memory_gb,
        }
    }
}

// ---------------------------------------------------------------------------
// ResultsTable – ordered records for one execution path
// ---------------------------------------------------------------------------

/// Records in insertion (= budget) order. Rendered as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    pub strategy: String,
    pub records: Vec<MetricRecord>,
}

impl ResultsTable {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: MetricRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> Vec<MetricRow> {
        self.records.iter().map(MetricRow::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_drops_directory_and_extension() {
        assert_eq!(derive_label(Path::new("archive/RELIANCE.csv")), "RELIANCE");
        assert_eq!(derive_label(Path::new("TCS")), "TCS");
    }

    #[test]
    fn budget_labels() {
        assert_eq!(SizeBudget::new(1.0).label(), "1 GB");
        assert_eq!(SizeBudget::new(0.5).to_string(), "0.5 GB");
    }

    #[test]
    fn rows_round_operation_times_but_not_load_time() {
        let record = MetricRecord {
            budget: "1 GB".into(),
            load: Duration::from_millis(1234),
            times: OperationTimes {
                aggregation: Duration::from_millis(456),
                filter: Duration::from_millis(4),
                sort: Duration::from_millis(1999),
            },
            memory_gb: 0.3,
        };
        let row = MetricRow::from(&record);
        assert!((row.load_secs - 1.234).abs() < 1e-9);
        assert_eq!(row.aggregation_secs, 0.46);
        assert_eq!(row.filter_secs, 0.0);
        assert_eq!(row.sort_secs, 2.0);
    }

    #[test]
    fn descriptor_reads_size_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("INFY.csv");
        std::fs::write(&path, "date,volume\n").unwrap();
        let fd = FileDescriptor::from_path(&path).unwrap();
        assert_eq!(fd.size_bytes, 12);
        assert_eq!(fd.label, "INFY");
    }
}
