use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::{SizeBudget, BYTES_PER_GB};
use crate::error::{BenchError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FRAME_BENCH_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "frame-bench.json";

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Column names the benchmark relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchColumns {
    /// Column added at load time holding the file-derived label.
    pub label: String,
    /// Numeric measure that is summed and filtered on.
    pub measure: String,
    /// Date-like key used for grouping and sorting.
    pub key: String,
    /// Columns cast to `Float64` while loading.
    pub numeric: Vec<String>,
}

impl Default for BenchColumns {
    fn default() -> Self {
        Self {
            label: "Stock_Name".into(),
            measure: "volume".into(),
            key: "date".into(),
            numeric: vec!["volume".into(), "open".into()],
        }
    }
}

impl BenchColumns {
    /// The three columns kept after selection, in output order.
    pub fn selection(&self) -> [&str; 3] {
        [self.label.as_str(), self.measure.as_str(), self.key.as_str()]
    }
}

// ---------------------------------------------------------------------------
// Lazy execution page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyDemoConfig {
    pub file: PathBuf,
    pub group_column: String,
    pub close_column: String,
    pub volume_column: String,
    pub close_threshold: f64,
}

impl Default for LazyDemoConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("combined_data3gb.csv"),
            group_column: "company".into(),
            close_column: "close".into(),
            volume_column: "volume".into(),
            close_threshold: 50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub budgets_gb: Vec<f64>,
    pub filter_threshold: f64,
    pub columns: BenchColumns,
    /// Ceiling for the eager path's in-memory footprint.
    pub eager_memory_limit_gb: f64,
    /// Rows per record batch on the eager CSV reader.
    pub eager_batch_rows: usize,
    pub lazy_demo: LazyDemoConfig,
    /// Where `bench_report` writes per-strategy CSV exports.
    pub export_dir: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("archive"),
            pattern: "*.csv".into(),
            budgets_gb: vec![1.0, 2.0, 3.0],
            filter_threshold: 1000.0,
            columns: BenchColumns::default(),
            eager_memory_limit_gb: 8.0,
            eager_batch_rows: 5000,
            lazy_demo: LazyDemoConfig::default(),
            export_dir: None,
        }
    }
}

impl BenchConfig {
    /// Resolve the config: `$FRAME_BENCH_CONFIG`, then `./frame-bench.json`,
    /// then built-in defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_path(local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(BenchError::io(path))?;
        let config: Self = serde_json::from_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn budgets(&self) -> Vec<SizeBudget> {
        self.budgets_gb.iter().copied().map(SizeBudget::new).collect()
    }

    pub fn eager_memory_limit_bytes(&self) -> usize {
        (self.eager_memory_limit_gb * BYTES_PER_GB) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard() {
        let config = BenchConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("archive"));
        assert_eq!(config.pattern, "*.csv");
        assert_eq!(config.budgets_gb, vec![1.0, 2.0, 3.0]);
        assert_eq!(config.filter_threshold, 1000.0);
        assert_eq!(config.columns.selection(), ["Stock_Name", "volume", "date"]);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{ "data_dir": "data", "budgets_gb": [0.5], "columns": { "measure": "qty" } }"#,
        )
        .unwrap();

        let config = BenchConfig::from_path(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.budgets().len(), 1);
        assert_eq!(config.columns.measure, "qty");
        assert_eq!(config.columns.key, "date");
        assert_eq!(config.eager_batch_rows, 5000);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            BenchConfig::from_path(&path),
            Err(BenchError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BenchConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }
}
