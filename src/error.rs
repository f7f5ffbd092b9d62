use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by both execution paths
// ---------------------------------------------------------------------------

/// Every failure the benchmark harness can surface.
///
/// None of these are retried. `Io` and `ColumnNotFound` abort the run on the
/// current path; `MemoryExhausted` is raised by the eager path only and is
/// turned into a user-visible notice by the comparison driver.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error(
        "eager dataset needs {:.2} GB in memory, limit is {:.2} GB",
        *needed as f64 / crate::data::model::BYTES_PER_GB,
        *limit as f64 / crate::data::model::BYTES_PER_GB
    )]
    MemoryExhausted { needed: usize, limit: usize },

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("polars: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("config: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Wrap an `io::Error` with the path that produced it.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BenchError::Io { path, source }
    }
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;
