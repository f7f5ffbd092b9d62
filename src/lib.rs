//! Polars vs Arrow: a dataframe comparison harness and the pieces the
//! dashboard binaries build on.

pub mod bench;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod showcase;

pub use config::BenchConfig;
pub use error::{BenchError, Result};
