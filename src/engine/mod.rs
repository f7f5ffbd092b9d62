//! Execution strategies: the two dataframe libraries under comparison.
//!
//! ```text
//!            ExecutionStrategy
//!         ┌──────────┴──────────┐
//!   ┌────────────┐        ┌───────────┐
//!   │ PolarsLazy │        │ ArrowEager│
//!   └────────────┘        └───────────┘
//!   plan → collect        kernel calls materialize
//!   (Deferred)            immediately (Eager)
//! ```
//!
//! The benchmark runner only talks to the trait, so both libraries go through
//! the same measurement routine.

use std::fmt;

use crate::config::{BenchColumns, BenchConfig};
use crate::data::model::FileDescriptor;
use crate::error::Result;

pub mod eager;
pub mod lazy;

pub use eager::ArrowEager;
pub use lazy::PolarsLazy;

/// Name of the summed column produced by [`Operation::Aggregate`].
pub const TOTAL_COLUMN: &str = "Total Volume";

// ---------------------------------------------------------------------------
// Operations and modes
// ---------------------------------------------------------------------------

/// The three timed operations. None feeds into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Group by key, sum the measure.
    Aggregate,
    /// Keep rows whose measure exceeds the threshold.
    Filter,
    /// Stable ascending sort by key.
    Sort,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Aggregate, Operation::Filter, Operation::Sort];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Aggregate => write!(f, "group by & aggregation"),
            Operation::Filter => write!(f, "search"),
            Operation::Sort => write!(f, "sorting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Each call runs to completion immediately.
    Eager,
    /// Calls build a plan; work happens when the plan is forced.
    Deferred,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Eager => write!(f, "eager"),
            ExecutionMode::Deferred => write!(f, "lazy"),
        }
    }
}

/// Column names and the filter threshold shared by every strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    pub columns: BenchColumns,
    pub threshold: f64,
}

impl Workload {
    pub fn from_config(config: &BenchConfig) -> Self {
        Self {
            columns: config.columns.clone(),
            threshold: config.filter_threshold,
        }
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::from_config(&BenchConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

pub trait ExecutionStrategy {
    /// Dataset handle: a plan for deferred strategies, data for eager ones.
    type Frame: Clone;
    /// Materialized result of one operation.
    type Output;

    fn name(&self) -> &str;

    fn mode(&self) -> ExecutionMode;

    /// Read every file in `files`, cast the numeric columns and tag rows with
    /// the file label. `Ok(None)` when `files` is empty.
    fn read(&self, files: &[FileDescriptor]) -> Result<Option<Self::Frame>>;

    /// Restrict to label, measure and key. Fails with `ColumnNotFound`.
    fn select(&self, frame: Self::Frame) -> Result<Self::Frame>;

    /// Run `op` to completion. Deferred strategies force their plan here.
    fn execute(&self, frame: &Self::Frame, op: Operation) -> Result<Self::Output>;

    /// Memory footprint of the selected dataset in GB, one decimal.
    fn estimate_memory_gb(&self, frame: &Self::Frame) -> Result<f64>;
}
