//! Benchmark driver: one runner, two strategies, events out to a display.

pub mod compare;
pub mod report;
pub mod runner;

pub use compare::{compare, run_comparison, Comparison};
pub use report::{BenchEvent, ReportSink, TerminalSink};
pub use runner::{measure, BenchmarkRunner};
