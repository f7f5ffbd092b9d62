use super::report::{BenchEvent, ReportSink};
use super::runner::BenchmarkRunner;
use crate::config::BenchConfig;
use crate::data::model::{FileDescriptor, ResultsTable};
use crate::data::scanner;
use crate::engine::{ArrowEager, ExecutionStrategy, PolarsLazy, Workload};
use crate::error::{BenchError, Result};

/// Results of both paths, in the order they ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub lazy: ResultsTable,
    pub eager: ResultsTable,
}

/// Scan the configured directory and run the comparison on what it holds.
pub fn run_comparison(config: &BenchConfig, sink: &mut dyn ReportSink) -> Result<Comparison> {
    let files = scanner::scan(&config.data_dir, &config.pattern)?;
    if files.is_empty() {
        log::warn!(
            "No files matching {} in {}",
            config.pattern,
            config.data_dir.display()
        );
    }
    compare(config, &files, sink)
}

/// Run the Polars lazy path, then the Arrow eager path, over `files`.
///
/// Only the eager path is guarded against memory exhaustion: a
/// `MemoryExhausted` error becomes a notice and the rows already recorded are
/// kept. Every other error aborts the comparison.
pub fn compare(
    config: &BenchConfig,
    files: &[FileDescriptor],
    sink: &mut dyn ReportSink,
) -> Result<Comparison> {
    let budgets = config.budgets();

    let lazy_runner = BenchmarkRunner::new(
        PolarsLazy::new(Workload::from_config(config)),
        files,
        budgets.clone(),
    );
    let mut lazy = ResultsTable::new(lazy_runner.strategy().name());
    lazy_runner.run(&mut lazy, sink)?;

    let eager_runner = BenchmarkRunner::new(ArrowEager::from_config(config), files, budgets);
    let name = eager_runner.strategy().name().to_string();
    let mut eager = ResultsTable::new(name.as_str());
    match eager_runner.run(&mut eager, sink) {
        Ok(()) => {}
        Err(err @ BenchError::MemoryExhausted { .. }) => {
            log::error!("{name} path ran out of memory: {err}");
            sink.report(BenchEvent::Notice {
                strategy: name.clone(),
                message: format!("{name} workflow failed due to memory error: {err}"),
            });
            sink.report(BenchEvent::Finished { strategy: name });
        }
        Err(err) => return Err(err),
    }

    Ok(Comparison { lazy, eager })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(dir: &std::path::Path) {
        let body = "date,open,volume\n2015-02-03,1,2500\n2015-02-02,1,800\n";
        for name in ["A.csv", "B.csv"] {
            std::fs::write(dir.join(name), body).unwrap();
        }
    }

    fn config(dir: &std::path::Path) -> BenchConfig {
        BenchConfig {
            data_dir: dir.to_path_buf(),
            budgets_gb: vec![1.0, 2.0],
            ..BenchConfig::default()
        }
    }

    #[test]
    fn both_paths_produce_a_table() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let mut events = Vec::new();

        let comparison = run_comparison(&config(dir.path()), &mut events).unwrap();
        assert_eq!(comparison.lazy.strategy, "Polars");
        assert_eq!(comparison.eager.strategy, "Arrow");
        assert_eq!(comparison.lazy.len(), 2);
        assert_eq!(comparison.eager.len(), 2);

        let started: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                BenchEvent::Started { strategy } => Some(strategy.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(started, ["Polars", "Arrow"]);
    }

    #[test]
    fn eager_memory_exhaustion_becomes_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let config = BenchConfig {
            eager_memory_limit_gb: 0.0,
            ..config(dir.path())
        };
        let mut events = Vec::new();

        let comparison = run_comparison(&config, &mut events).unwrap();
        assert_eq!(comparison.lazy.len(), 2);
        assert!(comparison.eager.is_empty());
        assert!(events.iter().any(|e| matches!(
            e,
            BenchEvent::Notice { strategy, message }
                if strategy == "Arrow" && message.contains("memory error")
        )));
    }

    #[test]
    fn schema_errors_are_not_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.csv"), "day,volume\nD1,1\n").unwrap();
        let result = run_comparison(&config(dir.path()), &mut Vec::<BenchEvent>::new());
        assert!(matches!(result, Err(BenchError::ColumnNotFound(_))));
    }

    #[test]
    fn empty_directory_yields_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let comparison =
            run_comparison(&config(dir.path()), &mut Vec::<BenchEvent>::new()).unwrap();
        assert!(comparison.lazy.is_empty());
        assert!(comparison.eager.is_empty());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let config = BenchConfig {
            data_dir: "/no/such/archive".into(),
            ..BenchConfig::default()
        };
        let result = run_comparison(&config, &mut Vec::<BenchEvent>::new());
        assert!(matches!(result, Err(BenchError::Io { .. })));
    }
}
