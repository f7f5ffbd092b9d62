use std::time::{Duration, Instant};

use super::report::{BenchEvent, ReportSink};
use crate::data::loader;
use crate::data::model::{FileDescriptor, MetricRecord, OperationTimes, ResultsTable, SizeBudget};
use crate::engine::{ExecutionStrategy, Operation};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Operation timer
// ---------------------------------------------------------------------------

fn timed<T>(f: impl FnOnce() -> Result<T>) -> Result<(T, Duration)> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed()))
}

/// Select the columns of interest, then time each operation on that
/// selection. Returns the selection so the caller can estimate its memory.
pub fn measure<S: ExecutionStrategy>(
    strategy: &S,
    frame: S::Frame,
) -> Result<(OperationTimes, S::Frame)> {
    let selected = strategy.select(frame)?;
    let mut times = OperationTimes::default();
    for op in Operation::ALL {
        let (output, elapsed) = timed(|| strategy.execute(&selected, op))?;
        drop(output);
        log::debug!("{} {op}: {elapsed:.2?}", strategy.name());
        match op {
            Operation::Aggregate => times.aggregation = elapsed,
            Operation::Filter => times.filter = elapsed,
            Operation::Sort => times.sort = elapsed,
        }
    }
    Ok((times, selected))
}

// ---------------------------------------------------------------------------
// Benchmark runner
// ---------------------------------------------------------------------------

/// Runs load + measure + record for every budget on one strategy.
pub struct BenchmarkRunner<'a, S> {
    strategy: S,
    files: &'a [FileDescriptor],
    budgets: Vec<SizeBudget>,
}

impl<'a, S: ExecutionStrategy> BenchmarkRunner<'a, S> {
    pub fn new(strategy: S, files: &'a [FileDescriptor], budgets: Vec<SizeBudget>) -> Self {
        Self {
            strategy,
            files,
            budgets,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Build a record, append it and push the whole table to `sink`.
    pub fn record(
        &self,
        table: &mut ResultsTable,
        budget: SizeBudget,
        load: Duration,
        times: OperationTimes,
        selected: &S::Frame,
        sink: &mut dyn ReportSink,
    ) -> Result<MetricRecord> {
        let memory_gb = self.strategy.estimate_memory_gb(selected)?;
        let record = MetricRecord {
            budget: budget.label(),
            load,
            times,
            memory_gb,
        };
        table.push(record.clone());

        sink.report(BenchEvent::Table(table.clone()));
        sink.report(BenchEvent::Memory {
            strategy: self.strategy.name().to_string(),
            budget: record.budget.clone(),
            gb: memory_gb,
        });
        Ok(record)
    }

    /// Run every budget in order, appending to `table`.
    ///
    /// On error the rows recorded so far stay in `table`.
    pub fn run(&self, table: &mut ResultsTable, sink: &mut dyn ReportSink) -> Result<()> {
        let name = self.strategy.name().to_string();
        let total = self.budgets.len().max(1);
        log::info!(
            "Running {name} ({} execution) over {} checkpoint(s)",
            self.strategy.mode(),
            self.budgets.len()
        );
        sink.report(BenchEvent::Started {
            strategy: name.clone(),
        });

        for (done, budget) in self.budgets.iter().copied().enumerate() {
            let (frame, load) = loader::load(&self.strategy, self.files, budget)?;
            match frame {
                Some(frame) => {
                    let (times, selected) = measure(&self.strategy, frame)?;
                    let record = self.record(table, budget, load, times, &selected, sink)?;
                    log::info!(
                        "{name} {}: read {:.2}s, memory {} GB",
                        record.budget,
                        record.load.as_secs_f64(),
                        record.memory_gb
                    );
                }
                None => log::info!("{name} {budget}: no file fits, skipping"),
            }

            sink.report(BenchEvent::Progress {
                strategy: name.clone(),
                percent: ((done + 1) * 100 / total) as u8,
            });
        }

        sink.report(BenchEvent::Finished { strategy: name });
        Ok(())
    }
}
