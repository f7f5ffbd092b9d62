use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::model::{
    MetricRecord, ResultsTable, AGGREGATION_HEADER, BUDGET_HEADER, FILTER_HEADER, LOAD_HEADER,
    MEMORY_HEADER, SORT_HEADER,
};
use crate::error::{BenchError, Result};

// ---------------------------------------------------------------------------
// Events sent to the display collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum BenchEvent {
    Started {
        strategy: String,
    },
    /// Full snapshot of the table; the display redraws it from scratch.
    Table(ResultsTable),
    Memory {
        strategy: String,
        budget: String,
        gb: f64,
    },
    /// 0–100, after each budget iteration.
    Progress {
        strategy: String,
        percent: u8,
    },
    /// Recoverable problem shown to the user, e.g. the eager memory guard.
    Notice {
        strategy: String,
        message: String,
    },
    Finished {
        strategy: String,
    },
    Failed {
        strategy: String,
        message: String,
    },
}

/// Receiver of benchmark events. Implementations render them somewhere.
pub trait ReportSink {
    fn report(&mut self, event: BenchEvent);
}

/// Collect events in memory.
impl ReportSink for Vec<BenchEvent> {
    fn report(&mut self, event: BenchEvent) {
        self.push(event);
    }
}

/// Forward events to another thread. A closed channel means nobody is
/// watching any more, so the event is dropped.
impl ReportSink for Sender<BenchEvent> {
    fn report(&mut self, event: BenchEvent) {
        if self.send(event).is_err() {
            log::debug!("Report channel closed, dropping event");
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// Sentence shown under each table row.
pub fn memory_note(strategy: &str, budget: &str, gb: f64) -> String {
    format!("The estimated memory used for {budget} {strategy} DataFrame is {gb} GB")
}

/// Table as an Arrow batch with the dashboard's column headers.
pub fn table_to_batch(table: &ResultsTable) -> Result<RecordBatch> {
    let rows = table.rows();
    let schema = Schema::new(vec![
        Field::new(BUDGET_HEADER, DataType::Utf8, false),
        Field::new(LOAD_HEADER, DataType::Float64, false),
        Field::new(AGGREGATION_HEADER, DataType::Float64, false),
        Field::new(FILTER_HEADER, DataType::Float64, false),
        Field::new(SORT_HEADER, DataType::Float64, false),
        Field::new(MEMORY_HEADER, DataType::Float64, false),
    ]);
    let floats = |f: fn(&crate::data::model::MetricRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(rows.iter().map(f)))
    };
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.budget.as_str()),
        )),
        floats(|r| r.load_secs),
        floats(|r| r.aggregation_secs),
        floats(|r| r.filter_secs),
        floats(|r| r.sort_secs),
        floats(|r| r.memory_gb),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Plain-text rendering of the whole table.
pub fn render_table(table: &ResultsTable) -> Result<String> {
    let batch = table_to_batch(table)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Write the table as CSV with the dashboard's headers.
pub fn export_csv(table: &ResultsTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush().map_err(BenchError::io(path))?;
    log::info!("Wrote {} row(s) to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal display
// ---------------------------------------------------------------------------

/// Prints every event to stdout, re-drawing the full table on each update.
#[derive(Debug, Default)]
pub struct TerminalSink {
    pub tables: Vec<ResultsTable>,
}

impl TerminalSink {
    fn store(&mut self, table: ResultsTable) {
        match self.tables.iter_mut().find(|t| t.strategy == table.strategy) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }
}

impl ReportSink for TerminalSink {
    fn report(&mut self, event: BenchEvent) {
        match event {
            BenchEvent::Started { strategy } => {
                println!("\nPerformance Metrics for Dataset Sizes For {strategy}:");
            }
            BenchEvent::Table(table) => {
                match render_table(&table) {
                    Ok(text) => println!("{text}"),
                    Err(e) => log::error!("Failed to render {} table: {e}", table.strategy),
                }
                self.store(table);
            }
            BenchEvent::Memory {
                strategy,
                budget,
                gb,
            } => println!("{}", memory_note(&strategy, &budget, gb)),
            BenchEvent::Progress { strategy, percent } => {
                log::info!("{strategy}: {percent}% complete");
            }
            BenchEvent::Notice { strategy, message } => println!("[{strategy}] {message}"),
            BenchEvent::Finished { strategy } => log::info!("{strategy}: finished"),
            BenchEvent::Failed { strategy, message } => {
                eprintln!("[{strategy}] run failed: {message}");
            }
        }
    }
}

/// Last record in a table, if any.
pub fn latest(table: &ResultsTable) -> Option<&MetricRecord> {
    table.records.last()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::model::OperationTimes;

    fn record(budget: &str, memory_gb: f64) -> MetricRecord {
        MetricRecord {
            budget: budget.into(),
            load: Duration::from_millis(1500),
            times: OperationTimes {
                aggregation: Duration::from_millis(120),
                filter: Duration::from_millis(30),
                sort: Duration::from_millis(250),
            },
            memory_gb,
        }
    }

    fn table() -> ResultsTable {
        let mut table = ResultsTable::new("Polars");
        table.push(record("1 GB", 0.3));
        table.push(record("2 GB", 0.6));
        table
    }

    #[test]
    fn batch_keeps_insertion_order_and_headers() {
        let batch = table_to_batch(&table()).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).name(), BUDGET_HEADER);
        assert_eq!(batch.schema().field(5).name(), MEMORY_HEADER);
        let budgets = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(budgets.value(0), "1 GB");
        assert_eq!(budgets.value(1), "2 GB");
    }

    #[test]
    fn rendered_table_mentions_every_budget() {
        let text = render_table(&table()).unwrap();
        assert!(text.contains("Group By & Aggregation Time (s)"));
        assert!(text.contains("1 GB"));
        assert!(text.contains("2 GB"));
        assert!(text.contains("0.12"));
    }

    #[test]
    fn memory_note_wording() {
        assert_eq!(
            memory_note("Polars", "1 GB", 0.3),
            "The estimated memory used for 1 GB Polars DataFrame is 0.3 GB"
        );
    }

    #[test]
    fn export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polars.csv");
        export_csv(&table(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Data Size (GB),Reading Time(s),Group By & Aggregation Time (s),Search Time (s),Sorting Time (s),Estimated Memory (GB)"
        );
        assert!(lines.next().unwrap().starts_with("1 GB,1.5,0.12,0.03,0.25,0.3"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn terminal_sink_replaces_tables_per_strategy() {
        let mut sink = TerminalSink::default();
        let mut first = ResultsTable::new("Polars");
        first.push(record("1 GB", 0.3));
        sink.report(BenchEvent::Table(first));
        sink.report(BenchEvent::Table(table()));
        assert_eq!(sink.tables.len(), 1);
        assert_eq!(sink.tables[0].len(), 2);
        assert_eq!(latest(&sink.tables[0]).unwrap().budget, "2 GB");
    }
}
