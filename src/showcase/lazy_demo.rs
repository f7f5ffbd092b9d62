use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, StringArray};
use arrow::compute::kernels::cmp::gt;
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use polars::prelude::{col, lit, LazyCsvReader, LazyFileListReader, SortMultipleOptions};

use super::table::TableView;
use crate::config::{BenchColumns, BenchConfig, LazyDemoConfig};
use crate::data::model::{round_to, FileDescriptor, BYTES_PER_GB};
use crate::engine::{ArrowEager, Workload};
use crate::error::{BenchError, Result};

/// Output of one library on the lazy-execution page.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOutcome {
    /// In-memory size of the full file as that library reports it.
    pub size_gb: f64,
    pub table: TableView,
}

/// Both sides of the page. Errors are kept as display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub lazy: std::result::Result<DemoOutcome, String>,
    pub eager: std::result::Result<DemoOutcome, String>,
}

/// Run both pipelines. Only the eager one is expected to run out of memory.
pub fn run_demo(config: &BenchConfig) -> DemoReport {
    let lazy = run_lazy(&config.lazy_demo).map_err(|e| {
        log::error!("Lazy demo failed: {e}");
        e.to_string()
    });
    let eager = run_eager(
        &config.lazy_demo,
        config.eager_batch_rows,
        config.eager_memory_limit_bytes(),
    )
    .map_err(|e| match e {
        BenchError::MemoryExhausted { .. } => {
            log::warn!("Eager demo hit the memory ceiling: {e}");
            format!("Arrow workflow failed due to memory error: {e}")
        }
        other => {
            log::error!("Eager demo failed: {other}");
            other.to_string()
        }
    });
    DemoReport { lazy, eager }
}

/// filter(close > t) → group_by(company) → sum(volume), mean(close) → sort.
pub fn run_lazy(demo: &LazyDemoConfig) -> Result<DemoOutcome> {
    let frame = LazyCsvReader::new(&demo.file)
        .with_has_header(true)
        .finish()?;
    let size_gb = frame.clone().collect()?.estimated_size() as f64 / BYTES_PER_GB;

    let group = demo.group_column.as_str();
    let result = frame
        .filter(col(demo.close_column.as_str()).gt(lit(demo.close_threshold)))
        .group_by([col(group)])
        .agg([
            col(demo.volume_column.as_str()).sum().alias("total_volume"),
            col(demo.close_column.as_str()).mean().alias("average_close"),
        ])
        .sort([group], SortMultipleOptions::default())
        .collect()?;

    Ok(DemoOutcome {
        size_gb,
        table: TableView::from_polars(&result)?,
    })
}

/// Same pipeline step by step on a fully materialized Arrow batch.
pub fn run_eager(
    demo: &LazyDemoConfig,
    batch_rows: usize,
    memory_limit: usize,
) -> Result<DemoOutcome> {
    let columns = BenchColumns {
        label: "source".into(),
        measure: demo.volume_column.clone(),
        key: demo.group_column.clone(),
        numeric: vec![demo.volume_column.clone(), demo.close_column.clone()],
    };
    let workload = Workload {
        columns,
        threshold: demo.close_threshold,
    };
    let strategy = ArrowEager::new(workload, batch_rows, memory_limit);
    let file = FileDescriptor::from_path(&demo.file)?;
    let batch = match strategy.read_all(std::slice::from_ref(&file))? {
        Some(batch) => batch,
        None => return Err(BenchError::ColumnNotFound(demo.group_column.clone())),
    };
    let size_gb = round_to(batch.get_array_memory_size() as f64 / 1_000_000_000.0, 1);

    let close = float_column(&batch, &demo.close_column)?;
    let mask = gt(&close, &Float64Array::new_scalar(demo.close_threshold))?;
    let filtered = filter_record_batch(&batch, &mask)?;

    let grouped = group_sum_mean(&filtered, demo)?;
    Ok(DemoOutcome {
        size_gb,
        table: TableView::from_arrow(&grouped)?,
    })
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| BenchError::ColumnNotFound(name.to_string()))?;
    Ok(cast(array, &DataType::Float64)?)
}

/// Group, aggregate and sort by group name.
fn group_sum_mean(batch: &RecordBatch, demo: &LazyDemoConfig) -> Result<RecordBatch> {
    let groups = batch
        .column_by_name(&demo.group_column)
        .ok_or_else(|| BenchError::ColumnNotFound(demo.group_column.clone()))?;
    let groups = cast(groups, &DataType::Utf8)?;
    let groups = groups.as_string::<i32>();
    let volume = float_column(batch, &demo.volume_column)?;
    let volume = volume.as_primitive::<Float64Type>();
    let close = float_column(batch, &demo.close_column)?;
    let close = close.as_primitive::<Float64Type>();

    // name → (volume sum, close sum, close count)
    let mut acc: HashMap<&str, (f64, f64, usize)> = HashMap::new();
    for row in 0..batch.num_rows() {
        if groups.is_null(row) {
            continue;
        }
        let entry = acc.entry(groups.value(row)).or_insert((0.0, 0.0, 0));
        if volume.is_valid(row) {
            entry.0 += volume.value(row);
        }
        if close.is_valid(row) {
            entry.1 += close.value(row);
            entry.2 += 1;
        }
    }

    let mut rows: Vec<(&str, f64, Option<f64>)> = acc
        .into_iter()
        .map(|(name, (volume, close, n))| (name, volume, (n > 0).then(|| close / n as f64)))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    Ok(RecordBatch::try_from_iter([
        (
            demo.group_column.as_str(),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.0))) as ArrayRef,
        ),
        (
            "total_volume",
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.1))) as ArrayRef,
        ),
        (
            "average_close",
            Arc::new(rows.iter().map(|r| r.2).collect::<Float64Array>()) as ArrayRef,
        ),
    ])?)
}
