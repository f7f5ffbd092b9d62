use std::collections::HashMap;
use std::fs::File;
use std::io::Seek;
use std::sync::Arc;

use arrow::array::{
    new_null_array, Array, ArrayRef, AsArray, Float64Array, StringArray, UInt32Array,
};
use arrow::compute::kernels::cmp::gt;
use arrow::compute::{
    cast, concat_batches, filter_record_batch, lexsort_to_indices, take_record_batch,
    SortColumn, SortOptions,
};
use arrow::csv::reader::Format;
use arrow::csv::{Reader, ReaderBuilder};
use arrow::datatypes::{DataType, Field, FieldRef, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use super::{ExecutionMode, ExecutionStrategy, Operation, Workload, TOTAL_COLUMN};
use crate::config::BenchConfig;
use crate::data::model::{round_to, FileDescriptor};
use crate::error::{BenchError, Result};

// ---------------------------------------------------------------------------
// Arrow eager strategy
// ---------------------------------------------------------------------------

/// Arrow `RecordBatch` pipeline. Every file is read fully into memory and
/// every kernel call materializes its result immediately.
#[derive(Debug, Clone)]
pub struct ArrowEager {
    workload: Workload,
    batch_rows: usize,
    memory_limit: usize,
}

impl Default for ArrowEager {
    fn default() -> Self {
        Self::from_config(&BenchConfig::default())
    }
}

impl ArrowEager {
    pub fn new(workload: Workload, batch_rows: usize, memory_limit: usize) -> Self {
        Self {
            workload,
            batch_rows: batch_rows.max(1),
            memory_limit,
        }
    }

    pub fn from_config(config: &BenchConfig) -> Self {
        Self::new(
            Workload::from_config(config),
            config.eager_batch_rows,
            config.eager_memory_limit_bytes(),
        )
    }

    /// Open a CSV reader with every column typed as text. Only the header is
    /// inspected, so a late odd value in any column cannot fail the read;
    /// numeric columns are converted afterwards and odd values become nulls.
    fn open_csv(&self, path: &std::path::Path) -> Result<Reader<File>> {
        let mut handle = File::open(path).map_err(BenchError::io(path))?;
        let (header, _) = Format::default()
            .with_header(true)
            .infer_schema(&mut handle, Some(1))?;
        handle.rewind().map_err(BenchError::io(path))?;

        let fields: Vec<Field> = header
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect();

        Ok(ReaderBuilder::new(Arc::new(Schema::new(fields)))
            .with_header(true)
            .with_batch_size(self.batch_rows)
            .build(handle)?)
    }

    /// Cast the numeric columns to `Float64` and append the label column.
    fn normalize(&self, batch: &RecordBatch, label: &str) -> Result<RecordBatch> {
        let columns = &self.workload.columns;
        let schema = batch.schema();
        let mut fields: Vec<FieldRef> = Vec::with_capacity(schema.fields().len() + 1);
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len() + 1);

        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            if columns.numeric.contains(field.name()) {
                arrays.push(cast(array, &DataType::Float64)?);
                fields.push(Arc::new(Field::new(field.name(), DataType::Float64, true)));
            } else {
                arrays.push(array.clone());
                fields.push(field.clone());
            }
        }

        let labels = StringArray::from_iter_values(std::iter::repeat(label).take(batch.num_rows()));
        fields.push(Arc::new(Field::new(&columns.label, DataType::Utf8, true)));
        arrays.push(Arc::new(labels));

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }

    /// Read every file into one batch, enforcing the memory ceiling.
    pub fn read_all(&self, files: &[FileDescriptor]) -> Result<Option<RecordBatch>> {
        let mut canonical: Option<SchemaRef> = None;
        let mut batches = Vec::new();
        let mut in_memory = 0usize;

        for file in files {
            let reader = self.open_csv(&file.path)?;
            for batch in reader {
                let batch = self.normalize(&batch?, &file.label)?;
                let batch = match canonical.clone() {
                    Some(schema) => conform(&batch, &schema)?,
                    None => {
                        canonical = Some(batch.schema());
                        batch
                    }
                };

                in_memory += batch.get_array_memory_size();
                if in_memory > self.memory_limit {
                    log::warn!(
                        "Eager read of {} passed the memory ceiling ({in_memory} > {} bytes)",
                        file.path.display(),
                        self.memory_limit
                    );
                    return Err(BenchError::MemoryExhausted {
                        needed: in_memory,
                        limit: self.memory_limit,
                    });
                }
                batches.push(batch);
            }
        }

        match canonical {
            Some(schema) => Ok(Some(concat_batches(&schema, &batches)?)),
            None if files.is_empty() => Ok(None),
            // Only header rows: keep the shape of the first file.
            None => {
                let reader = self.open_csv(&files[0].path)?;
                let empty = RecordBatch::new_empty(reader.schema());
                Ok(Some(self.normalize(&empty, &files[0].label)?))
            }
        }
    }

    fn measure_values(&self, frame: &RecordBatch) -> Result<ArrayRef> {
        let values = column(frame, &self.workload.columns.measure)?;
        Ok(cast(values, &DataType::Float64)?)
    }

    fn key_values(&self, frame: &RecordBatch) -> Result<ArrayRef> {
        let keys = column(frame, &self.workload.columns.key)?;
        Ok(cast(keys, &DataType::Utf8)?)
    }

    /// Hash aggregation; groups come out in first-seen order. Null keys
    /// form one group of their own.
    fn aggregate(&self, frame: &RecordBatch) -> Result<RecordBatch> {
        let keys = self.key_values(frame)?;
        let keys = keys.as_string::<i32>();
        let measure = self.measure_values(frame)?;
        let measure = measure.as_primitive::<Float64Type>();

        let mut slots: HashMap<Option<&str>, usize> = HashMap::new();
        let mut groups: Vec<Option<&str>> = Vec::new();
        let mut totals: Vec<f64> = Vec::new();
        for row in 0..frame.num_rows() {
            let key = keys.is_valid(row).then(|| keys.value(row));
            let slot = *slots.entry(key).or_insert_with(|| {
                groups.push(key);
                totals.push(0.0);
                groups.len() - 1
            });
            if measure.is_valid(row) {
                totals[slot] += measure.value(row);
            }
        }

        let schema = Schema::new(vec![
            Field::new(&self.workload.columns.key, DataType::Utf8, true),
            Field::new(TOTAL_COLUMN, DataType::Float64, true),
        ]);
        Ok(RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(groups)),
                Arc::new(Float64Array::from(totals)),
            ],
        )?)
    }

    fn filter(&self, frame: &RecordBatch) -> Result<RecordBatch> {
        let measure = self.measure_values(frame)?;
        let mask = gt(&measure, &Float64Array::new_scalar(self.workload.threshold))?;
        Ok(filter_record_batch(frame, &mask)?)
    }

    /// Row position is the secondary sort key, which makes the sort stable.
    /// Null keys go first, as in Polars.
    fn sort(&self, frame: &RecordBatch) -> Result<RecordBatch> {
        let keys = column(frame, &self.workload.columns.key)?.clone();
        let positions: ArrayRef = Arc::new(UInt32Array::from_iter_values(
            0..frame.num_rows() as u32,
        ));
        let indices = lexsort_to_indices(
            &[
                SortColumn {
                    values: keys,
                    options: Some(SortOptions {
                        descending: false,
                        nulls_first: true,
                    }),
                },
                SortColumn {
                    values: positions,
                    options: None,
                },
            ],
            None,
        )?;
        Ok(take_record_batch(frame, &indices)?)
    }
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| BenchError::ColumnNotFound(name.to_string()))
}

/// Line `batch` up with `schema`: reorder by name, cast differing types,
/// fill absent columns with nulls and drop extras.
fn conform(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    if batch.schema() == *schema {
        return Ok(batch.clone());
    }
    let arrays = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            match batch.column_by_name(field.name()) {
                Some(array) if array.data_type() == field.data_type() => Ok(array.clone()),
                Some(array) => Ok(cast(array, field.data_type())?),
                None => Ok(new_null_array(field.data_type(), batch.num_rows())),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RecordBatch::try_new(schema.clone(), arrays)?)
}

impl ExecutionStrategy for ArrowEager {
    type Frame = RecordBatch;
    type Output = RecordBatch;

    fn name(&self) -> &str {
        "Arrow"
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Eager
    }

    fn read(&self, files: &[FileDescriptor]) -> Result<Option<RecordBatch>> {
        self.read_all(files)
    }

    fn select(&self, frame: RecordBatch) -> Result<RecordBatch> {
        let schema = frame.schema();
        let indices = self
            .workload
            .columns
            .selection()
            .iter()
            .map(|name| {
                schema
                    .index_of(name)
                    .map_err(|_| BenchError::ColumnNotFound(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(frame.project(&indices)?)
    }

    fn execute(&self, frame: &RecordBatch, op: Operation) -> Result<RecordBatch> {
        match op {
            Operation::Aggregate => self.aggregate(frame),
            Operation::Filter => self.filter(frame),
            Operation::Sort => self.sort(frame),
        }
    }

    /// Buffer bytes reported by Arrow, divided by 10⁹.
    fn estimate_memory_gb(&self, frame: &RecordBatch) -> Result<f64> {
        Ok(round_to(frame.get_array_memory_size() as f64 / 1_000_000_000.0, 1))
    }
}
