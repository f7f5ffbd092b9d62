use polars::prelude::*;

use super::{ExecutionMode, ExecutionStrategy, Operation, Workload, TOTAL_COLUMN};
use crate::data::model::{round_to, FileDescriptor};
use crate::error::{BenchError, Result};

// ---------------------------------------------------------------------------
// Polars lazy strategy
// ---------------------------------------------------------------------------

/// Polars `LazyFrame` pipeline. Reading only builds scan plans; every
/// operation is a plan forced with `collect()`.
#[derive(Debug, Clone, Default)]
pub struct PolarsLazy {
    workload: Workload,
}

impl PolarsLazy {
    pub fn new(workload: Workload) -> Self {
        Self { workload }
    }

    /// Scan one CSV, cast the numeric columns it has and append the label.
    fn scan(&self, file: &FileDescriptor) -> Result<LazyFrame> {
        let mut frame = LazyCsvReader::new(&file.path)
            .with_has_header(true)
            .finish()?;
        let schema = frame.collect_schema()?;

        let mut exprs: Vec<Expr> = self
            .workload
            .columns
            .numeric
            .iter()
            .filter(|name| schema.get(name.as_str()).is_some())
            .map(|name| col(name.as_str()).cast(DataType::Float64))
            .collect();
        exprs.push(lit(file.label.as_str()).alias(self.workload.columns.label.as_str()));

        Ok(frame.with_columns(exprs))
    }

    /// Build the deferred plan for `op` without running it.
    pub fn plan(&self, frame: &LazyFrame, op: Operation) -> LazyFrame {
        let columns = &self.workload.columns;
        let key = columns.key.as_str();
        let measure = columns.measure.as_str();
        match op {
            Operation::Aggregate => frame
                .clone()
                .group_by([col(key)])
                .agg([col(measure).sum().alias(TOTAL_COLUMN)]),
            Operation::Filter => frame
                .clone()
                .filter(col(measure).gt(lit(self.workload.threshold))),
            Operation::Sort => frame.clone().sort(
                [key],
                SortMultipleOptions::default().with_maintain_order(true),
            ),
        }
    }

    /// Materialize a plan.
    pub fn force(plan: LazyFrame) -> Result<DataFrame> {
        Ok(plan.collect()?)
    }
}

impl ExecutionStrategy for PolarsLazy {
    type Frame = LazyFrame;
    type Output = DataFrame;

    fn name(&self) -> &str {
        "Polars"
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Deferred
    }

    fn read(&self, files: &[FileDescriptor]) -> Result<Option<LazyFrame>> {
        if files.is_empty() {
            return Ok(None);
        }
        let frames = files
            .iter()
            .map(|file| self.scan(file))
            .collect::<Result<Vec<_>>>()?;
        let args = UnionArgs {
            to_supertypes: true,
            ..Default::default()
        };
        Ok(Some(concat(frames, args)?))
    }

    fn select(&self, mut frame: LazyFrame) -> Result<LazyFrame> {
        let schema = frame.collect_schema()?;
        let wanted = self.workload.columns.selection();
        for name in wanted {
            if schema.get(name).is_none() {
                return Err(BenchError::ColumnNotFound(name.to_string()));
            }
        }
        Ok(frame.select(wanted.map(col)))
    }

    fn execute(&self, frame: &LazyFrame, op: Operation) -> Result<DataFrame> {
        Self::force(self.plan(frame, op))
    }

    /// `estimated_size` in MB (1024² bytes) divided by 1000.
    fn estimate_memory_gb(&self, frame: &LazyFrame) -> Result<f64> {
        let materialized = frame.clone().collect()?;
        let mb = materialized.estimated_size() as f64 / (1024.0 * 1024.0);
        Ok(round_to(mb / 1000.0, 1))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write_csv(dir: &Path, name: &str, body: &str) -> FileDescriptor {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        FileDescriptor::from_path(&path).unwrap()
    }

    fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    fn str_values(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_no_null_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn read_tags_rows_and_casts_volume() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "A.csv", "date,open,volume\nD1,1,10\nD2,2,20\n");
        let b = write_csv(dir.path(), "B.csv", "date,open,volume\nD3,3.5,30\n");
        let strategy = PolarsLazy::default();

        let frame = strategy.read(&[a, b]).unwrap().unwrap();
        let df = strategy.select(frame).unwrap().collect().unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["Stock_Name", "volume", "date"]);
        assert_eq!(str_values(&df, "Stock_Name"), ["A", "A", "B"]);
        assert_eq!(str_values(&df, "date"), ["D1", "D2", "D3"]);
        assert_eq!(f64_values(&df, "volume"), [10.0, 20.0, 30.0]);
    }

    #[test]
    fn read_of_nothing_is_none() {
        assert!(PolarsLazy::default().read(&[]).unwrap().is_none());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "A.csv", "day,volume\nD1,10\n");
        let strategy = PolarsLazy::default();
        let frame = strategy.read(&[a]).unwrap().unwrap();

        match strategy.select(frame) {
            Err(BenchError::ColumnNotFound(name)) => assert_eq!(name, "date"),
            Err(other) => panic!("expected ColumnNotFound, got {other}"),
            Ok(_) => panic!("expected ColumnNotFound"),
        }
    }

    #[test]
    fn operations_match_expected_results() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(
            dir.path(),
            "A.csv",
            "date,open,volume\nD3,1,500\nD1,1,1500\nD2,1,2000\nD1,1,20\n",
        );
        let strategy = PolarsLazy::default();
        let frame = strategy.select(strategy.read(&[a]).unwrap().unwrap()).unwrap();

        let filtered = strategy.execute(&frame, Operation::Filter).unwrap();
        assert_eq!(f64_values(&filtered, "volume"), [1500.0, 2000.0]);

        let sorted = strategy.execute(&frame, Operation::Sort).unwrap();
        assert_eq!(str_values(&sorted, "date"), ["D1", "D1", "D2", "D3"]);
        // Ties keep their input order.
        assert_eq!(f64_values(&sorted, "volume")[..2], [1500.0, 20.0]);

        let grouped = strategy
            .execute(&frame, Operation::Aggregate)
            .unwrap()
            .sort(["date"], SortMultipleOptions::default())
            .unwrap();
        assert_eq!(str_values(&grouped, "date"), ["D1", "D2", "D3"]);
        assert_eq!(f64_values(&grouped, TOTAL_COLUMN), [1520.0, 2000.0, 500.0]);
    }

    #[test]
    fn repeated_runs_give_identical_results() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "A.csv", "date,open,volume\nD2,1,5\nD1,1,2000\n");
        let strategy = PolarsLazy::default();
        let frame = strategy.select(strategy.read(&[a]).unwrap().unwrap()).unwrap();

        for op in Operation::ALL {
            let mut first = strategy.execute(&frame, op).unwrap();
            let mut second = strategy.execute(&frame, op).unwrap();
            // Group order out of group_by is not fixed.
            if op == Operation::Aggregate {
                first = first.sort(["date"], SortMultipleOptions::default()).unwrap();
                second = second.sort(["date"], SortMultipleOptions::default()).unwrap();
            }
            assert!(first.equals(&second), "{op} differed between runs");
        }
    }

    #[test]
    fn null_keys_form_a_group_and_sort_first() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(
            dir.path(),
            "A.csv",
            "date,open,volume\nD1,1,10\n,1,20\nD1,1,5\n",
        );
        let strategy = PolarsLazy::default();
        let frame = strategy.select(strategy.read(&[a]).unwrap().unwrap()).unwrap();

        let grouped = strategy
            .execute(&frame, Operation::Aggregate)
            .unwrap()
            .sort(["date"], SortMultipleOptions::default())
            .unwrap();
        assert_eq!(grouped.height(), 2);
        assert_eq!(grouped.column("date").unwrap().null_count(), 1);
        assert_eq!(f64_values(&grouped, TOTAL_COLUMN), [20.0, 15.0]);

        let sorted = strategy.execute(&frame, Operation::Sort).unwrap();
        let nulls = sorted.column("date").unwrap().is_null();
        assert_eq!(nulls.get(0), Some(true));
        assert_eq!(f64_values(&sorted, "volume"), [20.0, 10.0, 5.0]);
    }

    #[test]
    fn late_values_in_unused_columns_are_never_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = String::from("date,open,close,volume\n");
        for i in 0..10_001 {
            body.push_str(&format!("D{i},1,{i},1500\n"));
        }
        body.push_str("DX,1,12.5,1500\n");
        let a = write_csv(dir.path(), "A.csv", &body);
        let strategy = PolarsLazy::default();
        let frame = strategy.select(strategy.read(&[a]).unwrap().unwrap()).unwrap();

        let df = frame.collect().unwrap();
        assert_eq!(df.height(), 10_002);
    }

    #[test]
    fn plan_does_not_run_until_forced() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "A.csv", "date,open,volume\nD1,1,1\n");
        let strategy = PolarsLazy::default();
        let frame = strategy.select(strategy.read(&[a]).unwrap().unwrap()).unwrap();

        let plan = strategy.plan(&frame, Operation::Sort);
        std::fs::remove_file(dir.path().join("A.csv")).unwrap();
        assert!(PolarsLazy::force(plan).is_err());
    }

    #[test]
    fn small_frames_round_to_zero_gb() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "A.csv", "date,open,volume\nD1,1,1\n");
        let strategy = PolarsLazy::default();
        let frame = strategy.select(strategy.read(&[a]).unwrap().unwrap()).unwrap();
        assert_eq!(strategy.estimate_memory_gb(&frame).unwrap(), 0.0);
    }
}
