use std::fmt::Display;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::record_batch::RecordBatch;
use polars::prelude::{DataType, NamedFrom, Series};

use crate::error::Result;

/// One faulty call made against both libraries, with the error each returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorExample {
    pub title: &'static str,
    pub polars_code: &'static str,
    pub polars_error: String,
    pub arrow_code: &'static str,
    pub arrow_error: String,
}

fn message<T, E: Display>(result: std::result::Result<T, E>) -> String {
    match result {
        Ok(_) => "(no error)".to_string(),
        Err(e) => e.to_string(),
    }
}

fn int_column(values: Vec<i64>) -> ArrayRef {
    Arc::new(Int64Array::from(values))
}

/// Run every example. Only building the valid inputs can fail.
pub fn collect_examples() -> Result<Vec<ErrorExample>> {
    Ok(vec![missing_column()?, type_mismatch(), shape_mismatch()?])
}

pub fn missing_column() -> Result<ErrorExample> {
    let df = polars::df!("A" => [1i64, 2, 3])?;
    let batch = RecordBatch::try_from_iter([("A", int_column(vec![1, 2, 3]))])?;

    Ok(ErrorExample {
        title: "Missing column",
        polars_code: r#"let df = df!("A" => [1, 2, 3])?;
df.column("B")?; // column that does not exist"#,
        polars_error: message(df.column("B")),
        arrow_code: r#"let batch = RecordBatch::try_from_iter([("A", a)])?;
batch.schema().index_of("B")?; // column that does not exist"#,
        arrow_error: message(batch.schema().index_of("B")),
    })
}

pub fn type_mismatch() -> ErrorExample {
    let series = Series::new("A".into(), ["1", "2", "three"]);
    let strings = StringArray::from(vec!["1", "2", "three"]);
    let strict = CastOptions {
        safe: false,
        ..Default::default()
    };

    ErrorExample {
        title: "Operation mismatch",
        polars_code: r#"let s = Series::new("A".into(), ["1", "2", "three"]);
s.strict_cast(&DataType::Int64)?; // non-numeric text"#,
        polars_error: message(series.strict_cast(&DataType::Int64)),
        arrow_code: r#"let a = StringArray::from(vec!["1", "2", "three"]);
cast_with_options(&a, &DataType::Int64, &strict)?; // non-numeric text"#,
        arrow_error: message(cast_with_options(
            &strings,
            &arrow::datatypes::DataType::Int64,
            &strict,
        )),
    }
}

pub fn shape_mismatch() -> Result<ErrorExample> {
    let mut df = polars::df!("A" => [1i64, 2], "B" => [3i64, 4])?;
    let polars_error = message(df.with_column(Series::new("C".into(), [5i64, 6, 7])));
    let arrow_error = message(RecordBatch::try_from_iter([
        ("A", int_column(vec![1, 2])),
        ("C", int_column(vec![5, 6, 7])),
    ]));

    Ok(ErrorExample {
        title: "Shape mismatch",
        polars_code: r#"let mut df = df!("A" => [1, 2], "B" => [3, 4])?;
df.with_column(Series::new("C".into(), [5, 6, 7]))?; // length 3 vs 2"#,
        polars_error,
        arrow_code: r#"RecordBatch::try_from_iter([
    ("A", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
    ("C", Arc::new(Int64Array::from(vec![5, 6, 7])) as ArrayRef),
])?; // length 3 vs 2"#,
        arrow_error,
    })
}
