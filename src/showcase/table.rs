use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use polars::prelude::{AnyValue, DataFrame};

use crate::error::Result;

/// Library-neutral, already formatted table for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_polars(df: &DataFrame) -> Result<Self> {
        let headers = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let row = df
                .get_columns()
                .iter()
                .map(|column| column.get(i).map(|v| cell(&v)))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Ok(Self { headers, rows })
    }

    pub fn from_arrow(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let headers = schema.fields().iter().map(|f| f.name().clone()).collect();

        let options = FormatOptions::default().with_null("null");
        let formatters = batch
            .columns()
            .iter()
            .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let rows = (0..batch.num_rows())
            .map(|i| formatters.iter().map(|f| f.value(i).to_string()).collect())
            .collect();
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Strings without the quotes Polars puts around them.
fn cell(value: &AnyValue) -> String {
    match value {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array, StringArray};

    use super::*;

    #[test]
    fn polars_frame_is_flattened_row_major() {
        let df = polars::df!("company" => ["ACC", "TCS"], "total" => [10i64, 20]).unwrap();
        let view = TableView::from_polars(&df).unwrap();
        assert_eq!(view.headers, ["company", "total"]);
        assert_eq!(view.rows, [["ACC", "10"], ["TCS", "20"]]);
    }

    #[test]
    fn arrow_batch_is_flattened_row_major() {
        let batch = RecordBatch::try_from_iter([
            ("company", Arc::new(StringArray::from(vec!["ACC", "TCS"])) as ArrayRef),
            ("total", Arc::new(Float64Array::from(vec![Some(1.5), None])) as ArrayRef),
        ])
        .unwrap();
        let view = TableView::from_arrow(&batch).unwrap();
        assert_eq!(view.headers, ["company", "total"]);
        assert_eq!(view.rows, [["ACC", "1.5"], ["TCS", "null"]]);
        assert_eq!(view.len(), 2);
    }
}
