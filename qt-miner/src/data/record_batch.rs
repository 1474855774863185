//! Materializing datasets from Arrow record batches.

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use tracing::instrument;

use super::dataset::{ColumnKind, ColumnSpec, Dataset, RawValue};
use crate::error::{QtError, Result};

fn column_spec(name: &str, data_type: &DataType) -> Result<ColumnSpec> {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float16
        | DataType::Float32
        | DataType::Float64 => Ok(ColumnSpec::numeric(name)),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            Ok(ColumnSpec::categorical(name))
        }
        other => Err(QtError::type_mismatch(
            format!("numeric or string column for '{name}'"),
            other.to_string(),
        )),
    }
}

impl Dataset {
    /// Builds a dataset from a record batch.
    ///
    /// Integer and floating point columns become numeric attributes, string
    /// columns become categorical ones and nulls become absent values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use arrow::array::{Float64Array, StringArray};
    /// use arrow::datatypes::{DataType, Field, Schema};
    /// use arrow::record_batch::RecordBatch;
    /// use qt_miner::data::{Dataset, DatasetView};
    ///
    /// let schema = Arc::new(Schema::new(vec![
    ///     Field::new("outlook", DataType::Utf8, false),
    ///     Field::new("temperature", DataType::Float64, true),
    /// ]));
    /// let batch = RecordBatch::try_new(
    ///     schema,
    ///     vec![
    ///         Arc::new(StringArray::from(vec!["sunny", "rain"])),
    ///         Arc::new(Float64Array::from(vec![Some(30.0), Some(12.0)])),
    ///     ],
    /// )?;
    /// let data = Dataset::from_record_batch(&batch)?;
    /// assert_eq!(data.record_count(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(skip(batch), fields(rows = batch.num_rows(), columns = batch.num_columns()))]
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());
        let mut cells: Vec<Vec<RawValue>> = Vec::with_capacity(batch.num_columns());

        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let spec = column_spec(field.name(), field.data_type())?;
            let values = if spec.kind == ColumnKind::Numeric {
                let floats = cast(array, &DataType::Float64)?;
                let floats = floats.as_primitive::<Float64Type>();
                (0..floats.len())
                    .map(|i| {
                        if floats.is_null(i) {
                            RawValue::Null
                        } else {
                            RawValue::Number(floats.value(i))
                        }
                    })
                    .collect()
            } else {
                let strings = cast(array, &DataType::Utf8)?;
                let strings = strings.as_string::<i32>();
                (0..strings.len())
                    .map(|i| {
                        if strings.is_null(i) {
                            RawValue::Null
                        } else {
                            RawValue::Text(strings.value(i).to_string())
                        }
                    })
                    .collect()
            };
            columns.push(spec);
            cells.push(values);
        }

        let rows = (0..batch.num_rows())
            .map(|r| cells.iter().map(|column| column[r].clone()).collect::<Vec<_>>());
        Dataset::builder(columns).rows(rows).build()
    }
}
