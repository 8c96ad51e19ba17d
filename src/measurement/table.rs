//! Leaf table reader (Arrow CSV)
//!
//! Each `summary_out.csv` is read with its schema inferred from the header
//! row. Only the response-time column survives; it is cast to `Float64`
//! whatever type inference picked, then tagged with its step and repeat.
//! The cast accepts `NaN` and `inf`, so samples are also checked to be
//! finite and non-negative.

use super::record_schema;
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, RecordBatch, StringArray};
use arrow::compute;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Float64Type};
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

/// Read one repeat's leaf table as a `(step, repeat, response_time)` batch.
///
/// A table with a header and no rows yields an empty batch.
///
/// # Errors
/// - `Error::MissingFile` if `path` is not a file
/// - `Error::MalformedTable` if the CSV cannot be parsed, lacks `column`,
///   or holds empty, non-numeric, non-finite, or negative response times
pub fn read_repeat_table(path: &Path, step: &str, repeat: &str, column: &str) -> Result<RecordBatch> {
    if !path.is_file() {
        return Err(Error::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let malformed = |reason: String| Error::MalformedTable {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = File::open(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)
        .map_err(|e| malformed(format!("failed to infer schema: {e}")))?;

    if schema.field_with_name(column).is_err() {
        return Err(malformed(format!("missing column '{column}'")));
    }

    file.rewind()?;
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .build(file)
        .map_err(|e| malformed(format!("failed to create CSV reader: {e}")))?;

    let mut parts: Vec<ArrayRef> = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| malformed(format!("failed to read record batch: {e}")))?;
        let values = batch
            .column_by_name(column)
            .ok_or_else(|| malformed(format!("missing column '{column}'")))?;

        // Safe cast: unparsable strings come back as nulls
        let values = compute::cast(values, &DataType::Float64)
            .map_err(|e| malformed(format!("column '{column}' is not numeric: {e}")))?;
        if values.null_count() > 0 {
            return Err(malformed(format!(
                "column '{column}' has {} empty or non-numeric values",
                values.null_count()
            )));
        }
        let invalid = values
            .as_primitive::<Float64Type>()
            .values()
            .iter()
            .filter(|t| !t.is_finite() || **t < 0.0)
            .count();
        if invalid > 0 {
            return Err(malformed(format!(
                "column '{column}' has {invalid} non-finite or negative values"
            )));
        }
        parts.push(values);
    }

    let response_time: ArrayRef = if parts.is_empty() {
        Arc::new(Float64Array::from(Vec::<f64>::new()))
    } else {
        let refs: Vec<&dyn Array> = parts.iter().map(AsRef::as_ref).collect();
        compute::concat(&refs)?
    };

    let rows = response_time.len();
    let steps = StringArray::from_iter_values(std::iter::repeat(step).take(rows));
    let repeats = StringArray::from_iter_values(std::iter::repeat(repeat).take(rows));

    Ok(RecordBatch::try_new(
        record_schema(),
        vec![Arc::new(steps), Arc::new(repeats), response_time],
    )?)
}
