//! Measurement storage (Arrow)
//!
//! Loads the repeated-trial samples of a benchmark into memory as Arrow
//! record batches, one batch per `(step, repeat)` leaf table. Every batch
//! shares the fixed schema returned by [`record_schema`].
//!
//! Batch-only: the whole benchmark is read up front, nothing is cached or
//! updated incrementally.

mod layout;
mod table;

pub use layout::{
    discover, MeasurementLayout, RepeatDir, RESPONSE_TIME_SOURCE_COLUMN, SUMMARY_FILE_NAME,
};
pub use table::read_repeat_table;

use crate::{Error, Result};
use arrow::array::{Array, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Step identifier column
pub const STEP_COLUMN: &str = "step";
/// Repeat identifier column
pub const REPEAT_COLUMN: &str = "repeat";
/// Response-time column (renamed from the source header)
pub const RESPONSE_TIME_COLUMN: &str = "response_time";

/// Schema shared by every measurement batch
#[must_use]
pub fn record_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(STEP_COLUMN, DataType::Utf8, false),
        Field::new(REPEAT_COLUMN, DataType::Utf8, false),
        Field::new(RESPONSE_TIME_COLUMN, DataType::Float64, false),
    ]))
}

/// One sampled request of one repeat of one step
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Step identifier
    pub step: String,
    /// Repeat identifier
    pub repeat: String,
    /// Latency sample
    pub response_time: f64,
}

impl MeasurementRecord {
    /// Create a record
    #[must_use]
    pub fn new(step: impl Into<String>, repeat: impl Into<String>, response_time: f64) -> Self {
        Self {
            step: step.into(),
            repeat: repeat.into(),
            response_time,
        }
    }
}

/// All measurement batches of one benchmark
#[derive(Debug, Default, Clone)]
pub struct MeasurementSet {
    batches: Vec<RecordBatch>,
}

impl MeasurementSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from in-memory records as a single batch
    ///
    /// # Errors
    /// Returns error if the batch cannot be assembled
    pub fn from_records(records: &[MeasurementRecord]) -> Result<Self> {
        let steps = StringArray::from_iter_values(records.iter().map(|r| r.step.as_str()));
        let repeats = StringArray::from_iter_values(records.iter().map(|r| r.repeat.as_str()));
        let times = Float64Array::from_iter_values(records.iter().map(|r| r.response_time));

        let batch = RecordBatch::try_new(
            record_schema(),
            vec![Arc::new(steps), Arc::new(repeats), Arc::new(times)],
        )?;

        let mut set = Self::new();
        set.append_batch(batch)?;
        Ok(set)
    }

    /// Append a batch
    ///
    /// # Errors
    /// Returns `Error::Arrow` if the batch schema is not [`record_schema`]
    pub fn append_batch(&mut self, batch: RecordBatch) -> Result<()> {
        if batch.schema() != record_schema() {
            return Err(Error::Arrow(ArrowError::SchemaError(format!(
                "Schema mismatch: expected {:?}, got {:?}",
                record_schema(),
                batch.schema()
            ))));
        }

        self.batches.push(batch);
        Ok(())
    }

    /// Get all record batches
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total number of samples
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// True when no samples are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Visit every sample as `(step, repeat, response_time)`
    ///
    /// # Errors
    /// Returns `Error::Arrow` if a batch does not hold the expected column types
    pub fn for_each_sample<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &str, f64),
    {
        for batch in &self.batches {
            let (steps, repeats, times) = typed_columns(batch)?;
            for row in 0..batch.num_rows() {
                f(steps.value(row), repeats.value(row), times.value(row));
            }
        }
        Ok(())
    }

    /// Materialize every sample as an owned record
    ///
    /// # Errors
    /// Returns `Error::Arrow` if a batch does not hold the expected column types
    pub fn records(&self) -> Result<Vec<MeasurementRecord>> {
        let mut records = Vec::with_capacity(self.num_rows());
        self.for_each_sample(|step, repeat, time| {
            records.push(MeasurementRecord::new(step, repeat, time));
        })?;
        Ok(records)
    }
}

fn typed_columns(batch: &RecordBatch) -> Result<(&StringArray, &StringArray, &Float64Array)> {
    let mismatch = || {
        Error::Arrow(ArrowError::SchemaError(
            "measurement batch does not match record schema".to_string(),
        ))
    };

    let steps = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(mismatch)?;
    let repeats = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(mismatch)?;
    let times = batch
        .column(2)
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(mismatch)?;

    Ok((steps, repeats, times))
}

/// Load every repeat's samples under a benchmark root.
///
/// Repeats are read in sorted `(step, repeat)` order.
///
/// # Errors
/// - `Error::Io` if the root or a step directory cannot be listed
/// - `Error::NoMeasurements` if there are no repeat directories or no rows
/// - `Error::MissingFile` if a repeat directory lacks its leaf table
/// - `Error::MalformedTable` if a leaf table lacks the response-time column
///   or holds an invalid sample
/// - `Error::InsufficientSamples` if every table of a step is empty
pub fn load_all_records<P: AsRef<Path>>(root: P, layout: &MeasurementLayout) -> Result<MeasurementSet> {
    let root = root.as_ref();
    let repeats = discover(root)?;
    if repeats.is_empty() {
        return Err(Error::NoMeasurements {
            root: root.to_path_buf(),
        });
    }

    let mut set = MeasurementSet::new();
    let mut step_rows: BTreeMap<&str, usize> = BTreeMap::new();
    for dir in &repeats {
        let path = dir.summary_path(layout);
        let batch = read_repeat_table(&path, &dir.step, &dir.repeat, &layout.response_time_column)?;
        debug!(step = %dir.step, repeat = %dir.repeat, rows = batch.num_rows(), "loaded repeat");
        *step_rows.entry(dir.step.as_str()).or_default() += batch.num_rows();
        set.append_batch(batch)?;
    }

    if set.is_empty() {
        return Err(Error::NoMeasurements {
            root: root.to_path_buf(),
        });
    }
    // A step made only of header-only tables would otherwise vanish silently
    if let Some((step, _)) = step_rows.iter().find(|&(_, &rows)| rows == 0) {
        return Err(Error::InsufficientSamples {
            step: (*step).to_string(),
            count: 0,
        });
    }

    info!(
        root = %root.display(),
        repeats = repeats.len(),
        samples = set.num_rows(),
        "loaded measurements"
    );
    Ok(set)
}
