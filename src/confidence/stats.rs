//! Grouped statistics
//!
//! Samples are grouped twice over the same measurement set: pooled per step
//! for the confidence interval, and per `(step, repeat)` for the quality
//! check. [`GroupIndex`] builds both groupings in one pass.

use crate::measurement::{MeasurementRecord, MeasurementSet};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Samples grouped by step and by `(step, repeat)`
///
/// Both maps are ordered, so iteration is deterministic.
#[derive(Debug, Default, Clone)]
pub struct GroupIndex {
    by_step: BTreeMap<String, Vec<f64>>,
    by_repeat: BTreeMap<String, BTreeMap<String, Vec<f64>>>,
}

impl GroupIndex {
    /// Index every sample of a measurement set
    ///
    /// # Errors
    /// Returns error if a batch does not match the measurement schema
    pub fn build(set: &MeasurementSet) -> Result<Self> {
        let mut index = Self::default();
        set.for_each_sample(|step, repeat, time| index.insert(step, repeat, time))?;
        Ok(index)
    }

    /// Index in-memory records
    #[must_use]
    pub fn from_records(records: &[MeasurementRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            index.insert(&record.step, &record.repeat, record.response_time);
        }
        index
    }

    fn insert(&mut self, step: &str, repeat: &str, time: f64) {
        self.by_step.entry(step.to_string()).or_default().push(time);
        self.by_repeat
            .entry(step.to_string())
            .or_default()
            .entry(repeat.to_string())
            .or_default()
            .push(time);
    }

    /// Pooled samples per step (repeats merged)
    #[must_use]
    pub const fn by_step(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.by_step
    }

    /// Samples per repeat, nested under their step
    #[must_use]
    pub const fn by_repeat(&self) -> &BTreeMap<String, BTreeMap<String, Vec<f64>>> {
        &self.by_repeat
    }

    /// Number of distinct steps
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.by_step.len()
    }
}

/// Confidence interval summary of one step's pooled samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStatistics {
    /// Pooled sample count
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Standard error of the mean (n-1 sample standard deviation / sqrt(n))
    pub sem: f64,
    /// `mean - multiplier * sem`
    pub ci_low: f64,
    /// `mean + multiplier * sem`
    pub ci_high: f64,
    /// `ci_high - ci_low`
    pub ci_width: f64,
}

impl StepStatistics {
    /// Summarize a step's pooled samples
    ///
    /// # Errors
    /// Returns `Error::InsufficientSamples` below two samples
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(step: &str, samples: &[f64], multiplier: f64) -> Result<Self> {
        let count = samples.len();
        if count < 2 {
            return Err(Error::InsufficientSamples {
                step: step.to_string(),
                count,
            });
        }

        let n = count as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let sem = variance.sqrt() / n.sqrt();

        let ci_high = mean + multiplier * sem;
        let ci_low = mean - multiplier * sem;

        Ok(Self {
            count,
            mean,
            sem,
            ci_low,
            ci_high,
            ci_width: ci_high - ci_low,
        })
    }
}

/// Arithmetic mean, `None` for an empty slice
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Compute per-step confidence intervals over pooled repeats.
///
/// # Errors
/// Returns `Error::InsufficientSamples` for the first step (in sorted order)
/// with fewer than two pooled samples
pub fn compute_step_statistics(
    index: &GroupIndex,
    multiplier: f64,
) -> Result<BTreeMap<String, StepStatistics>> {
    index
        .by_step()
        .iter()
        .map(|(step, samples)| {
            StepStatistics::from_samples(step, samples, multiplier).map(|s| (step.clone(), s))
        })
        .collect()
}
