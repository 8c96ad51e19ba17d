//! Statistical policy for the interval aggregator

use crate::measurement::MeasurementLayout;
use crate::{Error, Result};

/// Normal-approximation multiplier for a 95% confidence interval
pub const DEFAULT_MULTIPLIER: f64 = 1.96;

/// Largest interval width tolerated, as a fraction of a repeat's mean
pub const DEFAULT_MAX_RELATIVE_WIDTH: f64 = 0.05;

/// Per-step artifact written next to the repeat directories
pub const CONFIDENCE_FILE_NAME: &str = "confidence.yml";

/// Default parent of all benchmark roots
pub const MEASUREMENTS_DIR: &str = "measurements";

/// Constants that drive the aggregation, collected in one place
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidencePolicy {
    /// Interval half-width in standard errors
    pub multiplier: f64,
    /// Quality gate: flag a repeat when `width > max_relative_width * mean`
    pub max_relative_width: f64,
    /// On-disk input layout
    pub layout: MeasurementLayout,
    /// Artifact name inside each step directory
    pub output_file: String,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            max_relative_width: DEFAULT_MAX_RELATIVE_WIDTH,
            layout: MeasurementLayout::default(),
            output_file: CONFIDENCE_FILE_NAME.to_string(),
        }
    }
}

impl ConfidencePolicy {
    /// Create a policy builder starting from the defaults
    #[must_use]
    pub fn builder() -> ConfidencePolicyBuilder {
        ConfidencePolicyBuilder::default()
    }

    /// Reject multipliers and thresholds that would make the run meaningless
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` for a non-positive or non-finite value
    pub fn validate(&self) -> Result<()> {
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "multiplier must be positive, got {}",
                self.multiplier
            )));
        }
        if !(self.max_relative_width.is_finite() && self.max_relative_width > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "max relative width must be positive, got {}",
                self.max_relative_width
            )));
        }
        Ok(())
    }
}

/// Builder for `ConfidencePolicy`
#[derive(Debug, Default)]
pub struct ConfidencePolicyBuilder {
    policy: ConfidencePolicy,
}

impl ConfidencePolicyBuilder {
    /// Set the standard-error multiplier
    #[must_use]
    pub const fn multiplier(mut self, multiplier: f64) -> Self {
        self.policy.multiplier = multiplier;
        self
    }

    /// Set the relative-width quality threshold
    #[must_use]
    pub const fn max_relative_width(mut self, max_relative_width: f64) -> Self {
        self.policy.max_relative_width = max_relative_width;
        self
    }

    /// Set the leaf table name
    #[must_use]
    pub fn summary_file(mut self, name: impl Into<String>) -> Self {
        self.policy.layout.summary_file = name.into();
        self
    }

    /// Set the response-time column header
    #[must_use]
    pub fn response_time_column(mut self, column: impl Into<String>) -> Self {
        self.policy.layout.response_time_column = column.into();
        self
    }

    /// Set the per-step artifact name
    #[must_use]
    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.policy.output_file = name.into();
        self
    }

    /// Build the policy
    #[must_use]
    pub fn build(self) -> ConfidencePolicy {
        self.policy
    }
}
