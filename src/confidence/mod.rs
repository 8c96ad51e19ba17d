//! Interval aggregator
//!
//! Walks `root/<step>/<repeat>/summary_out.csv`, pools every step's samples
//! across repeats, and writes a 95% normal-approximation confidence
//! interval to `root/<step>/confidence.yml`. Repeats whose own mean is too
//! small for the step's interval width are reported as warnings.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interference::confidence::{self, ConfidencePolicy};
//!
//! let run = confidence::run("measurements/checkout", &ConfidencePolicy::default())?;
//! for (step, stats) in &run.statistics {
//!     println!("{step}: [{}, {}]", stats.ci_low, stats.ci_high);
//! }
//! # Ok::<(), interference::Error>(())
//! ```
//!
//! Any load or compute failure aborts the run. Artifacts for steps written
//! before the failure are left in place; re-running is safe.

mod persist;
mod policy;
mod quality;
mod stats;

pub use persist::{persist_step_statistics, read_step_statistics, ConfidenceFile};
pub use policy::{
    ConfidencePolicy, ConfidencePolicyBuilder, CONFIDENCE_FILE_NAME, DEFAULT_MAX_RELATIVE_WIDTH,
    DEFAULT_MULTIPLIER, MEASUREMENTS_DIR,
};
pub use quality::{check_repeat_quality, report, RepeatFlag};
pub use stats::{compute_step_statistics, mean, GroupIndex, StepStatistics};

use crate::measurement::load_all_records;
use crate::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of one aggregation pass
#[derive(Debug, Clone)]
pub struct ConfidenceRun {
    /// Interval per step
    pub statistics: BTreeMap<String, StepStatistics>,
    /// Flagged repeats per step
    pub exceeding: BTreeMap<String, Vec<RepeatFlag>>,
    /// Artifacts written, in step order
    pub written: Vec<PathBuf>,
}

/// Aggregate one benchmark root end to end
///
/// # Errors
/// Returns the first load, statistics, or write failure
pub fn run<P: AsRef<Path>>(root: P, policy: &ConfidencePolicy) -> Result<ConfidenceRun> {
    let root = root.as_ref();
    policy.validate()?;

    let set = load_all_records(root, &policy.layout)?;
    let index = GroupIndex::build(&set)?;
    let statistics = compute_step_statistics(&index, policy.multiplier)?;

    let written = statistics
        .iter()
        .map(|(step, stats)| persist_step_statistics(root, step, stats, &policy.output_file))
        .collect::<Result<Vec<_>>>()?;

    let exceeding = check_repeat_quality(&index, &statistics, policy.max_relative_width);
    report(&exceeding, &statistics, policy.max_relative_width);

    info!(
        root = %root.display(),
        steps = statistics.len(),
        flagged_steps = exceeding.len(),
        "confidence intervals computed"
    );

    Ok(ConfidenceRun {
        statistics,
        exceeding,
        written,
    })
}
