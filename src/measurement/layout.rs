//! Measurement directory discovery
//!
//! A benchmark root is laid out as `root/<step>/<repeat>/<summary_file>`.
//! Step and repeat identifiers are the directory names, used verbatim.

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Leaf file holding one repeat's per-request samples
pub const SUMMARY_FILE_NAME: &str = "summary_out.csv";

/// Response-time column as written by the load generator
pub const RESPONSE_TIME_SOURCE_COLUMN: &str = "Avg Response Time";

/// File and column names of the on-disk measurement layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementLayout {
    /// Leaf file name inside every repeat directory
    pub summary_file: String,
    /// Header of the response-time column inside the leaf file
    pub response_time_column: String,
}

impl Default for MeasurementLayout {
    fn default() -> Self {
        Self {
            summary_file: SUMMARY_FILE_NAME.to_string(),
            response_time_column: RESPONSE_TIME_SOURCE_COLUMN.to_string(),
        }
    }
}

/// One `(step, repeat)` directory discovered under a benchmark root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RepeatDir {
    /// Step identifier (directory name)
    pub step: String,
    /// Repeat identifier (directory name)
    pub repeat: String,
    /// Path of the repeat directory
    pub path: PathBuf,
}

impl RepeatDir {
    /// Path of the leaf table for this repeat
    #[must_use]
    pub fn summary_path(&self, layout: &MeasurementLayout) -> PathBuf {
        self.path.join(&layout.summary_file)
    }
}

/// Discover every `(step, repeat)` pair under `root`.
///
/// Only directory entries count at both levels; stray files are skipped.
/// The result is sorted by step, then repeat, so loading and reporting do
/// not depend on filesystem listing order.
///
/// # Errors
/// Returns `Error::Io` if `root` or a step directory cannot be listed
pub fn discover<P: AsRef<Path>>(root: P) -> Result<Vec<RepeatDir>> {
    let root = root.as_ref();
    let mut found = Vec::new();

    for (step, step_path) in subdirectories(root)? {
        for (repeat, path) in subdirectories(&step_path)? {
            found.push(RepeatDir {
                step: step.clone(),
                repeat,
                path,
            });
        }
    }

    found.sort();
    debug!(root = %root.display(), pairs = found.len(), "discovered measurement directories");
    Ok(found)
}

fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        dirs.push((name, entry.path()));
    }
    dirs.sort();
    Ok(dirs)
}
