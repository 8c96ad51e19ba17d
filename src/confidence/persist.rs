//! `confidence.yml` artifacts

use super::StepStatistics;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk form of one step's confidence interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceFile {
    /// Lower bound
    pub low: f64,
    /// Upper bound
    pub high: f64,
    /// `high - low`
    pub width: f64,
}

impl From<&StepStatistics> for ConfidenceFile {
    fn from(stats: &StepStatistics) -> Self {
        Self {
            low: stats.ci_low,
            high: stats.ci_high,
            width: stats.ci_width,
        }
    }
}

/// Write `root/<step>/<file_name>`, replacing any previous artifact.
///
/// The step directory must already exist.
///
/// # Errors
/// Returns error if serialization or the write fails
pub fn persist_step_statistics(
    root: &Path,
    step: &str,
    stats: &StepStatistics,
    file_name: &str,
) -> Result<PathBuf> {
    let path = root.join(step).join(file_name);
    let yaml = serde_yaml::to_string(&ConfidenceFile::from(stats))?;
    fs::write(&path, yaml)?;

    info!(step, low = stats.ci_low, high = stats.ci_high, width = stats.ci_width, path = %path.display(), "wrote confidence interval");
    Ok(path)
}

/// Read back a persisted artifact
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid artifact
pub fn read_step_statistics<P: AsRef<Path>>(path: P) -> Result<ConfidenceFile> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn stats() -> StepStatistics {
        StepStatistics {
            count: 4,
            mean: 10.0,
            sem: 0.5,
            ci_low: 9.02,
            ci_high: 10.98,
            ci_width: 1.96,
        }
    }

    #[test]
    fn test_persist_writes_three_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("step-1")).unwrap();

        let path = persist_step_statistics(dir.path(), "step-1", &stats(), "confidence.yml").unwrap();
        assert_eq!(path, dir.path().join("step-1").join("confidence.yml"));

        let value: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let mapping = value.as_mapping().unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(value["low"].as_f64(), Some(9.02));
        assert_eq!(value["high"].as_f64(), Some(10.98));
        assert_eq!(value["width"].as_f64(), Some(1.96));
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("s")).unwrap();
        let path = dir.path().join("s").join("confidence.yml");
        fs::write(&path, "stale: true\nextra: 1\n").unwrap();

        persist_step_statistics(dir.path(), "s", &stats(), "confidence.yml").unwrap();

        assert_eq!(read_step_statistics(&path).unwrap(), ConfidenceFile::from(&stats()));
    }

    #[test]
    fn test_persist_does_not_create_step_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = persist_step_statistics(dir.path(), "absent", &stats(), "confidence.yml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
