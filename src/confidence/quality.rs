//! Repeat quality gate
//!
//! A step's pooled interval width is compared against each of its repeats'
//! own mean response time. Flags are advisory: they are logged, never
//! returned as errors.

use super::stats::{mean, GroupIndex, StepStatistics};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// A repeat whose mean is too small for its step's interval width
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatFlag {
    /// Repeat identifier
    pub repeat: String,
    /// The exceeded limit, `max_relative_width * repeat_mean`
    pub threshold: f64,
}

impl fmt::Display for RepeatFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.repeat, self.threshold)
    }
}

/// Flag every repeat whose mean `m` satisfies `step_width > max_relative_width * m`.
///
/// The width is the step's pooled value, shared by all of its repeats.
/// Steps without statistics and steps with no flagged repeat are absent
/// from the result.
#[must_use]
pub fn check_repeat_quality(
    index: &GroupIndex,
    stats: &BTreeMap<String, StepStatistics>,
    max_relative_width: f64,
) -> BTreeMap<String, Vec<RepeatFlag>> {
    let mut exceeding: BTreeMap<String, Vec<RepeatFlag>> = BTreeMap::new();

    for (step, repeats) in index.by_repeat() {
        let Some(step_stats) = stats.get(step) else {
            continue;
        };
        for (repeat, samples) in repeats {
            let Some(repeat_mean) = mean(samples) else {
                continue;
            };
            let threshold = max_relative_width * repeat_mean;
            if step_stats.ci_width > threshold {
                exceeding.entry(step.clone()).or_default().push(RepeatFlag {
                    repeat: repeat.clone(),
                    threshold,
                });
            }
        }
    }

    exceeding
}

/// Emit one warning per step with flagged repeats
pub fn report(
    exceeding: &BTreeMap<String, Vec<RepeatFlag>>,
    stats: &BTreeMap<String, StepStatistics>,
    max_relative_width: f64,
) {
    for (step, flags) in exceeding {
        if flags.is_empty() {
            continue;
        }
        let width = stats.get(step).map_or(f64::NAN, |s| s.ci_width);
        let repeats = flags
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        warn!(
            step = %step,
            width,
            flagged = flags.len(),
            "step {step}:\nconfidence interval width ({width}) exceeds {}% of sample mean\n{repeats}",
            max_relative_width * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::DEFAULT_MAX_RELATIVE_WIDTH;
    use crate::measurement::MeasurementRecord;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_report(
        exceeding: &BTreeMap<String, Vec<RepeatFlag>>,
        stats: &BTreeMap<String, StepStatistics>,
    ) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            report(exceeding, stats, DEFAULT_MAX_RELATIVE_WIDTH);
        });
        logs.contents()
    }

    fn flag(repeat: &str, threshold: f64) -> RepeatFlag {
        RepeatFlag {
            repeat: repeat.to_string(),
            threshold,
        }
    }

    fn step_stats(ci_width: f64) -> StepStatistics {
        StepStatistics {
            count: 4,
            mean: 100.0,
            sem: ci_width / 3.92,
            ci_low: 100.0 - ci_width / 2.0,
            ci_high: 100.0 + ci_width / 2.0,
            ci_width,
        }
    }

    #[test]
    fn test_flags_only_repeats_below_threshold() {
        // width 5.0: mean 50 -> limit 2.5 (flagged), mean 200 -> limit 10 (kept)
        let records = vec![
            MeasurementRecord::new("s", "fast", 40.0),
            MeasurementRecord::new("s", "fast", 60.0),
            MeasurementRecord::new("s", "slow", 190.0),
            MeasurementRecord::new("s", "slow", 210.0),
        ];
        let index = GroupIndex::from_records(&records);
        let stats = BTreeMap::from([("s".to_string(), step_stats(5.0))]);

        let exceeding = check_repeat_quality(&index, &stats, DEFAULT_MAX_RELATIVE_WIDTH);

        assert_eq!(exceeding.len(), 1);
        let flags = &exceeding["s"];
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].repeat, "fast");
        assert!((flags[0].threshold - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_width_equal_to_threshold_is_not_flagged() {
        let records = vec![
            MeasurementRecord::new("s", "r", 100.0),
            MeasurementRecord::new("s", "r", 100.0),
        ];
        let index = GroupIndex::from_records(&records);
        let stats = BTreeMap::from([("s".to_string(), step_stats(5.0))]);

        assert!(check_repeat_quality(&index, &stats, DEFAULT_MAX_RELATIVE_WIDTH).is_empty());
    }

    #[test]
    fn test_steps_are_checked_independently() {
        let records = vec![
            MeasurementRecord::new("a", "0", 10.0),
            MeasurementRecord::new("b", "0", 10.0),
        ];
        let index = GroupIndex::from_records(&records);
        let stats = BTreeMap::from([
            ("a".to_string(), step_stats(1.0)),
            ("b".to_string(), step_stats(0.1)),
        ]);

        let exceeding = check_repeat_quality(&index, &stats, DEFAULT_MAX_RELATIVE_WIDTH);
        assert_eq!(exceeding.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_flag_display() {
        let flag = RepeatFlag {
            repeat: "3".to_string(),
            threshold: 1.5,
        };
        assert_eq!(flag.to_string(), "3 (1.5)");
    }

    #[test]
    fn test_report_warning_text() {
        let exceeding = BTreeMap::from([
            ("200rps".to_string(), vec![flag("0", 2.5), flag("3", 1.5)]),
            ("300rps".to_string(), Vec::new()),
        ]);
        let stats = BTreeMap::from([
            ("200rps".to_string(), step_stats(5.0)),
            ("300rps".to_string(), step_stats(9.0)),
        ]);

        let output = capture_report(&exceeding, &stats);

        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("step 200rps:\n"), "{output}");
        assert!(
            output.contains("confidence interval width (5) exceeds 5% of sample mean\n"),
            "{output}"
        );
        assert!(output.contains("\n0 (2.5)\n3 (1.5)"), "{output}");
        assert!(output.contains("step=200rps"), "{output}");
        assert!(output.contains("width=5"), "{output}");
        assert!(output.contains("flagged=2"), "{output}");
        assert!(!output.contains("300rps"), "{output}");
        assert_eq!(output.matches("WARN").count(), 1);
    }

    #[test]
    fn test_report_is_silent_without_flags() {
        let exceeding = BTreeMap::from([("quiet".to_string(), Vec::new())]);
        let stats = BTreeMap::from([("quiet".to_string(), step_stats(1.0))]);

        assert!(capture_report(&exceeding, &stats).is_empty());
        assert!(capture_report(&BTreeMap::new(), &stats).is_empty());
    }

    #[test]
    fn test_report_never_panics_on_missing_stats() {
        let exceeding = BTreeMap::from([(
            "ghost".to_string(),
            vec![RepeatFlag {
                repeat: "0".to_string(),
                threshold: 1.0,
            }],
        )]);
        report(&exceeding, &BTreeMap::new(), DEFAULT_MAX_RELATIVE_WIDTH);
    }
}
