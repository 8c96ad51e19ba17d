//! Request-rate profiles for the load generator
//!
//! A profile is one target rate per second. Files are written as
//! `"<index>, <rate>"` lines with a 1-based index.

pub mod plot;

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Linear ramp of `duration` evenly spaced rates from `min_rps` to `max_rps`.
///
/// Both endpoints are exact. Intermediate values round half to even, so
/// `generate_linear(10, 20, 5)` is `[10, 12, 15, 18, 20]`.
///
/// # Errors
/// Returns `Error::InvalidArgument` if `duration < 1` or the profile cannot
/// be allocated
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn generate_linear(min_rps: i64, max_rps: i64, duration: i64) -> Result<Vec<i64>> {
    let count = positive("duration", duration)?;
    if count == 1 {
        return Ok(vec![min_rps]);
    }

    let last = count - 1;
    let delta = (max_rps as f64 - min_rps as f64) / last as f64;
    let mut profile = allocate(count)?;
    profile.extend((0..count).map(|i| {
        if i == last {
            max_rps
        } else {
            (min_rps as f64 + i as f64 * delta).round_ties_even() as i64
        }
    }));
    Ok(profile)
}

/// Staircase of `steps` plateaus.
///
/// Plateau `i` holds `start_rps + i * increase` for `repeats * step_duration`
/// samples.
///
/// # Errors
/// Returns `Error::InvalidArgument` if `steps`, `repeats`, or `step_duration`
/// is not positive, the profile length or a rate overflows, or the profile
/// cannot be allocated
pub fn generate_stepwise(
    start_rps: i64,
    steps: i64,
    increase: i64,
    repeats: i64,
    step_duration: i64,
) -> Result<Vec<i64>> {
    let steps = positive("steps", steps)?;
    let repeats = positive("repeats", repeats)?;
    let step_duration = positive("step duration", step_duration)?;

    let plateau = repeats
        .checked_mul(step_duration)
        .ok_or_else(|| Error::InvalidArgument("plateau length overflows".to_string()))?;
    let total = plateau
        .checked_mul(steps)
        .ok_or_else(|| Error::InvalidArgument("profile length overflows".to_string()))?;

    let mut profile = allocate(total)?;
    for step in 0..steps {
        let rate = i64::try_from(step)
            .ok()
            .and_then(|step| increase.checked_mul(step))
            .and_then(|offset| start_rps.checked_add(offset))
            .ok_or_else(|| Error::InvalidArgument(format!("rate of step {step} overflows")))?;
        profile.extend(std::iter::repeat(rate).take(plateau));
    }
    Ok(profile)
}

fn allocate(len: usize) -> Result<Vec<i64>> {
    let mut profile = Vec::new();
    profile
        .try_reserve_exact(len)
        .map_err(|e| Error::InvalidArgument(format!("profile of {len} samples is too long: {e}")))?;
    Ok(profile)
}

fn positive(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| Error::InvalidArgument(format!("{name} must be positive, got {value}")))
}

/// Write a profile as `"<index>, <rate>"` lines
///
/// # Errors
/// Returns `Error::Io` if writing fails
pub fn write_profile_to<W: Write>(mut writer: W, profile: &[i64]) -> Result<()> {
    for (i, rate) in profile.iter().enumerate() {
        writeln!(writer, "{}, {rate}", i + 1)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a profile to `path`, replacing any existing file
///
/// # Errors
/// Returns `Error::Io` if the file cannot be created or written
pub fn write_profile<P: AsRef<Path>>(path: P, profile: &[i64]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_profile_to(BufWriter::new(file), profile)?;
    info!(path = %path.display(), samples = profile.len(), "wrote profile");
    Ok(())
}
