//! Terminal column chart of a profile

use std::fmt::Write as _;

/// Render `profile` as a `#` column chart at most `width` columns wide and
/// exactly `height` rows tall, followed by an x-axis line.
///
/// Samples are bucketed evenly into columns; a column shows the largest
/// rate in its bucket. Rows scale linearly from the profile's minimum
/// (bottom row) to its maximum (top row), and those two rates label the
/// y-axis. Returns an empty string if there is nothing to draw.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render(profile: &[i64], width: usize, height: usize) -> String {
    let (Some(&lo), Some(&hi)) = (profile.iter().min(), profile.iter().max()) else {
        return String::new();
    };
    if width == 0 || height == 0 {
        return String::new();
    }

    let columns = width.min(profile.len());
    let span = (hi as f64) - (lo as f64);
    let levels: Vec<usize> = (0..columns)
        .map(|c| {
            let start = c * profile.len() / columns;
            let end = (c + 1) * profile.len() / columns;
            let peak = profile[start..end].iter().copied().max().unwrap_or(lo);
            if lo == hi {
                height
            } else {
                1 + (((peak as f64 - lo as f64) / span) * (height - 1) as f64).round() as usize
            }
        })
        .collect();

    let (top, bottom) = (hi.to_string(), lo.to_string());
    let label_width = top.len().max(bottom.len());

    let mut out = String::new();
    for row in (1..=height).rev() {
        let label = if row == height {
            top.as_str()
        } else if row == 1 {
            bottom.as_str()
        } else {
            ""
        };
        let cells: String = levels
            .iter()
            .map(|&level| if level >= row { '#' } else { ' ' })
            .collect();
        let _ = writeln!(out, "{label:>label_width$} |{}", cells.trim_end());
    }
    let _ = writeln!(out, "{:>label_width$} +{}", "", "-".repeat(columns));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ramp() {
        let chart = render(&[1, 2, 3, 4], 10, 4);
        assert_eq!(chart, "4 |   #\n  |  ##\n  | ###\n1 |####\n  +----\n");
    }

    #[test]
    fn test_render_flat_fills_every_row() {
        assert_eq!(render(&[5, 5], 10, 2), "5 |##\n5 |##\n  +--\n");
    }

    #[test]
    fn test_render_buckets_to_width() {
        let profile: Vec<i64> = (0..100).collect();
        let chart = render(&profile, 10, 3);
        let axis = chart.lines().last().unwrap();
        assert_eq!(axis, "   +----------");
        assert_eq!(chart.lines().count(), 4);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], 10, 4), "");
        assert_eq!(render(&[1, 2], 0, 4), "");
        assert_eq!(render(&[1, 2], 4, 0), "");
    }
}
