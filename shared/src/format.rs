//! Duration formatting for the stopwatch and timer readouts
//!
//! Converts elapsed milliseconds into display strings and into the digit
//! sequence consumed by the seven-segment renderer.

/// Milliseconds split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Hundredths of a second (0-99), floored
    pub hundredths: u64,
}

impl DurationParts {
    pub fn from_ms(ms: u64) -> Self {
        let total_secs = ms / 1000;
        Self {
            hours: total_secs / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
            hundredths: (ms % 1000) / 10,
        }
    }

    /// Whether the hours segment is shown at all
    pub fn has_hours(&self) -> bool {
        self.hours > 0
    }
}

/// Format milliseconds as "MM:SS.hh", or "HH:MM:SS.hh" once an hour has passed
pub fn format_duration(ms: u64) -> String {
    let parts = DurationParts::from_ms(ms);
    if parts.has_hours() {
        format!(
            "{:02}:{:02}:{:02}.{:02}",
            parts.hours, parts.minutes, parts.seconds, parts.hundredths
        )
    } else {
        format!(
            "{:02}:{:02}.{:02}",
            parts.minutes, parts.seconds, parts.hundredths
        )
    }
}

/// Digit groups for the segmented readout, most significant group first.
///
/// Each group is a pair of decimal digits; the hours pair is present only when
/// hours > 0. Hours beyond 99 keep their last two digits.
pub fn display_digits(ms: u64) -> Vec<[u8; 2]> {
    let parts = DurationParts::from_ms(ms);
    let mut groups = Vec::with_capacity(4);
    if parts.has_hours() {
        groups.push(digit_pair(parts.hours % 100));
    }
    groups.push(digit_pair(parts.minutes));
    groups.push(digit_pair(parts.seconds));
    groups.push(digit_pair(parts.hundredths));
    groups
}

fn digit_pair(value: u64) -> [u8; 2] {
    [(value / 10 % 10) as u8, (value % 10) as u8]
}

/// Segment on/off pattern for one digit.
///
/// Order: a (top), b (upper right), c (lower right), d (bottom),
/// e (lower left), f (upper left), g (middle).
pub type SegmentPattern = [bool; 7];

const SEGMENT_MAP: [SegmentPattern; 10] = [
    [true, true, true, true, true, true, false],
    [false, true, true, false, false, false, false],
    [true, true, false, true, true, false, true],
    [true, true, true, true, false, false, true],
    [false, true, true, false, false, true, true],
    [true, false, true, true, false, true, true],
    [true, false, true, true, true, true, true],
    [true, true, true, false, false, false, false],
    [true, true, true, true, true, true, true],
    [true, true, true, true, false, true, true],
];

/// Look up the lit segments for a decimal digit; anything above 9 renders as 0
pub fn segments_for(digit: u8) -> SegmentPattern {
    SEGMENT_MAP
        .get(digit as usize)
        .copied()
        .unwrap_or(SEGMENT_MAP[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_boundaries() {
        let cases = [
            (0, "00:00.00"),
            (999, "00:00.99"),
            (1000, "00:01.00"),
            (59_999, "00:59.99"),
            (60_000, "01:00.00"),
            (3_599_999, "59:59.99"),
            (3_600_000, "01:00:00.00"),
        ];
        for (ms, expected) in cases {
            assert_eq!(format_duration(ms), expected, "ms = {}", ms);
        }
    }

    #[test]
    fn test_hundredths_are_floored() {
        assert_eq!(format_duration(1_009), "00:01.00");
        assert_eq!(format_duration(1_019), "00:01.01");
    }

    #[test]
    fn test_display_digits_without_hours() {
        assert_eq!(display_digits(83_450), vec![[0, 1], [2, 3], [4, 5]]);
    }

    #[test]
    fn test_display_digits_with_hours() {
        let ms = 12 * 3_600_000 + 34 * 60_000 + 56_000 + 780;
        assert_eq!(display_digits(ms), vec![[1, 2], [3, 4], [5, 6], [7, 8]]);
    }

    #[test]
    fn test_segment_lookup() {
        assert_eq!(segments_for(8), [true; 7]);
        assert_eq!(segments_for(1), [false, true, true, false, false, false, false]);
        assert_eq!(segments_for(42), segments_for(0));
    }
}
