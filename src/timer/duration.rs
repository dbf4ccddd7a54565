//! Duration rounding, formatting and parsing.
//!
//! All durations are whole seconds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// A duration split into hours, minutes and seconds for editable display.
///
/// Hours are not wrapped at 24: a 25 hour timer reads `25:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationParts {
    /// Whole hours
    pub hours: u64,
    /// Minutes past the hour (0-59)
    pub minutes: u64,
    /// Seconds past the minute (0-59)
    pub seconds: u64,
}

impl DurationParts {
    /// Split a number of seconds.
    #[must_use]
    pub const fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// Total number of seconds; `None` if it does not fit in a `u64`.
    #[must_use]
    pub fn checked_total_seconds(&self) -> Option<u64> {
        self.hours
            .checked_mul(3600)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// Round `duration` to the nearest multiple of `bucket`, halves rounding up.
///
/// A zero bucket disables rounding. A result of zero is raised to one full
/// bucket, so a touched timer never reports an empty duration.
#[must_use]
pub const fn approximate(duration: u64, bucket: u64) -> u64 {
    if bucket == 0 {
        return duration;
    }

    let remainder = duration % bucket;
    let down = duration - remainder;
    let rounded = if remainder < bucket - remainder {
        down
    } else {
        down.saturating_add(bucket)
    };

    if rounded == 0 {
        bucket
    } else {
        rounded
    }
}

/// Format seconds as `HH:MM:SS`.
#[must_use]
pub fn format_hms(seconds: u64) -> String {
    let parts = DurationParts::from_seconds(seconds);
    format!(
        "{:02}:{:02}:{:02}",
        parts.hours, parts.minutes, parts.seconds
    )
}

/// Parse `HH:MM:SS`, `MM:SS` or a bare number of seconds.
///
/// Minutes and seconds may exceed 59; they are simply added up, the way a
/// manual edit form treats its three inputs. Empty components count as zero.
///
/// # Errors
///
/// Returns `TrackerError::InvalidInput` for anything else.
pub fn parse_hms(input: &str) -> Result<u64, TrackerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidInput("empty duration".to_string()));
    }

    let fields: Vec<&str> = trimmed.split(':').collect();
    if fields.len() > 3 {
        return Err(TrackerError::InvalidInput(format!(
            "expected HH:MM:SS, got '{trimmed}'"
        )));
    }

    let invalid = || TrackerError::InvalidInput(format!("expected HH:MM:SS, got '{trimmed}'"));

    // right-aligned: SS, MM:SS or HH:MM:SS
    let mut values = [0_u64; 3];
    let offset = values.len() - fields.len();
    for (slot, field) in values[offset..].iter_mut().zip(&fields) {
        let field = field.trim();
        if !field.is_empty() {
            *slot = field.parse::<u64>().map_err(|_| invalid())?;
        }
    }

    let parts = DurationParts {
        hours: values[0],
        minutes: values[1],
        seconds: values[2],
    };
    parts.checked_total_seconds().ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_disabled() {
        assert_eq!(approximate(1234, 0), 1234);
        assert_eq!(approximate(0, 0), 0);
    }

    #[test]
    fn test_approximate_rounds_down_then_clamps() {
        // 240 < 300 rounds down to 0, clamped to one bucket
        assert_eq!(approximate(240, 600), 600);
        assert_eq!(approximate(299, 600), 600);
    }

    #[test]
    fn test_approximate_rounds_up_at_half() {
        assert_eq!(approximate(360, 600), 600);
        assert_eq!(approximate(300, 600), 600);
        assert_eq!(approximate(900, 600), 1200);
    }

    #[test]
    fn test_approximate_nearest_bucket() {
        assert_eq!(approximate(1_499, 600), 1_200);
        assert_eq!(approximate(1_200, 600), 1_200);
        // odd bucket: edge is 2.5
        assert_eq!(approximate(7, 5), 5);
        assert_eq!(approximate(8, 5), 10);
    }

    #[test]
    fn test_approximate_untouched_timer_reports_one_bucket() {
        assert_eq!(approximate(0, 900), 900);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
    }

    #[test]
    fn test_format_hms_past_a_day() {
        assert_eq!(format_hms(90_000), "25:00:00");
    }

    #[test]
    fn test_duration_parts() {
        let parts = DurationParts::from_seconds(3661);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 1);
        assert_eq!(parts.checked_total_seconds(), Some(3661));
        assert_eq!(parts.to_string(), "1h 1m 1s");
    }

    #[test]
    fn test_parse_hms() {
        assert_eq!(parse_hms("01:01:01").unwrap(), 3661);
        assert_eq!(parse_hms("2:30").unwrap(), 150);
        assert_eq!(parse_hms("45").unwrap(), 45);
        assert_eq!(parse_hms("1::5").unwrap(), 3605);
        assert_eq!(parse_hms(" 0:90:0 ").unwrap(), 5400);
    }

    #[test]
    fn test_parse_hms_invalid() {
        assert!(parse_hms("").is_err());
        assert!(parse_hms("abc").is_err());
        assert!(parse_hms("1:2:3:4").is_err());
        assert!(parse_hms("-5").is_err());
        assert!(matches!(
            parse_hms("999999999999999999:00:00"),
            Err(TrackerError::InvalidInput(_))
        ));
        assert!(parse_hms("99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_hms_accepts_largest_value() {
        assert_eq!(parse_hms("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_approximate_near_max_saturates() {
        assert_eq!(approximate(u64::MAX, 1_000), u64::MAX);
        assert_eq!(approximate(10, u64::MAX), u64::MAX);
        assert_eq!(approximate(u64::MAX - 1, u64::MAX), u64::MAX);
    }
}
