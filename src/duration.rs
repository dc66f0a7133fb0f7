//! Duration string codec
//!
//! Encodes and decodes elapsed times between whole seconds and the
//! `H:MM:SS` / `M:SS` display format used throughout the tool. Every other
//! analytics module builds on this substrate.

use crate::error::ParseError;

/// Parse a duration string, falling back to zero seconds on any
/// unrecognized input.
///
/// Accepts `H:MM:SS` (three colon-separated integer groups) or `M:SS`
/// (two groups). Anything else resolves to 0 rather than an error; this
/// lenient mode exists for compatibility with loosely validated history
/// records. Use [`parse_duration_strict`] when malformed input should
/// surface to the caller.
pub fn parse_duration(text: &str) -> u32 {
    parse_duration_strict(text).unwrap_or(0)
}

/// Parse a duration string, returning a typed error on malformed input.
///
/// Fractional seconds are truncated toward zero, so `"2:05.7"` decodes to
/// 125 seconds.
pub fn parse_duration_strict(text: &str) -> Result<u32, ParseError> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, parse_group(text, m)?, parse_seconds_group(text, s)?),
        [h, m, s] => (
            parse_group(text, h)?,
            parse_group(text, m)?,
            parse_seconds_group(text, s)?,
        ),
        _ => {
            return Err(ParseError::InvalidDuration {
                text: text.to_string(),
                reason: format!("expected 2 or 3 colon-separated groups, got {}", parts.len()),
            })
        }
    };

    let total = u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds);
    u32::try_from(total).map_err(|_| ParseError::InvalidDuration {
        text: text.to_string(),
        reason: "value out of range".to_string(),
    })
}

/// Format whole seconds as `H:MM:SS` when at least an hour, else `M:SS`.
///
/// Minutes and seconds are zero-padded to two digits; hours are not
/// padded. Callers holding fractional seconds floor them before calling.
pub fn format_duration(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

fn parse_group(text: &str, group: &str) -> Result<u32, ParseError> {
    group.parse::<u32>().map_err(|_| ParseError::InvalidDuration {
        text: text.to_string(),
        reason: format!("non-numeric group {:?}", group),
    })
}

/// The final group may carry a fractional part, which is truncated.
fn parse_seconds_group(text: &str, group: &str) -> Result<u32, ParseError> {
    if group.contains('.') {
        let value = group.parse::<f64>().map_err(|_| ParseError::InvalidDuration {
            text: text.to_string(),
            reason: format!("non-numeric group {:?}", group),
        })?;
        if !value.is_finite() || value < 0.0 || value >= u32::MAX as f64 {
            return Err(ParseError::InvalidDuration {
                text: text.to_string(),
                reason: "seconds out of range".to_string(),
            });
        }
        Ok(value.trunc() as u32)
    } else {
        parse_group(text, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(3725), "1:02:05");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(3600), "1:00:00");
        // Hours are not padded
        assert_eq!(format_duration(36_610), "10:10:10");
    }

    #[test]
    fn test_parse_two_groups() {
        assert_eq!(parse_duration("2:05"), 125);
        assert_eq!(parse_duration("45:00"), 2700);
        assert_eq!(parse_duration("0:59"), 59);
    }

    #[test]
    fn test_parse_three_groups() {
        assert_eq!(parse_duration("1:02:05"), 3725);
        assert_eq!(parse_duration("10:10:10"), 36_610);
    }

    #[test]
    fn test_lenient_fallback_to_zero() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("90"), 0);
        assert_eq!(parse_duration("1:2:3:4"), 0);
        assert_eq!(parse_duration("twenty:00"), 0);
        assert_eq!(parse_duration("-1:00"), 0);
    }

    #[test]
    fn test_strict_errors() {
        assert!(parse_duration_strict("90").is_err());
        assert!(parse_duration_strict("1:2:3:4").is_err());
        assert!(parse_duration_strict("twenty:00").is_err());
        assert!(parse_duration_strict("").is_err());
    }

    #[test]
    fn test_fractional_seconds_truncated() {
        assert_eq!(parse_duration("2:05.7"), 125);
        assert_eq!(parse_duration_strict("1:02:05.999").unwrap(), 3725);
    }

    #[test]
    fn test_round_trip_spot_checks() {
        for s in [0, 1, 59, 60, 61, 3599, 3600, 3661, 86_399, 359_999] {
            assert_eq!(parse_duration(&format_duration(s)), s);
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(s in 0u32..360_000) {
            prop_assert_eq!(parse_duration(&format_duration(s)), s);
        }

        #[test]
        fn prop_strict_round_trip(s in 0u32..360_000) {
            prop_assert_eq!(parse_duration_strict(&format_duration(s)).unwrap(), s);
        }
    }
}
