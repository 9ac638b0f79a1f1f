//! WebVTT timestamp parsing and formatting.
//!
//! Converts between `HH:MM:SS.mmm` timestamp strings and a canonical
//! seconds representation. Millisecond precision is the contract: parsing
//! a formatted value recovers the original to the nearest millisecond.

use crate::error::{Result, SporError};
use regex::Regex;
use std::sync::OnceLock;

/// Matches `H(H):MM:SS` with an optional 1-3 digit fraction.
fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})(?:[.,](\d{1,3}))?$").expect("Invalid regex")
    })
}

/// Parse a timestamp string (`00:01:23.456` or `00:01:23,456`) to seconds.
///
/// Rejects malformed strings and out-of-range minute/second fields.
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    if timestamp.is_empty() {
        return Err(SporError::Timestamp("empty timestamp".to_string()));
    }

    let normalized = timestamp.replace(',', ".");
    let caps = timestamp_regex().captures(&normalized).ok_or_else(|| {
        SporError::Timestamp(format!(
            "invalid format: {}. Expected HH:MM:SS.mmm or HH:MM:SS,mmm",
            timestamp
        ))
    })?;

    let invalid = || SporError::Timestamp(format!("invalid values: {}", timestamp));
    let hours: u64 = caps[1].parse().map_err(|_| invalid())?;
    let minutes: u64 = caps[2].parse().map_err(|_| invalid())?;
    let seconds: u64 = caps[3].parse().map_err(|_| invalid())?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    // Right-pad the fraction to milliseconds ("5" -> 500ms).
    let millis: u64 = match caps.get(4) {
        Some(m) => format!("{:0<3}", m.as_str()).parse().map_err(|_| invalid())?,
        None => 0,
    };

    Ok((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
}

/// Format seconds as a `HH:MM:SS.mmm` timestamp.
///
/// Fails on negative or non-finite input.
pub fn format_timestamp(seconds: f64) -> Result<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SporError::Timestamp(format!(
            "invalid seconds value: {}",
            seconds
        )));
    }

    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    Ok(format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse_timestamp("00:00:05.000").unwrap(), 5.0);
        assert_eq!(parse_timestamp("01:02:03.500").unwrap(), 3723.5);
        assert_eq!(parse_timestamp("00:01:00").unwrap(), 60.0);
    }

    #[test]
    fn test_parse_comma_fraction() {
        assert_eq!(parse_timestamp("00:00:01,250").unwrap(), 1.25);
    }

    #[test]
    fn test_parse_short_fraction_pads_right() {
        // "5" means 500ms, not 5ms
        assert_eq!(parse_timestamp("00:00:01.5").unwrap(), 1.5);
        assert_eq!(parse_timestamp("00:00:01.25").unwrap(), 1.25);
    }

    #[test]
    fn test_parse_single_digit_hours() {
        assert_eq!(parse_timestamp("1:00:00.000").unwrap(), 3600.0);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_timestamp("00:60:00.000").is_err());
        assert!(parse_timestamp("00:00:60.000").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("not a timestamp").is_err());
        assert!(parse_timestamp("00:00").is_err());
        assert!(parse_timestamp("00:00:00.0000").is_err());
        assert!(parse_timestamp("00:0:00.000").is_err());
    }

    #[test]
    fn test_format_basic() {
        assert_eq!(format_timestamp(0.0).unwrap(), "00:00:00.000");
        assert_eq!(format_timestamp(61.5).unwrap(), "00:01:01.500");
        assert_eq!(format_timestamp(3661.123).unwrap(), "01:01:01.123");
    }

    #[test]
    fn test_format_rejects_negative() {
        assert!(format_timestamp(-1.0).is_err());
        assert!(format_timestamp(f64::NAN).is_err());
    }

    #[test]
    fn test_millisecond_round_trip() {
        for t in ["00:00:05.000", "01:02:03.500", "10:59:59.999", "00:00:00.001"] {
            let secs = parse_timestamp(t).unwrap();
            let formatted = format_timestamp(secs).unwrap();
            assert_eq!(parse_timestamp(&formatted).unwrap(), secs);
        }
    }
}
