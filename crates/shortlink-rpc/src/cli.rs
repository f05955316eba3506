//! Argument parsers shared by the shortlink binaries.

use jiff::SignedDuration;
use std::time::Duration;

/// Parses a non-negative duration such as `90s`, `1m 30s` or `PT1M`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let duration: SignedDuration = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid duration '{}': {e}", s))?;
    Duration::try_from(duration).map_err(|_| format!("duration '{}' must not be negative", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_and_iso_durations() {
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("PT2S").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_garbage_and_negative_durations() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-5s").is_err());
    }
}
