//! Timestamp handling for the VVO web API.
//!
//! The web API serializes instants as Microsoft JSON dates, e.g.
//! `/Date(1532818920000-0000)/`: epoch milliseconds followed by an offset
//! that carries no information (the milliseconds are already UTC).

use chrono::{DateTime, Utc};

/// Error returned when a timestamp string holds no usable instant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parse a provider timestamp.
///
/// Takes the first run of ASCII digits as epoch milliseconds.
///
/// # Examples
///
/// ```
/// use dvb::domain::parse_date;
///
/// let t = parse_date("/Date(1532818920000-0000)/").unwrap();
/// assert_eq!(t.timestamp_millis(), 1532818920000);
///
/// assert!(parse_date("/Date()/").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, TimeError> {
    let start = s
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| TimeError::new(s, "no digits"))?;
    let digits = &s[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let millis = digits[..end]
        .parse::<i64>()
        .map_err(|_| TimeError::new(s, "milliseconds out of range"))?;

    DateTime::from_timestamp_millis(millis).ok_or_else(|| TimeError::new(s, "instant out of range"))
}

/// Signed minutes from `start` to `end`, rounded to the nearest minute.
/// Exact half minutes round up, so -30 s is 0 and -90 s is -1.
///
/// Computed from elapsed milliseconds, so it stays correct across day and
/// month boundaries.
pub fn date_difference(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / 60_000.0 + 0.5).floor() as i64
}
