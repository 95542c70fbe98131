//! Timestamp formatting for encoded records
//!
//! Supports RFC 3339, Unix timestamps, and custom strftime formats.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_field_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(TimestampFormat::Rfc3339.format(&time).unwrap(), "2024-01-01T00:00:00Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with second precision: `2024-01-01T00:00:00Z`
    #[default]
    Rfc3339,

    /// RFC 3339 with nanoseconds: `2024-01-01T00:00:00.123456789Z`
    Rfc3339Nanos,

    /// ISO 8601 with milliseconds: `2024-01-01T00:00:00.123Z`
    Iso8601Millis,

    /// Unix timestamp in seconds: `1704067200`
    Unix,

    /// Unix timestamp in milliseconds: `1704067200123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_field_logger::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    ///
    /// Fails only for a `Custom` pattern chrono cannot render.
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        match self {
            TimestampFormat::Rfc3339 => Ok(datetime.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TimestampFormat::Rfc3339Nanos => {
                Ok(datetime.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
            TimestampFormat::Iso8601Millis => {
                Ok(datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            }
            TimestampFormat::Unix => Ok(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => Ok(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(pattern) => {
                let mut out = String::with_capacity(pattern.len() + 16);
                write!(out, "{}", datetime.format(pattern))
                    .map_err(|_| invalid_pattern(pattern))?;
                Ok(out)
            }
        }
    }

    /// Render for a JSON document: numeric formats stay numbers
    pub fn to_json_value(&self, datetime: &DateTime<Utc>) -> Result<serde_json::Value> {
        match self {
            TimestampFormat::Unix => Ok(serde_json::Value::Number(datetime.timestamp().into())),
            TimestampFormat::UnixMillis => {
                Ok(serde_json::Value::Number(datetime.timestamp_millis().into()))
            }
            _ => self.format(datetime).map(serde_json::Value::String),
        }
    }

    /// Reject `Custom` patterns containing unknown strftime specifiers
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(pattern)
                if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) =>
            {
                Err(invalid_pattern(pattern))
            }
            _ => Ok(()),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}

fn invalid_pattern(pattern: &str) -> LoggerError {
    LoggerError::formatter("timestamp", format!("invalid strftime pattern {:?}", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "2025-01-08T10:30:45Z");
    }

    #[test]
    fn test_rfc3339_nanos_format() {
        let result = TimestampFormat::Rfc3339Nanos.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "2025-01-08T10:30:45.123456000Z");
    }

    #[test]
    fn test_iso8601_millis_format() {
        let result = TimestampFormat::Iso8601Millis.format(&fixed_datetime()).unwrap();
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_unix_formats() {
        let secs: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .unwrap()
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .unwrap()
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(millis / 1000, secs);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()).unwrap(), "2025/01/08 10:30");
    }

    #[test]
    fn test_json_value_keeps_numeric_formats() {
        let value = TimestampFormat::Unix.to_json_value(&fixed_datetime()).unwrap();
        assert!(value.is_number());

        let value = TimestampFormat::Rfc3339.to_json_value(&fixed_datetime()).unwrap();
        assert_eq!(value, "2025-01-08T10:30:45Z");
    }

    #[test]
    fn test_unknown_specifier_is_an_error() {
        let format = TimestampFormat::Custom("%Q".to_string());
        match format.format(&fixed_datetime()) {
            Err(LoggerError::Formatter { format_type, message }) => {
                assert_eq!(format_type, "timestamp");
                assert!(message.contains("%Q"), "{}", message);
            }
            other => panic!("expected formatter error, got {:?}", other),
        }
        assert!(format.to_json_value(&fixed_datetime()).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TimestampFormat::Rfc3339.validate().is_ok());
        assert!(TimestampFormat::Custom("%Y-%m-%d %H:%M".to_string()).validate().is_ok());
        assert!(TimestampFormat::Custom("%Y %Q".to_string()).validate().is_err());
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimestampFormat::Rfc3339.is_numeric());
        assert!(TimestampFormat::Unix.is_numeric());
        assert!(TimestampFormat::UnixMillis.is_numeric());
        assert!(!TimestampFormat::Custom("%Y".to_string()).is_numeric());
    }

    #[test]
    fn test_deserialization() {
        let format: TimestampFormat =
            serde_json::from_str("\"Rfc3339\"").expect("deserialize Rfc3339");
        assert_eq!(format, TimestampFormat::Rfc3339);

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
