//! Timestamp formatting for rendered records
//!
//! The default is RFC 3339 in UTC padded to exactly three fractional digits,
//! e.g. `2025-01-08T10:30:45.120Z`, used by both the text and JSON renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options for writers
///
/// # Examples
///
/// ```
/// use structured_logger_system::TimestampFormat;
/// use chrono::Utc;
///
/// let timestamp = TimestampFormat::PaddedMillis.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with milliseconds always padded to three digits: `2025-01-08T10:30:45.100Z`
    #[default]
    PaddedMillis,

    /// RFC 3339 with microseconds: `2025-01-08T10:30:45.123456Z`
    ///
    /// Provides higher precision for ordering concurrent log entries.
    Micros,

    /// Unix timestamp in milliseconds: `1736332245123`
    ///
    /// Emitted as a JSON number by the JSON writer.
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use structured_logger_system::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::PaddedMillis => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Format for JSON output; numeric formats become JSON numbers
    #[must_use]
    pub fn to_json_value(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}
