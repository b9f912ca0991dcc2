//! Timestamp formatting for written log lines
//!
//! Writers stamp every line with the local time before the message. The
//! default matches the classic `YYYY/MM/DD HH:MM:SS` layout of standard
//! process loggers.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write as _};

/// Timestamp layout applied by a writer
///
/// # Examples
///
/// ```
/// use rust_fanout_logger::TimestampFormat;
///
/// assert!(TimestampFormat::None.now().is_none());
/// assert!(TimestampFormat::Standard.now().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// No timestamp at all
    None,

    /// Date and time: `2025/01/08 10:30:45`
    #[default]
    Standard,

    /// Date and time with microseconds: `2025/01/08 10:30:45.123456`
    StandardMicros,

    /// RFC 3339 with offset: `2025-01-08T10:30:45.123+01:00`
    Rfc3339,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_fanout_logger::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format `datetime`, or `None` when timestamps are disabled
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimestampFormat::None => None,
            TimestampFormat::Standard => Some(datetime.format("%Y/%m/%d %H:%M:%S").to_string()),
            TimestampFormat::StandardMicros => {
                Some(datetime.format("%Y/%m/%d %H:%M:%S%.6f").to_string())
            }
            TimestampFormat::Rfc3339 => Some(datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => Some(out),
                    Err(_) => Some(format!("<invalid timestamp format {:?}>", format_str)),
                }
            }
        }
    }

    /// Reject custom formats containing unknown strftime specifiers
    pub fn validate(&self) -> Result<(), String> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(format!("invalid strftime format {:?}", format_str));
            }
        }
        Ok(())
    }

    /// Format the current local time
    #[must_use]
    pub fn now(&self) -> Option<String> {
        self.format(&Local::now())
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, TimestampFormat::None)
    }
}
