//! Severity definitions
//!
//! Eight syslog-style levels, ordered from most severe (`Emergency`, 0) to
//! least severe (`Debug`, 7).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    #[default]
    Info = 6,
    Debug = 7,
}

impl Severity {
    /// All levels, most severe first.
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// Canonical mixed-case name, e.g. `"Warning"`.
    pub fn render(&self) -> &'static str {
        match self {
            Severity::Emergency => "Emergency",
            Severity::Alert => "Alert",
            Severity::Critical => "Critical",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Notice => "Notice",
            Severity::Info => "Info",
            Severity::Debug => "Debug",
        }
    }

    /// Uppercase name as it appears in rendered log lines, e.g. `"WARNING"`.
    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Render a raw numeric level. Out-of-range values render as `""`.
    pub fn render_code(code: u8) -> &'static str {
        Severity::from_code(code).map_or("", |s| s.render())
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Severity::ALL.get(usize::from(code)).copied()
    }

    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Whether a destination with this threshold accepts a message at
    /// `message` severity: the message must be at least as severe.
    #[inline]
    pub fn admits(&self, message: Severity) -> bool {
        message <= *self
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.render())
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    // `Self::Error` would be ambiguous with the `Error` variant
    fn try_from(code: u8) -> Result<Self, String> {
        Severity::from_code(code).ok_or_else(|| format!("Invalid severity code: {}", code))
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMERGENCY" | "EMERG" => Ok(Severity::Emergency),
            "ALERT" => Ok(Severity::Alert),
            "CRITICAL" | "CRIT" => Ok(Severity::Critical),
            "ERROR" | "ERR" => Ok(Severity::Error),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "NOTICE" => Ok(Severity::Notice),
            "INFO" | "INFORMATIONAL" => Ok(Severity::Info),
            "DEBUG" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_most_severe_first() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(Severity::Emergency.code(), 0);
        assert_eq!(Severity::Debug.code(), 7);
    }

    #[test]
    fn test_render_names() {
        assert_eq!(Severity::Emergency.render(), "Emergency");
        assert_eq!(Severity::Notice.render(), "Notice");
        assert_eq!(Severity::Debug.to_str(), "DEBUG");
        assert_eq!(Severity::render_code(4), "Warning");
        assert_eq!(Severity::render_code(8), "");
        assert_eq!(Severity::render_code(u8::MAX), "");
    }

    #[test]
    fn test_admits() {
        let threshold = Severity::Warning;
        assert!(threshold.admits(Severity::Emergency));
        assert!(threshold.admits(Severity::Warning));
        assert!(!threshold.admits(Severity::Notice));
        assert!(!threshold.admits(Severity::Debug));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("emerg".parse::<Severity>(), Ok(Severity::Emergency));
        assert_eq!("Crit".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_try_from_code() {
        assert_eq!(Severity::try_from(3u8), Ok(Severity::Error));
        assert_eq!(Severity::try_from(7u8), Ok(Severity::Debug));
        assert_eq!(
            Severity::try_from(9u8),
            Err("Invalid severity code: 9".to_string())
        );

        let converted: Result<Severity, String> = 0u8.try_into();
        assert_eq!(converted, Ok(Severity::Emergency));
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:<8}|", Severity::Info), "Info    |");
    }
}
