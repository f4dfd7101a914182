use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Plain 24-bit color, kept free of any rendering crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const WARNING_COLOR: Rgb = Rgb(0xFF, 0xD7, 0x00); // gold
pub const ERROR_COLOR: Rgb = Rgb(0xFF, 0x7F, 0x50); // coral
pub const CRITICAL_COLOR: Rgb = Rgb(0xFF, 0x00, 0x00); // red

/// Log record importance, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Display tag for this severity. Only WARNING and above are styled.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Severity::Warning => Some(Tag::Warning),
            Severity::Error => Some(Tag::Error),
            Severity::Critical => Some(Tag::Critical),
            Severity::Debug | Severity::Info => None,
        }
    }

    /// Map a tracing level. `critical` comes from an event field, since
    /// tracing itself stops at ERROR.
    pub fn from_level(level: &Level, critical: bool) -> Self {
        match *level {
            Level::ERROR if critical => Severity::Critical,
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Styling tag attached to a run of console text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Warning,
    Error,
    Critical,
}

impl Tag {
    pub fn color(&self) -> Rgb {
        match self {
            Tag::Warning => WARNING_COLOR,
            Tag::Error => ERROR_COLOR,
            Tag::Critical => CRITICAL_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_warning_and_above_are_tagged() {
        assert_eq!(Severity::Debug.tag(), None);
        assert_eq!(Severity::Info.tag(), None);
        assert_eq!(Severity::Warning.tag().map(|t| t.color()), Some(WARNING_COLOR));
        assert_eq!(Severity::Error.tag().map(|t| t.color()), Some(ERROR_COLOR));
        assert_eq!(Severity::Critical.tag().map(|t| t.color()), Some(CRITICAL_COLOR));
    }

    #[test]
    fn test_from_level() {
        assert_eq!(Severity::from_level(&Level::ERROR, true), Severity::Critical);
        assert_eq!(Severity::from_level(&Level::ERROR, false), Severity::Error);
        assert_eq!(Severity::from_level(&Level::WARN, true), Severity::Warning);
        assert_eq!(Severity::from_level(&Level::TRACE, false), Severity::Debug);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Critical));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_color_displays_as_hex() {
        assert_eq!(Rgb(0x2E, 0x8B, 0x57).to_string(), "#2E8B57");
        assert_eq!(Rgb(0xFF, 0xFA, 0xF0).to_string(), "#FFFAF0");
    }
}
