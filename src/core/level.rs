//! Level selection for finalized records

use std::fmt;

/// Rendered level of a record
///
/// Derived from the record, never configured: verbosity above zero always
/// renders as debug, otherwise an attached error renders as error, otherwise info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Debug(u8),
    Info,
    Error,
}

impl Level {
    /// Select the level for a record with the given verbosity and error state
    #[must_use]
    pub fn select(verbosity: u8, has_error: bool) -> Self {
        if verbosity > 0 {
            Level::Debug(verbosity)
        } else if has_error {
            Level::Error
        } else {
            Level::Info
        }
    }

    /// Short tag for text output: `INF`, `ERR`, or `DBG [001]`..`DBG [255]`
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Level::Debug(v) => format!("DBG [{:03}]", v),
            Level::Info => "INF".to_string(),
            Level::Error => "ERR".to_string(),
        }
    }

    /// Level name for structured output
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug(_) => "debug",
            Level::Info => "info",
            Level::Error => "error",
        }
    }

    /// Verbosity carried by debug records
    pub fn verbosity(&self) -> Option<u8> {
        match self {
            Level::Debug(v) => Some(*v),
            _ => None,
        }
    }

    #[cfg(feature = "color")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug(_) => Magenta,
            Level::Info => Green,
            Level::Error => Red,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
