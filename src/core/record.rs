//! Finalized log records and their call-site metadata

use super::fields::Fields;
use super::level::Level;
use chrono::{DateTime, Utc};
use std::panic::Location;
use std::path::Path;

/// Where a record was logged: package (parent directory), file basename, line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub package: String,
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(package: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            package: package.into(),
            file: file.into(),
            line,
        }
    }

    /// Resolve a compiler-provided caller location
    ///
    /// `src/core/message.rs:10` resolves to package `core`, file `message.rs`.
    pub fn from_location(location: &Location<'_>) -> Self {
        let path = Path::new(location.file());
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.file().to_string());
        let package = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            package,
            file,
            line: location.line(),
        }
    }
}

/// One finalized, read-only log entry handed to a [`Writer`](super::Writer)
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub verbosity: u8,
    pub message: String,
    pub error: Option<String>,
    pub location: Option<SourceLocation>,
    pub fields: Fields,
}

impl Record {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            verbosity: 0,
            message: message.into(),
            error: None,
            location: None,
            fields: Fields::new(),
        }
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Rendered level of this record
    pub fn level(&self) -> Level {
        Level::select(self.verbosity, self.error.is_some())
    }

    /// Message text with surrounding whitespace removed
    pub fn trimmed_message(&self) -> &str {
        self.message.trim()
    }
}
