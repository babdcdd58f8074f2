//! Immutable, chainable log message builder
//!
//! A [`Message`] is a value: every builder call consumes it and returns an
//! updated copy, so clones held elsewhere never observe later changes. The
//! chain ends in exactly one terminal call (`log`, `debug` or `info`) which
//! applies the verbosity gate and hands the finalized [`Record`] to the
//! logger's writer.
//!
//! # Example
//!
//! ```
//! use structured_logger_system::{Fields, Logger, NullWriter};
//!
//! let logger = Logger::builder().writer(NullWriter).verbosity(2).build();
//!
//! logger
//!     .v(2)
//!     .with(Fields::new().with_field("id", "B8012423573231").with_field("health", 97))
//!     .log("Hello World");
//! ```

use super::context::Context;
use super::field_value::FieldValue;
use super::fields::Fields;
use super::logger::Logger;
use super::record::{Record, SourceLocation};
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// One in-flight log record
#[derive(Clone)]
#[must_use = "a message is only written by a terminal call such as `log`"]
pub struct Message<'a> {
    logger: &'a Logger,
    timestamp: DateTime<Utc>,
    location: Option<&'static Location<'static>>,
    verbosity: u8,
    error: Option<String>,
    fields: Option<Fields>,
    context: Option<Context>,
}

impl<'a> Message<'a> {
    /// Start a message, capturing the current time and the caller's location
    #[track_caller]
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            timestamp: Utc::now(),
            location: Some(Location::caller()),
            verbosity: 0,
            error: None,
            fields: None,
            context: None,
        }
    }

    /// Set the verbosity; anything above zero is a debug message
    pub fn v(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Attach an error; its message is rendered as `err`
    pub fn error(mut self, err: impl fmt::Display) -> Self {
        self.error = Some(err.to_string());
        self
    }

    /// Replace the field mapping
    pub fn with(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Replace the field mapping
    #[deprecated(since = "0.1.0", note = "Use `with` instead")]
    pub fn with_fields(self, fields: Fields) -> Self {
        self.with(fields)
    }

    /// Add a single field, keeping any already attached
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields
            .get_or_insert_with(Fields::new)
            .insert(key, value);
        self
    }

    /// Attach a context; registered extraction functions run against it on output
    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Override the call site
    ///
    /// Middleware that logs on behalf of its caller marks its own entry point
    /// `#[track_caller]` and passes `Location::caller()` here.
    ///
    /// ```
    /// use std::panic::Location;
    /// use structured_logger_system::{Logger, NullWriter};
    ///
    /// #[track_caller]
    /// fn audit(logger: &Logger, what: &str) {
    ///     let caller = Location::caller();
    ///     logger.message().source(caller).log(what);
    /// }
    ///
    /// let logger = Logger::builder().writer(NullWriter).build();
    /// audit(&logger, "user saved");
    /// ```
    pub fn source(mut self, location: &'static Location<'static>) -> Self {
        self.location = Some(location);
        self
    }

    /// Drop call-site information from this message
    pub fn without_source(mut self) -> Self {
        self.location = None;
        self
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Resolved call site, if any
    pub fn location(&self) -> Option<SourceLocation> {
        self.location.map(SourceLocation::from_location)
    }

    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }

    /// Log the message
    ///
    /// With verbosity above the logger's threshold the message is dropped.
    /// Otherwise it renders as debug (verbosity > 0), error (error attached)
    /// or info.
    pub fn log(self, text: impl Into<String>) {
        self.emit(text.into());
    }

    /// Log as a debug message, raising verbosity to at least 1
    pub fn debug(mut self, text: impl Into<String>) {
        if self.verbosity < 1 {
            self.verbosity = 1;
        }
        self.emit(text.into());
    }

    /// Log at verbosity 0; never dropped by the verbosity gate
    pub fn info(mut self, text: impl Into<String>) {
        self.verbosity = 0;
        self.emit(text.into());
    }

    fn emit(self, text: String) {
        let config = self.logger.snapshot();

        if self.verbosity > 0 && self.verbosity > config.verbosity {
            self.logger.metrics().record_filtered();
            return;
        }

        let mut fields = self.fields.unwrap_or_default();
        self.logger.apply_context(self.context.as_ref(), &mut fields);

        let location = if config.include_source {
            self.location.map(SourceLocation::from_location)
        } else {
            None
        };

        let record = Record {
            timestamp: self.timestamp,
            verbosity: self.verbosity,
            message: text,
            error: self.error,
            location,
            fields,
        };

        self.logger.dispatch(&config.writer, &record);
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("timestamp", &self.timestamp)
            .field("location", &self.location)
            .field("verbosity", &self.verbosity)
            .field("error", &self.error)
            .field("fields", &self.fields)
            .field("context", &self.context)
            .finish()
    }
}
