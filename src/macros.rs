//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The first argument
//! is anything with `log`/`debug`/`info` terminals: a [`Logger`](crate::Logger)
//! or a [`Message`](crate::Message) built from one.
//!
//! # Examples
//!
//! ```
//! use structured_logger_system::prelude::*;
//! use structured_logger_system::{fields, info, log};
//!
//! let logger = Logger::builder().writer(NullWriter).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! log!(logger, "Server listening on port {}", port);
//!
//! // Through a configured message
//! log!(logger.with(fields! { "user_id" => 42 }), "User {} logged in", "ana");
//! ```

/// Log a formatted message.
///
/// # Examples
///
/// ```
/// # use structured_logger_system::prelude::*;
/// # let logger = Logger::builder().writer(NullWriter).build();
/// use structured_logger_system::log;
/// log!(logger, "Simple message");
/// log!(logger.error("timeout"), "Request {} failed", 7);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $($arg:tt)+) => {
        $target.log(format!($($arg)+))
    };
}

/// Log a formatted debug message (verbosity at least 1).
///
/// # Examples
///
/// ```
/// # use structured_logger_system::prelude::*;
/// # let logger = Logger::builder().writer(NullWriter).verbosity(3).build();
/// use structured_logger_system::debug;
/// debug!(logger, "Debug information");
/// debug!(logger.v(3), "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $target.debug(format!($($arg)+))
    };
}

/// Log a formatted message at verbosity 0.
///
/// # Examples
///
/// ```
/// # use structured_logger_system::prelude::*;
/// # let logger = Logger::builder().writer(NullWriter).build();
/// use structured_logger_system::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $target.info(format!($($arg)+))
    };
}

/// Build a [`Fields`](crate::Fields) mapping.
///
/// # Examples
///
/// ```
/// use structured_logger_system::fields;
///
/// let fields = fields! { "id" => "B8012423573231", "health" => 97 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert($key, $value); )+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::test_support::CaptureWriter;
    use crate::core::{ContextRegistry, FieldValue, Logger};
    use std::sync::Arc;

    fn capture_logger() -> (Logger, Arc<CaptureWriter>) {
        let writer = Arc::new(CaptureWriter::default());
        let logger = Logger::builder()
            .shared_writer(writer.clone())
            .verbosity(2)
            .context_registry(Arc::new(ContextRegistry::new()))
            .build();
        (logger, writer)
    }

    #[test]
    fn test_log_macro() {
        let (logger, writer) = capture_logger();
        log!(logger, "Test message");
        log!(logger, "Formatted: {}", 42);

        let records = writer.records();
        assert_eq!(records[0].message, "Test message");
        assert_eq!(records[1].message, "Formatted: 42");
    }

    #[test]
    fn test_debug_macro() {
        let (logger, writer) = capture_logger();
        debug!(logger, "Debug message");
        debug!(logger.v(2), "Count: {}", 5);
        debug!(logger.v(3), "too verbose");

        let records = writer.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].verbosity, 1);
        assert_eq!(records[1].verbosity, 2);
    }

    #[test]
    fn test_info_macro() {
        let (logger, writer) = capture_logger();
        info!(logger, "Items: {}", 100);
        assert_eq!(writer.records()[0].verbosity, 0);
    }

    #[test]
    fn test_macro_reports_invocation_line() {
        let (logger, writer) = capture_logger();
        let line = line!() + 1;
        log!(logger, "here");

        let location = writer.records()[0].location.clone().unwrap();
        assert_eq!(location.file, "macros.rs");
        assert_eq!(location.line, line);
    }

    #[test]
    fn test_fields_macro() {
        let empty = fields! {};
        assert!(empty.is_empty());

        let fields = fields! {
            "name" => "hello",
            "health" => 97,
            "ok" => true,
        };
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("health"), Some(&FieldValue::Int(97)));
    }
}
