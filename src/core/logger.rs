//! Logger: the shared configuration every message is dispatched through
//!
//! A `Logger` owns the current writer, the verbosity threshold and the
//! source-reporting flag behind one `RwLock`. The lock is held only to copy
//! or replace those values, never while a writer runs.

use super::{
    context::{Context, ContextRegistry},
    error::LoggerError,
    fields::Fields,
    message::Message,
    metrics::LoggerMetrics,
    writer::Writer,
};
use crate::writers::TextWriter;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

/// Callback invoked when a writer fails; replaces the stderr report
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

struct LoggerConfig {
    writer: Arc<dyn Writer>,
    verbosity: u8,
    include_source: bool,
}

/// Configuration copied out of the lock for one dispatch
pub(crate) struct ConfigSnapshot {
    pub(crate) writer: Arc<dyn Writer>,
    pub(crate) verbosity: u8,
    pub(crate) include_source: bool,
}

pub struct Logger {
    config: RwLock<LoggerConfig>,
    contexts: Arc<ContextRegistry>,
    /// Metrics for observability (dispatched, filtered, failed writes)
    metrics: LoggerMetrics,
    on_write_error: Option<ErrorCallback>,
}

impl Logger {
    /// Text output to stdout, verbosity 0, source reporting on
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use structured_logger_system::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .writer(JsonWriter::stdout())
    ///     .verbosity(2)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Replace the writer; affects records dispatched from now on
    pub fn set_writer<W: Writer + 'static>(&self, writer: W) {
        self.set_shared_writer(Arc::new(writer));
    }

    pub fn set_shared_writer(&self, writer: Arc<dyn Writer>) {
        self.config.write().writer = writer;
    }

    /// Current writer
    pub fn writer(&self) -> Arc<dyn Writer> {
        Arc::clone(&self.config.read().writer)
    }

    /// Set the verbosity threshold; 0 disables debug output
    pub fn set_verbosity(&self, verbosity: u8) {
        self.config.write().verbosity = verbosity;
    }

    pub fn verbosity(&self) -> u8 {
        self.config.read().verbosity
    }

    /// Enable or disable reporting the package, file and line of each record
    pub fn enable_source(&self, enabled: bool) {
        self.config.write().include_source = enabled;
    }

    pub fn source_enabled(&self) -> bool {
        self.config.read().include_source
    }

    /// Registry run against every message that carries a context
    pub fn context_registry(&self) -> &ContextRegistry {
        &self.contexts
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use structured_logger_system::{Logger, NullWriter};
    ///
    /// let logger = Logger::builder().writer(NullWriter).build();
    /// logger.log("hello");
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.dispatched(), 1);
    /// assert_eq!(metrics.write_failures(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> super::Result<()> {
        self.writer().flush()
    }

    pub(crate) fn snapshot(&self) -> ConfigSnapshot {
        let config = self.config.read();
        ConfigSnapshot {
            writer: Arc::clone(&config.writer),
            verbosity: config.verbosity,
            include_source: config.include_source,
        }
    }

    /// Run the context registry against `ctx`, adding to `fields`
    ///
    /// A panicking extraction function is reported like a writer failure.
    /// Fields added before the panic are kept.
    pub(crate) fn apply_context(&self, ctx: Option<&Context>, fields: &mut Fields) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.contexts.run(ctx, fields)
        }));

        if let Err(panic_info) = result {
            let err = LoggerError::context_panicked(panic_message(panic_info.as_ref()));
            match &self.on_write_error {
                Some(callback) => callback(&err),
                None => eprintln!("[LOGGER ERROR] Context extraction failed: {}", err),
            }
        }
    }

    /// Hand a finalized record to `writer`
    ///
    /// Never fails: errors and panics from the writer are reported to the
    /// error callback (stderr by default) and discarded.
    pub(crate) fn dispatch(&self, writer: &Arc<dyn Writer>, record: &super::Record) {
        self.metrics.record_dispatched();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            writer.write(record)
        }));

        let err = match result {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(panic_info) => {
                LoggerError::writer_panicked(writer.name(), panic_message(panic_info.as_ref()))
            }
        };

        self.metrics.record_write_failure();
        match &self.on_write_error {
            Some(callback) => callback(&err),
            None => eprintln!("[LOGGER ERROR] Writer '{}' failed: {}", writer.name(), err),
        }
    }

    /// Start a message at the caller's location
    #[track_caller]
    pub fn message(&self) -> Message<'_> {
        Message::new(self)
    }

    /// Start a message with the given verbosity
    #[track_caller]
    pub fn v(&self, verbosity: u8) -> Message<'_> {
        Message::new(self).v(verbosity)
    }

    /// Start a message with an attached error
    #[track_caller]
    pub fn error(&self, err: impl fmt::Display) -> Message<'_> {
        Message::new(self).error(err)
    }

    /// Start a message with the given fields
    #[track_caller]
    pub fn with(&self, fields: Fields) -> Message<'_> {
        Message::new(self).with(fields)
    }

    /// Start a message with the given fields
    #[deprecated(since = "0.1.0", note = "Use `with` instead")]
    #[track_caller]
    pub fn with_fields(&self, fields: Fields) -> Message<'_> {
        Message::new(self).with(fields)
    }

    /// Start a message carrying a context
    #[track_caller]
    pub fn context(&self, ctx: Context) -> Message<'_> {
        Message::new(self).context(ctx)
    }

    /// Start a message reported at `location` instead of the caller
    #[track_caller]
    pub fn source(&self, location: &'static Location<'static>) -> Message<'_> {
        Message::new(self).source(location)
    }

    #[track_caller]
    pub fn log(&self, text: impl Into<String>) {
        Message::new(self).log(text);
    }

    #[track_caller]
    pub fn debug(&self, text: impl Into<String>) {
        Message::new(self).debug(text);
    }

    #[track_caller]
    pub fn info(&self, text: impl Into<String>) {
        Message::new(self).info(text);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config.read();
        f.debug_struct("Logger")
            .field("writer", &config.writer.name())
            .field("verbosity", &config.verbosity)
            .field("include_source", &config.include_source)
            .field("metrics", &self.metrics)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// The process-wide logger behind the crate-level functions
pub fn default_logger() -> &'static Logger {
    static DEFAULT: OnceLock<Logger> = OnceLock::new();
    DEFAULT.get_or_init(Logger::new)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use structured_logger_system::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .writer(TextWriter::stderr())
///     .verbosity(1)
///     .include_source(false)
///     .on_write_error(Arc::new(|err| {
///         eprintln!("ALERT: log write failed: {}", err);
///     }))
///     .build();
/// ```
pub struct LoggerBuilder {
    writer: Option<Arc<dyn Writer>>,
    verbosity: u8,
    include_source: bool,
    contexts: Option<Arc<ContextRegistry>>,
    on_write_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            writer: None,
            verbosity: 0,
            include_source: true,
            contexts: None,
            on_write_error: None,
        }
    }

    /// Set the writer (default: text to stdout)
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Writer + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    /// Set a writer that is also held elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_writer(mut self, writer: Arc<dyn Writer>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Set the verbosity threshold (default: 0)
    #[must_use = "builder methods return a new value"]
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Report package, file and line (default: true)
    #[must_use = "builder methods return a new value"]
    pub fn include_source(mut self, enabled: bool) -> Self {
        self.include_source = enabled;
        self
    }

    /// Use a private context registry instead of the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn context_registry(mut self, registry: Arc<ContextRegistry>) -> Self {
        self.contexts = Some(registry);
        self
    }

    /// Set a callback for writer failures
    ///
    /// Without one, failures are reported on stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_write_error(mut self, callback: ErrorCallback) -> Self {
        self.on_write_error = Some(callback);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let writer = self
            .writer
            .unwrap_or_else(|| Arc::new(TextWriter::stdout()));
        let contexts = self
            .contexts
            .unwrap_or_else(|| Arc::clone(ContextRegistry::global()));

        Logger {
            config: RwLock::new(LoggerConfig {
                writer,
                verbosity: self.verbosity,
                include_source: self.include_source,
            }),
            contexts,
            metrics: LoggerMetrics::new(),
            on_write_error: self.on_write_error,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::CaptureWriter;
    use crate::core::{Record, Result};
    use crate::writers::NullWriter;
    use parking_lot::Mutex;

    struct FailingWriter;

    impl Writer for FailingWriter {
        fn write(&self, _record: &Record) -> Result<()> {
            Err(LoggerError::writer("disk on fire"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingWriter;

    impl Writer for PanickingWriter {
        fn write(&self, _record: &Record) -> Result<()> {
            panic!("renderer exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn error_sink() -> (ErrorCallback, Arc<Mutex<Vec<String>>>) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_clone = Arc::clone(&errors);
        let callback: ErrorCallback = Arc::new(move |err| {
            errors_clone.lock().push(err.to_string());
        });
        (callback, errors)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        assert_eq!(logger.verbosity(), 0);
        assert!(logger.source_enabled());
        assert_eq!(logger.writer().name(), "text");
    }

    #[test]
    fn test_builder_full_configuration() {
        let logger = Logger::builder()
            .writer(NullWriter)
            .verbosity(3)
            .include_source(false)
            .build();

        assert_eq!(logger.verbosity(), 3);
        assert!(!logger.source_enabled());
        assert_eq!(logger.writer().name(), "null");
    }

    #[test]
    fn test_setters_apply_to_later_records() {
        let first = Arc::new(CaptureWriter::default());
        let second = Arc::new(CaptureWriter::default());
        let logger = Logger::builder().shared_writer(first.clone()).build();

        logger.v(1).log("dropped");
        logger.set_verbosity(1);
        logger.v(1).log("kept");
        logger.set_shared_writer(second.clone());
        logger.log("moved");

        assert_eq!(first.records().len(), 1);
        assert_eq!(second.records().len(), 1);
        assert_eq!(second.records()[0].message, "moved");
    }

    #[test]
    fn test_write_error_is_reported_not_raised() {
        let (callback, errors) = error_sink();
        let logger = Logger::builder()
            .writer(FailingWriter)
            .on_write_error(callback)
            .build();

        logger.log("this write fails");

        assert_eq!(logger.metrics().write_failures(), 1);
        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("disk on fire"));
    }

    #[test]
    fn test_writer_panic_is_isolated() {
        let (callback, errors) = error_sink();
        let logger = Logger::builder()
            .writer(PanickingWriter)
            .on_write_error(callback)
            .build();

        logger.log("boom");
        logger.log("boom again");

        assert_eq!(logger.metrics().dispatched(), 2);
        assert_eq!(logger.metrics().write_failures(), 2);
        assert!(errors.lock()[0].contains("renderer exploded"));
    }

    #[test]
    fn test_context_extractor_panic_is_isolated() {
        struct Tenant(&'static str);

        let registry = Arc::new(ContextRegistry::new());
        registry.register(|ctx, fields| {
            if let Some(tenant) = ctx.value::<Tenant>() {
                fields.insert("tenant", tenant.0);
            }
        });
        registry.register(|_ctx, _fields| panic!("extractor exploded"));

        let (callback, errors) = error_sink();
        let writer = Arc::new(CaptureWriter::default());
        let logger = Logger::builder()
            .shared_writer(writer.clone())
            .context_registry(registry)
            .on_write_error(callback)
            .build();

        let ctx = Context::new().with_value(Tenant("acme"));
        logger.context(ctx.clone()).log("first");
        logger.context(ctx).log("second");

        let records = writer.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert!(records[0].fields.contains_key("tenant"));
        assert_eq!(logger.metrics().dispatched(), 2);
        assert_eq!(logger.metrics().write_failures(), 0);

        let errors = errors.lock();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("extractor exploded"));
    }

    #[test]
    fn test_entry_points() {
        let writer = Arc::new(CaptureWriter::default());
        let logger = Logger::builder()
            .shared_writer(writer.clone())
            .verbosity(1)
            .build();

        logger.log("log");
        logger.debug("debug");
        logger.info("info");
        logger.error("bad").log("error");
        logger.with(Fields::new().with_field("k", 1)).log("with");
        logger.v(1).log("v");

        let records = writer.records();
        assert_eq!(records.len(), 6);
        assert_eq!(records[1].verbosity, 1);
        assert_eq!(records[3].error.as_deref(), Some("bad"));
        assert!(records[4].fields.contains_key("k"));
    }

    #[test]
    fn test_default_logger_is_singleton() {
        let a = default_logger() as *const Logger;
        let b = default_logger() as *const Logger;
        assert_eq!(a, b);
    }
}
