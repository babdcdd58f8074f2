//! # Structured Logger System
//!
//! Leveled, structured logging with a verbosity gate, pluggable writers and a
//! buffered TCP sink for central log collection.
//!
//! ## Features
//!
//! - **Immutable message builder**: every chained call returns a new value
//! - **Verbosity gate**: debug detail is dropped above the configured threshold
//! - **Call-site reporting**: package, file and line via `#[track_caller]`
//! - **Writers**: plain text, colored text, newline-delimited JSON (with an
//!   ECS key preset) and a discard writer
//! - **Context registry**: extraction functions that turn ambient values into fields
//! - **Network sink**: queued TCP forwarding with backpressure and per-send deadlines
//!
//! ## Example
//!
//! ```
//! use structured_logger_system::prelude::*;
//!
//! let logger = Logger::builder()
//!     .writer(TextWriter::stderr())
//!     .verbosity(2)
//!     .build();
//!
//! logger
//!     .with(Fields::new().with_field("id", "B8012423573231").with_field("health", 97))
//!     .log("Hello World");
//!
//! logger.v(2).debug("only rendered while verbosity >= 2");
//! logger.error("connection reset").log("upstream failed");
//! ```
//!
//! The functions at the crate root log through [`default_logger`], a
//! process-wide [`Logger`] writing text to stdout.

pub mod core;
pub mod macros;
pub mod writers;

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

pub mod prelude {
    pub use crate::core::{
        Context, ContextRegistry, FieldValue, Fields, Level, Logger, LoggerBuilder, LoggerError,
        Message, Record, Result, SourceLocation, TimestampFormat, Writer,
    };
    #[cfg(feature = "color")]
    pub use crate::writers::ColorWriter;
    #[cfg(feature = "network")]
    pub use crate::writers::NetworkSink;
    pub use crate::writers::{JsonKeys, JsonWriter, NullWriter, TextWriter};
}

pub use crate::core::{
    cleanup, default_logger, quote, unquote, Context, ContextFn, ContextRegistry, ErrorCallback,
    FieldValue, Fields, Level, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Message, Record,
    Result, SinkMetrics, SourceLocation, TimestampFormat, Writer,
};
#[cfg(feature = "color")]
pub use writers::ColorWriter;
#[cfg(feature = "network")]
pub use writers::{NetworkSink, NetworkSinkBuilder, SinkState};
pub use writers::{JsonKeys, JsonWriter, NullWriter, TextWriter};

/// Replace the default logger's writer
pub fn set_writer<W: Writer + 'static>(writer: W) {
    default_logger().set_writer(writer);
}

pub fn set_shared_writer(writer: Arc<dyn Writer>) {
    default_logger().set_shared_writer(writer);
}

/// Set the default logger's verbosity threshold
pub fn set_verbosity(verbosity: u8) {
    default_logger().set_verbosity(verbosity);
}

pub fn verbosity() -> u8 {
    default_logger().verbosity()
}

pub fn enable_source(enabled: bool) {
    default_logger().enable_source(enabled);
}

/// Register a context extraction function with the process-wide registry
///
/// ```
/// use structured_logger_system::{register, Context};
///
/// struct RequestId(String);
///
/// register(|ctx: &Context, fields| {
///     if let Some(id) = ctx.value::<RequestId>() {
///         fields.insert("request_id", id.0.as_str());
///     }
/// });
/// ```
pub fn register<F>(f: F)
where
    F: Fn(&Context, &mut Fields) + Send + Sync + 'static,
{
    ContextRegistry::global().register(f);
}

pub fn flush() -> Result<()> {
    default_logger().flush()
}

#[track_caller]
pub fn message() -> Message<'static> {
    default_logger().message()
}

#[track_caller]
pub fn v(verbosity: u8) -> Message<'static> {
    default_logger().v(verbosity)
}

#[track_caller]
pub fn error(err: impl fmt::Display) -> Message<'static> {
    default_logger().error(err)
}

#[track_caller]
pub fn with(fields: Fields) -> Message<'static> {
    default_logger().with(fields)
}

#[deprecated(since = "0.1.0", note = "Use `with` instead")]
#[track_caller]
pub fn with_fields(fields: Fields) -> Message<'static> {
    default_logger().with(fields)
}

#[track_caller]
pub fn context(ctx: Context) -> Message<'static> {
    default_logger().context(ctx)
}

/// Start a message reported at `location` instead of the caller
#[track_caller]
pub fn source(location: &'static Location<'static>) -> Message<'static> {
    default_logger().source(location)
}

#[track_caller]
pub fn log(text: impl Into<String>) {
    default_logger().log(text);
}

#[track_caller]
pub fn debug(text: impl Into<String>) {
    default_logger().debug(text);
}

#[track_caller]
pub fn info(text: impl Into<String>) {
    default_logger().info(text);
}
