//! Core logger types and traits

pub mod context;
pub mod error;
pub mod field_value;
pub mod fields;
pub mod level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod record;
pub mod timestamp;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{Context, ContextFn, ContextRegistry};
pub use error::{LoggerError, Result};
pub use field_value::{cleanup, quote, unquote, FieldValue};
pub use fields::Fields;
pub use level::Level;
pub use logger::{default_logger, ErrorCallback, Logger, LoggerBuilder};
pub use message::Message;
pub use metrics::{LoggerMetrics, SinkMetrics};
pub use record::{Record, SourceLocation};
pub use timestamp::TimestampFormat;
pub use writer::Writer;
