//! JSON writer for structured logging
//!
//! Writes each record as a single-line JSON object (newline-delimited JSON),
//! compatible with log aggregation tools like ELK, Loki, Splunk.

use crate::core::{LoggerError, Record, Result, TimestampFormat, Writer};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Key names used for the record's own values
///
/// Caller fields are merged after these, so a caller field with a reserved
/// name replaces the record's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonKeys {
    pub timestamp: String,
    pub message: String,
    pub level: String,
    pub verbosity: String,
    pub package: String,
    pub source: String,
    pub line: String,
    pub error: String,
    pub host: String,
}

impl JsonKeys {
    /// `ts`, `msg`, `level`, `v`, `pkg`, `src`, `line`, `err`, `host`
    pub fn standard() -> Self {
        Self {
            timestamp: "ts".into(),
            message: "msg".into(),
            level: "level".into(),
            verbosity: "v".into(),
            package: "pkg".into(),
            source: "src".into(),
            line: "line".into(),
            error: "err".into(),
            host: "host".into(),
        }
    }

    /// Elastic Common Schema names: `@timestamp`, `message`, `log.level`, ...
    pub fn ecs() -> Self {
        Self {
            timestamp: "@timestamp".into(),
            message: "message".into(),
            level: "log.level".into(),
            verbosity: "verbosity".into(),
            package: "package.name".into(),
            source: "log.origin.file.name".into(),
            line: "log.origin.file.line".into(),
            error: "error.message".into(),
            host: "host.name".into(),
        }
    }
}

impl Default for JsonKeys {
    fn default() -> Self {
        Self::standard()
    }
}

/// Newline-delimited JSON output
///
/// # Example
///
/// ```
/// use structured_logger_system::{JsonWriter, Logger};
///
/// let writer = JsonWriter::new(std::io::sink()).with_host("api-1");
/// let logger = Logger::builder().writer(writer).build();
/// logger.error("connection reset").log("upstream failed");
/// ```
pub struct JsonWriter {
    out: Mutex<Box<dyn Write + Send>>,
    keys: JsonKeys,
    host: Option<String>,
    timestamp_format: TimestampFormat,
}

impl JsonWriter {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            keys: JsonKeys::standard(),
            host: None,
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Append JSON lines to a file, creating it if needed
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;
        Ok(Self::new(BufWriter::new(file)))
    }

    #[must_use]
    pub fn with_keys(mut self, keys: JsonKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Use Elastic Common Schema key names
    #[must_use]
    pub fn ecs(self) -> Self {
        self.with_keys(JsonKeys::ecs())
    }

    /// Rename only the timestamp key, e.g. to `@timestamp`
    #[must_use]
    pub fn with_timestamp_key(mut self, key: impl Into<String>) -> Self {
        self.keys.timestamp = key.into();
        self
    }

    /// Include a host name in every record
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Build the JSON object for a record
    pub fn to_json(&self, record: &Record) -> serde_json::Value {
        use serde_json::Value;

        let keys = &self.keys;
        let mut obj = serde_json::Map::new();

        obj.insert(
            keys.timestamp.clone(),
            self.timestamp_format.to_json_value(&record.timestamp),
        );

        if let Some(ref host) = self.host {
            obj.insert(keys.host.clone(), Value::String(host.clone()));
        }

        let level = record.level();
        obj.insert(keys.level.clone(), Value::String(level.as_str().to_string()));
        if let Some(verbosity) = level.verbosity() {
            obj.insert(keys.verbosity.clone(), Value::Number(verbosity.into()));
        }

        let message = record.trimmed_message();
        if !message.is_empty() {
            obj.insert(keys.message.clone(), Value::String(message.to_string()));
        }

        if let Some(ref location) = record.location {
            obj.insert(keys.package.clone(), Value::String(location.package.clone()));
            obj.insert(keys.source.clone(), Value::String(location.file.clone()));
            obj.insert(keys.line.clone(), Value::Number(location.line.into()));
        }

        if let Some(ref err) = record.error {
            obj.insert(keys.error.clone(), Value::String(err.clone()));
        }

        for (key, value) in &record.fields {
            if let Some(value) = value.to_json_value() {
                obj.insert(key.clone(), value);
            }
        }

        Value::Object(obj)
    }

    /// Render a record as one JSON line, including the trailing newline
    pub fn render(&self, record: &Record) -> Result<String> {
        let mut line = serde_json::to_string(&self.to_json(record))?;
        line.push('\n');
        Ok(line)
    }
}

impl Writer for JsonWriter {
    fn write(&self, record: &Record) -> Result<()> {
        let line = self.render(record)?;

        let mut out = self.out.lock();
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.out.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}
