//! Plain text writer and the line layout shared with the color writer

use crate::core::{quote, Level, LoggerError, Record, Result, TimestampFormat, Writer};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Semantic role of a piece of a rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    Timestamp,
    Level(Level),
    Message,
    Location,
    Field,
}

/// Render one record as a single line
///
/// Layout: `<ts> <LEVEL>[ <message>][ (<pkg>/<file>:<line>)][, err="<msg>"][, key=value]*\n`
/// with fields in ascending key order. `paint` decorates each segment and
/// must return the text unchanged apart from escape codes.
pub(crate) fn render_line(
    record: &Record,
    timestamp_format: &TimestampFormat,
    paint: &dyn Fn(Segment, &str) -> String,
) -> String {
    let mut out = String::with_capacity(128);

    out.push_str(&paint(
        Segment::Timestamp,
        &timestamp_format.format(&record.timestamp),
    ));

    let level = record.level();
    out.push(' ');
    out.push_str(&paint(Segment::Level(level), &level.tag()));

    let message = sanitize(record.trimmed_message());
    if !message.is_empty() {
        out.push(' ');
        out.push_str(&paint(Segment::Message, &message));
    }

    if let Some(ref location) = record.location {
        out.push(' ');
        out.push_str(&paint(
            Segment::Location,
            &format!("({}/{}:{})", location.package, location.file, location.line),
        ));
    }

    if let Some(ref err) = record.error {
        out.push_str(&paint(Segment::Field, &format!(", err={}", quote(err))));
    }

    for (key, value) in record.fields.encoded() {
        out.push_str(&paint(Segment::Field, &format!(", {}={}", key, value)));
    }

    out.push('\n');
    out
}

/// Escape line breaks so one record always stays on one line
fn sanitize(message: &str) -> String {
    message.replace('\n', "\\n").replace('\r', "\\r")
}

/// Black-and-white text output
///
/// # Example
///
/// ```
/// use structured_logger_system::{Logger, TextWriter};
///
/// let logger = Logger::builder().writer(TextWriter::new(std::io::sink())).build();
/// logger.log("Server started");
/// ```
pub struct TextWriter {
    out: Mutex<Box<dyn Write + Send>>,
    timestamp_format: TimestampFormat,
}

impl TextWriter {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Append to a file, creating it if needed
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

    /// Set the timestamp format for this writer
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render a record without writing it
    pub fn render(&self, record: &Record) -> String {
        render_line(record, &self.timestamp_format, &|_, text| text.to_string())
    }
}

impl Writer for TextWriter {
    fn write(&self, record: &Record) -> Result<()> {
        let line = self.render(record);

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
        "text"
    }
}
