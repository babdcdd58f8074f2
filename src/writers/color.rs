//! Colorized text writer for terminals

use super::text::{render_line, Segment};
use crate::core::{Record, Result, TimestampFormat, Writer};
use colored::Colorize;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Text output with ANSI colors, meant for stdout or stderr during development
///
/// Same layout as [`TextWriter`](super::TextWriter); colors follow `colored`'s
/// terminal detection and `NO_COLOR`/`CLICOLOR_FORCE` handling.
pub struct ColorWriter {
    out: Mutex<Box<dyn Write + Send>>,
    timestamp_format: TimestampFormat,
}

impl ColorWriter {
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

    /// Set the timestamp format for this writer
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render a record without writing it
    pub fn render(&self, record: &Record) -> String {
        render_line(record, &self.timestamp_format, &paint)
    }
}

fn paint(segment: Segment, text: &str) -> String {
    match segment {
        Segment::Timestamp => text.cyan().dimmed().to_string(),
        Segment::Level(level) => text.color(level.color_code()).to_string(),
        Segment::Message => text.bright_white().to_string(),
        Segment::Location => text.cyan().to_string(),
        Segment::Field => text.white().dimmed().to_string(),
    }
}

impl Writer for ColorWriter {
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
        "color"
    }
}
