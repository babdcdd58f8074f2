//! Writer that discards everything

use crate::core::{Record, Result, Writer};

/// Discards every record
///
/// Useful for benchmarks and for switching output off without touching
/// call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl Writer for NullWriter {
    fn write(&self, _record: &Record) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
