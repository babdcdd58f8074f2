//! Writer trait for log output destinations

use super::{error::Result, record::Record};

/// Renders finalized records to a destination
///
/// Implementations are shared between threads and must serialize their own
/// output: one record's bytes never interleave with another's.
pub trait Writer: Send + Sync {
    fn write(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
