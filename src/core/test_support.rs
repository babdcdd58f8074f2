//! Writers and buffers for unit tests

use super::{Record, Result, Writer};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Keeps every record it is given
#[derive(Default)]
pub(crate) struct CaptureWriter {
    records: Mutex<Vec<Record>>,
}

impl CaptureWriter {
    pub(crate) fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }
}

impl Writer for CaptureWriter {
    fn write(&self, record: &Record) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// In-memory `io::Write` whose contents stay readable after being moved into a writer
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
