//! Buffered TCP forwarder for remote log collectors
//!
//! A [`NetworkSink`] accepts rendered byte chunks, queues them, and ships
//! them over one persistent TCP connection from a dedicated sender thread.
//! It implements [`std::io::Write`], so it plugs in as the output of any
//! byte-oriented writer:
//!
//! ```no_run
//! use structured_logger_system::{JsonWriter, Logger, NetworkSink};
//! use std::time::Duration;
//!
//! let sink = NetworkSink::builder("logstash.internal:5000")
//!     .timeout(Duration::from_secs(2))
//!     .buffer(4096)
//!     .build();
//! sink.dial().expect("Failed to connect to log collector");
//!
//! let logger = Logger::builder()
//!     .writer(JsonWriter::new(sink.clone()).ecs())
//!     .build();
//! logger.log("shipped over TCP");
//!
//! sink.close().expect("Failed to drain log sink");
//! ```
//!
//! Lifecycle: `Unconnected` → [`dial`](NetworkSink::dial) → `Connected` →
//! [`close`](NetworkSink::close) → `Closed`. Closing drops the queue's sending
//! side and waits for the sender thread to drain what is already queued.
//! Failed sends are counted, reported on stderr and dropped; nothing is
//! retried and the sink never reconnects on its own.
//!
//! When the peer drops the connection the sender thread marks it `Broken`.
//! Writes are then refused until the caller dials again, which replaces the
//! dead connection. A closed sink may also be dialed again.

use crate::core::{LoggerError, Result, SinkMetrics};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use socket2::SockRef;
use std::fmt;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Per-send deadline and dial timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Queue capacity used when none is configured
pub const DEFAULT_BUFFER: usize = 1024;

/// Connection state of a [`NetworkSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Unconnected,
    Connected,
    /// The sender thread lost the connection; `dial` replaces it
    Broken,
    Closed,
}

enum Connection {
    Unconnected,
    Connected {
        sender: Sender<Vec<u8>>,
        worker: JoinHandle<()>,
        broken: Arc<AtomicBool>,
    },
    Closed,
}

struct Inner {
    address: String,
    timeout: Duration,
    /// `None` means unbounded
    buffer: Option<usize>,
    connection: Mutex<Connection>,
    metrics: Arc<SinkMetrics>,
}

/// Buffered, asynchronous TCP sink
///
/// Cloning is cheap; all clones share one queue and one connection.
#[derive(Clone)]
pub struct NetworkSink {
    inner: Arc<Inner>,
}

/// Builder for [`NetworkSink`]
#[derive(Debug, Clone)]
pub struct NetworkSinkBuilder {
    address: String,
    timeout: Duration,
    buffer: Option<usize>,
}

impl NetworkSinkBuilder {
    fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
            buffer: Some(DEFAULT_BUFFER),
        }
    }

    /// Deadline for dialing and for each send (default: 5 seconds)
    #[must_use = "builder methods return a new value"]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bounded queue of `capacity` chunks; producers block when it is full
    ///
    /// A capacity of 0 hands each chunk directly to the sender thread.
    #[must_use = "builder methods return a new value"]
    pub fn buffer(mut self, capacity: usize) -> Self {
        self.buffer = Some(capacity);
        self
    }

    /// Queue without a capacity limit; producers never block
    #[must_use = "builder methods return a new value"]
    pub fn unbounded(mut self) -> Self {
        self.buffer = None;
        self
    }

    pub fn build(self) -> NetworkSink {
        NetworkSink {
            inner: Arc::new(Inner {
                address: self.address,
                timeout: self.timeout,
                buffer: self.buffer,
                connection: Mutex::new(Connection::Unconnected),
                metrics: Arc::new(SinkMetrics::new()),
            }),
        }
    }
}

impl NetworkSink {
    /// Start configuring a sink for `address` (`host:port`)
    pub fn builder(address: impl Into<String>) -> NetworkSinkBuilder {
        NetworkSinkBuilder::new(address)
    }

    /// Sink with default timeout and buffer
    pub fn new(address: impl Into<String>) -> Self {
        Self::builder(address).build()
    }

    pub fn address(&self) -> &str {
        &self.inner.address
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.inner.metrics
    }

    pub fn state(&self) -> SinkState {
        match *self.inner.connection.lock() {
            Connection::Unconnected => SinkState::Unconnected,
            Connection::Connected { ref broken, .. } if broken.load(Ordering::Acquire) => {
                SinkState::Broken
            }
            Connection::Connected { .. } => SinkState::Connected,
            Connection::Closed => SinkState::Closed,
        }
    }

    /// Resolve the address, connect, enable keep-alive and start the sender
    ///
    /// # Errors
    ///
    /// - [`LoggerError::InvalidAddress`] if the address does not resolve
    /// - [`LoggerError::Dial`] if the connection cannot be made
    /// - [`LoggerError::SocketOption`] if keep-alive or the send deadline
    ///   cannot be applied
    ///
    /// Nothing is retried. A broken or closed sink is dialed again; the
    /// chunks still queued on a broken connection are dropped first.
    pub fn dial(&self) -> Result<()> {
        let inner = &self.inner;
        let mut connection = inner.connection.lock();

        match std::mem::replace(&mut *connection, Connection::Unconnected) {
            Connection::Connected {
                sender,
                worker,
                broken,
            } if !broken.load(Ordering::Acquire) => {
                *connection = Connection::Connected {
                    sender,
                    worker,
                    broken,
                };
                return Err(LoggerError::AlreadyConnected {
                    address: inner.address.clone(),
                });
            }
            Connection::Connected { sender, worker, .. } => drain(sender, worker)?,
            Connection::Closed => *connection = Connection::Closed,
            Connection::Unconnected => {}
        }

        let addr = resolve(&inner.address)?;
        let stream = TcpStream::connect_timeout(&addr, inner.timeout)
            .map_err(|e| LoggerError::dial(&inner.address, e))?;
        configure(&stream, inner.timeout)
            .map_err(|e| LoggerError::socket_option(&inner.address, e))?;

        let (sender, receiver) = match inner.buffer {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        let metrics = Arc::clone(&inner.metrics);
        let broken = Arc::new(AtomicBool::new(false));
        let worker_broken = Arc::clone(&broken);
        let timeout = inner.timeout;
        let worker = thread::Builder::new()
            .name("log-sink-sender".to_string())
            .spawn(move || send_loop(stream, receiver, timeout, &metrics, &worker_broken))
            .map_err(|e| {
                LoggerError::io_operation("spawning sender thread", inner.address.clone(), e)
            })?;

        *connection = Connection::Connected {
            sender,
            worker,
            broken,
        };
        Ok(())
    }

    /// Queue one chunk for sending
    ///
    /// Returns once the chunk is queued, blocking only while a bounded
    /// queue is full. Send failures surface later through [`metrics`](Self::metrics).
    ///
    /// # Errors
    ///
    /// [`LoggerError::ConnectionBroken`] once the peer has dropped the
    /// connection, until the sink is dialed again.
    pub fn write_chunk(&self, chunk: &[u8]) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }

        let sender = match *self.inner.connection.lock() {
            Connection::Connected { ref broken, .. } if broken.load(Ordering::Acquire) => {
                return Err(LoggerError::ConnectionBroken {
                    address: self.inner.address.clone(),
                })
            }
            Connection::Connected { ref sender, .. } => sender.clone(),
            Connection::Unconnected => {
                return Err(LoggerError::NotConnected {
                    address: self.inner.address.clone(),
                })
            }
            Connection::Closed => {
                return Err(LoggerError::SinkClosed {
                    address: self.inner.address.clone(),
                })
            }
        };

        sender
            .send(chunk.to_vec())
            .map_err(|_| LoggerError::SinkClosed {
                address: self.inner.address.clone(),
            })?;
        self.inner.metrics.record_queued();
        Ok(())
    }

    /// Stop accepting chunks and wait for queued ones to be sent
    ///
    /// Closing an unconnected or already closed sink only marks it closed.
    pub fn close(&self) -> Result<()> {
        let previous = std::mem::replace(&mut *self.inner.connection.lock(), Connection::Closed);
        match previous {
            Connection::Connected { sender, worker, .. } => drain(sender, worker),
            Connection::Unconnected | Connection::Closed => Ok(()),
        }
    }
}

impl io::Write for NetworkSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf).map_err(|e| {
            let kind = match e {
                LoggerError::NotConnected { .. } => io::ErrorKind::NotConnected,
                LoggerError::SinkClosed { .. } | LoggerError::ConnectionBroken { .. } => {
                    io::ErrorKind::BrokenPipe
                }
                _ => io::ErrorKind::Other,
            };
            io::Error::new(kind, e)
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for NetworkSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkSink")
            .field("address", &self.inner.address)
            .field("timeout", &self.inner.timeout)
            .field("buffer", &self.inner.buffer)
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let previous = std::mem::replace(self.connection.get_mut(), Connection::Closed);
        if let Connection::Connected { sender, worker, .. } = previous {
            if !sender.is_empty() {
                eprintln!(
                    "[LOGGER WARNING] Network sink for '{}' dropped without close(); \
                     draining {} queued chunks",
                    self.address,
                    sender.len()
                );
            }
            if let Err(e) = drain(sender, worker) {
                eprintln!("[LOGGER CRITICAL] Network sink for '{}': {}", self.address, e);
            }
        }
    }
}

fn resolve(address: &str) -> Result<SocketAddr> {
    address
        .to_socket_addrs()
        .map_err(|e| LoggerError::invalid_address(address, e.to_string()))?
        .next()
        .ok_or_else(|| LoggerError::invalid_address(address, "no addresses found"))
}

fn configure(stream: &TcpStream, timeout: Duration) -> io::Result<()> {
    SockRef::from(stream).set_keepalive(true)?;
    stream.set_write_timeout(Some(timeout))?;
    stream.set_nodelay(true)
}

fn drain(sender: Sender<Vec<u8>>, worker: JoinHandle<()>) -> Result<()> {
    drop(sender);
    worker
        .join()
        .map_err(|_| LoggerError::other("Network sink sender thread panicked"))
}

fn send_loop(
    mut stream: TcpStream,
    receiver: Receiver<Vec<u8>>,
    timeout: Duration,
    metrics: &SinkMetrics,
    broken: &AtomicBool,
) {
    for chunk in receiver.iter() {
        // Queued behind a dead connection; dropped without a write attempt
        if broken.load(Ordering::Acquire) {
            metrics.record_send_failure();
            continue;
        }

        match send_chunk(&mut stream, &chunk, timeout) {
            Ok(()) => {
                metrics.record_sent(chunk.len());
            }
            Err(e) => {
                metrics.record_send_failure();
                eprintln!("[LOGGER ERROR] Network sink send failed: {}", e);
                if !e.is_transport() {
                    broken.store(true, Ordering::Release);
                }
            }
        }
    }

    let _ = stream.flush();
    let _ = stream.shutdown(Shutdown::Write);
}

/// Write one chunk with a single call
///
/// A deadline hit maps to [`LoggerError::SendTimeout`]; fewer bytes than
/// requested maps to [`LoggerError::ShortWrite`].
fn send_chunk<W: Write>(out: &mut W, chunk: &[u8], timeout: Duration) -> Result<()> {
    match out.write(chunk) {
        Ok(written) if written == chunk.len() => Ok(()),
        Ok(written) => Err(LoggerError::short_write(written, chunk.len())),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
            Err(LoggerError::SendTimeout { timeout })
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes per call
    struct Trickle {
        limit: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len().min(self.limit))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Stalled;

    impl Write for Stalled {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WouldBlock, "deadline"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_chunk_full_write() {
        let mut out = Vec::new();
        send_chunk(&mut out, b"hello\n", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn test_short_write_is_distinct_error() {
        let mut out = Trickle { limit: 3 };
        let err = send_chunk(&mut out, b"0123456789", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(
            err,
            LoggerError::ShortWrite {
                written: 3,
                expected: 10
            }
        ));
        assert!(err.is_transport());
    }

    #[test]
    fn test_deadline_maps_to_timeout() {
        let timeout = Duration::from_millis(250);
        let err = send_chunk(&mut Stalled, b"x", timeout).unwrap_err();
        assert!(matches!(err, LoggerError::SendTimeout { timeout: t } if t == timeout));
    }

    #[test]
    fn test_builder_defaults() {
        let sink = NetworkSink::new("127.0.0.1:5000");
        assert_eq!(sink.address(), "127.0.0.1:5000");
        assert_eq!(sink.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(sink.state(), SinkState::Unconnected);
    }

    #[test]
    fn test_write_before_dial() {
        let sink = NetworkSink::new("127.0.0.1:5000");
        let err = sink.write_chunk(b"early").unwrap_err();
        assert!(matches!(err, LoggerError::NotConnected { .. }));

        let mut writer = sink.clone();
        let err = writer.write(b"early").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn test_invalid_address() {
        let sink = NetworkSink::builder("no port here").unbounded().build();
        let err = sink.dial().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidAddress { .. }));
        assert!(err.is_configuration());
        assert_eq!(sink.state(), SinkState::Unconnected);
    }

    #[test]
    fn test_close_without_connection() {
        let sink = NetworkSink::new("127.0.0.1:5000");
        sink.close().unwrap();
        assert_eq!(sink.state(), SinkState::Closed);

        assert!(matches!(
            sink.write_chunk(b"late").unwrap_err(),
            LoggerError::SinkClosed { .. }
        ));
        sink.close().unwrap();
    }

    #[test]
    fn test_failed_redial_after_close_stays_closed() {
        let sink = NetworkSink::builder("no port here").build();
        sink.close().unwrap();

        let err = sink.dial().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidAddress { .. }));
        assert_eq!(sink.state(), SinkState::Closed);
    }

    #[test]
    fn test_empty_chunk_is_ignored() {
        let sink = NetworkSink::new("127.0.0.1:5000");
        sink.write_chunk(b"").unwrap();
        assert_eq!(sink.metrics().chunks_queued(), 0);
    }
}
