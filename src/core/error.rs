//! Error types for the logger system

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Writer returned an error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Writer panicked while rendering a record
    #[error("Writer '{writer}' panicked: {message}")]
    WriterPanicked { writer: String, message: String },

    /// Context extraction function panicked
    #[error("Context extractor panicked: {message}")]
    ContextPanicked { message: String },

    /// Remote address could not be resolved
    #[error("Invalid remote address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// TCP connection could not be established
    #[error("Failed to connect to '{address}': {source}")]
    Dial {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket options could not be applied after connecting
    #[error("Failed to configure connection to '{address}': {source}")]
    SocketOption {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Sink used before `dial()` completed
    #[error("Network sink for '{address}' is not connected")]
    NotConnected { address: String },

    /// `dial()` called on a sink that already owns a connection
    #[error("Network sink for '{address}' is already connected")]
    AlreadyConnected { address: String },

    /// Peer dropped the connection; the sink must be dialed again
    #[error("Connection to '{address}' is broken")]
    ConnectionBroken { address: String },

    /// Sink queue has been closed
    #[error("Network sink for '{address}' is closed")]
    SinkClosed { address: String },

    /// Per-send deadline exceeded
    #[error("Send timed out after {timeout:?}")]
    SendTimeout { timeout: Duration },

    /// Fewer bytes written than requested
    #[error("Short write: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a writer panic error
    pub fn writer_panicked(writer: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WriterPanicked {
            writer: writer.into(),
            message: message.into(),
        }
    }

    /// Create a context extractor panic error
    pub fn context_panicked(message: impl Into<String>) -> Self {
        LoggerError::ContextPanicked {
            message: message.into(),
        }
    }

    /// Create an invalid address error
    pub fn invalid_address(address: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidAddress {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Create a dial error
    pub fn dial(address: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Dial {
            address: address.into(),
            source,
        }
    }

    /// Create a socket option error
    pub fn socket_option(address: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SocketOption {
            address: address.into(),
            source,
        }
    }

    /// Create a short write error
    pub fn short_write(written: usize, expected: usize) -> Self {
        LoggerError::ShortWrite { written, expected }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Configuration errors are raised synchronously by `dial()`
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidAddress { .. }
                | LoggerError::Dial { .. }
                | LoggerError::SocketOption { .. }
        )
    }

    /// Transport errors fail a single send; the chunk is dropped
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LoggerError::SendTimeout { .. } | LoggerError::ShortWrite { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_address("nowhere", "no port");
        assert!(matches!(err, LoggerError::InvalidAddress { .. }));
        assert!(err.is_configuration());

        let err = LoggerError::short_write(3, 10);
        assert!(matches!(err, LoggerError::ShortWrite { .. }));
        assert!(err.is_transport());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::short_write(3, 10);
        assert_eq!(err.to_string(), "Short write: wrote 3 of 10 bytes");

        let err = LoggerError::writer_panicked("json", "boom");
        assert_eq!(err.to_string(), "Writer 'json' panicked: boom");

        let err = LoggerError::SendTimeout {
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "Send timed out after 250ms");
    }

    #[test]
    fn test_dial_error_keeps_cause() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = LoggerError::dial("127.0.0.1:9", io_err);

        assert!(err.to_string().contains("127.0.0.1:9"));
        assert!(err.to_string().contains("refused"));
        assert!(err.source().is_some());
    }
}
