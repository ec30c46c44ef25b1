//! Error types for the WebSocket connection core.
//!
//! This module defines all error conditions that can occur during close
//! handshake and data transfer operations, following RFC 6455 requirements.

use thiserror::Error;

use crate::connection::ConnectionState;

/// Result type alias for WebSocket operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during WebSocket operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Close reason exceeds the 123-byte control-payload budget.
    ///
    /// Raised before any network write; connection state is untouched.
    #[error("Close reason too long: {len} bytes (max: {max})")]
    ReasonTooLong {
        /// Encoded reason length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Close status code is reserved or outside the sendable ranges
    /// of RFC 6455 Section 7.4.1.
    #[error("Invalid close code: {0}")]
    InvalidCloseCode(u16),

    /// Operation is not permitted in the current connection state.
    #[error("{operation} not permitted in state {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The connection state at the time of the attempt.
        state: ConnectionState,
    },

    /// Protocol violation detected in a peer frame.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Invalid UTF-8 in a close reason.
    #[error("Invalid UTF-8 in close reason")]
    InvalidUtf8,

    /// Operation was cancelled via its cancellation token.
    ///
    /// The connection is left in the `Aborted` state.
    #[error("Operation cancelled")]
    Cancelled,

    /// The connection was aborted by a concurrent operation.
    #[error("Connection aborted")]
    ConnectionAborted,

    /// I/O error from the underlying transport.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(_: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ReasonTooLong { len: 140, max: 123 };
        assert_eq!(
            err.to_string(),
            "Close reason too long: 140 bytes (max: 123)"
        );

        let err = Error::InvalidState {
            operation: "send",
            state: ConnectionState::Closed,
        };
        assert_eq!(err.to_string(), "send not permitted in state Closed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_utf8() {
        let bad = std::str::from_utf8(&[0xff, 0xfe]).unwrap_err();
        let err: Error = bad.into();
        assert_eq!(err, Error::InvalidUtf8);
    }

    #[test]
    fn test_error_clone() {
        let err = Error::InvalidCloseCode(1005);
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
