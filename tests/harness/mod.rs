//! Shared helpers for integration tests.
//!
//! Endpoints are wired over the in-memory frame pipe; the "raw" peer side
//! lets tests inject arbitrary frames and observe exactly what went onto
//! the wire.

#![allow(dead_code)]

use tokio_util::sync::CancellationToken;
use wsduplex::{Connection, PipeEnd, PipeReader, PipeWriter, pipe};

pub type PipeConnection = Connection<PipeReader, PipeWriter>;

/// A connection plus the raw pipe end acting as the remote peer.
pub fn endpoint() -> (PipeConnection, PipeEnd) {
    let (a, b) = pipe(16);
    (Connection::new(a.reader, a.writer), b)
}

/// Two connections wired back to back.
pub fn pair() -> (PipeConnection, PipeConnection) {
    let (a, b) = pipe(16);
    (
        Connection::new(a.reader, a.writer),
        Connection::new(b.reader, b.writer),
    )
}

pub fn token() -> CancellationToken {
    CancellationToken::new()
}
