//! # wsduplex - WebSocket close-handshake connection core
//!
//! `wsduplex` implements the client-side close handshake state machine of
//! RFC 6455 Section 5.5/7 over a frame-delineated transport.
//!
//! ## Features
//!
//! - **Monotonic lifecycle state machine** with deterministic outcomes
//!   under concurrent send, receive, and close operations
//! - **First-write-wins close metadata**: whichever close frame (local or
//!   peer) is processed first fixes the recorded status and reason
//! - **Strict close payload validation** per RFC 6455 (125-byte control
//!   payload, 123-byte UTF-8 reason, sendable status codes)
//! - **Cooperative cancellation** at every suspension point, driving the
//!   connection to a terminal `Aborted` state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsduplex::{CloseCode, Connection, MessageKind};
//! use tokio_util::sync::CancellationToken;
//!
//! let conn = Connection::new(reader, writer);
//! let cancel = CancellationToken::new();
//!
//! conn.send(b"Hello", MessageKind::Text, true, &cancel).await?;
//! conn.close(CloseCode::NormalClosure, "done", &cancel).await?;
//! ```

pub mod close;
pub mod connection;
pub mod error;
pub mod message;
pub mod protocol;
pub mod transport;

pub use close::{CloseCode, CloseFrame};
pub use connection::{Connection, ConnectionState};
pub use error::{Error, Result};
pub use message::{MessageKind, Received};
pub use protocol::{Frame, MAX_CLOSE_REASON, MAX_CONTROL_PAYLOAD, OpCode, decode_close, encode_close};
pub use transport::{FrameRead, FrameWrite, PipeEnd, PipeReader, PipeWriter, pipe};
