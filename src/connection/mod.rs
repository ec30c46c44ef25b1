//! WebSocket connection management and the close-handshake state machine.
//!
//! ## Connection Lifecycle
//!
//! 1. **Open** - both directions open for data transfer
//! 2. **CloseSent** - local close frame sent, waiting for the peer's close
//! 3. **CloseReceived** - peer's close frame received, local close pending
//! 4. **Closed** - close handshake completed in both directions
//! 5. **Aborted** - torn down on protocol violation, cancellation, or I/O
//!    failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use wsduplex::{CloseCode, Connection, MessageKind};
//! use tokio_util::sync::CancellationToken;
//!
//! let conn = Connection::new(reader, writer);
//! let cancel = CancellationToken::new();
//!
//! conn.send(b"Hello", MessageKind::Text, true, &cancel).await?;
//! let mut buf = [0u8; 4096];
//! let received = conn.receive(&mut buf, &cancel).await?;
//! conn.close(CloseCode::NormalClosure, "done", &cancel).await?;
//! ```

mod state;

pub use state::ConnectionState;

#[allow(clippy::module_inception)]
mod connection;

pub use connection::Connection;
