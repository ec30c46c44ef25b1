use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::close::{CloseCode, CloseFrame};
use crate::connection::ConnectionState;
use crate::error::{Error, Result};
use crate::message::{MessageKind, Received};
use crate::protocol::{Frame, OpCode, decode_close};
use crate::transport::{FrameRead, FrameWrite};

/// A duplex WebSocket connection over a frame-delineated transport.
///
/// `Connection` owns the close-handshake state machine of RFC 6455
/// Section 5.5/7: it tracks the lifecycle, validates and encodes close
/// control payloads, reconciles locally and peer-initiated closure, and
/// arbitrates between concurrent send, receive, and close operations.
///
/// All methods take `&self`; one send, one receive, and close operations
/// may overlap in time. Lifecycle mutations are linearized through a single
/// internal mutex, so racing operations observe one deterministic outcome.
///
/// ## Type Parameters
///
/// - `R`: read side of the transport (frames from the peer)
/// - `W`: write side of the transport (frames to the peer)
///
/// ## Example
///
/// ```rust,ignore
/// use wsduplex::{Connection, CloseCode, MessageKind};
/// use tokio_util::sync::CancellationToken;
///
/// let conn = Connection::new(reader, writer);
/// let cancel = CancellationToken::new();
///
/// conn.send(b"hello", MessageKind::Text, true, &cancel).await?;
/// conn.close(CloseCode::NormalClosure, "done", &cancel).await?;
/// ```
pub struct Connection<R, W> {
    reader: AsyncMutex<ReadHalf<R>>,
    writer: AsyncMutex<W>,
    lifecycle: Lifecycle,
}

/// Read side of the connection plus the partial-delivery slot.
struct ReadHalf<R> {
    io: R,
    partial: Option<Partial>,
}

/// Remainder of a data frame that did not fit the caller's buffer.
struct Partial {
    kind: MessageKind,
    payload: Bytes,
    offset: usize,
    fin: bool,
}

/// Close metadata recorded from whichever close frame (local or peer)
/// was processed first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CloseMeta {
    code: Option<CloseCode>,
    reason: String,
}

/// Lifecycle state shared by every operation on the connection.
///
/// The sync mutex is never held across an await point; the token wakes
/// every blocked operation once the connection aborts.
struct Lifecycle {
    inner: Mutex<LifecycleInner>,
    aborted: CancellationToken,
}

struct LifecycleInner {
    state: ConnectionState,
    close: Option<CloseMeta>,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            inner: Mutex::new(LifecycleInner {
                state: ConnectionState::Open,
                close: None,
            }),
            aborted: CancellationToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> ConnectionState {
        self.lock().state
    }

    fn close_meta(&self) -> Option<CloseMeta> {
        self.lock().close.clone()
    }

    /// Mark the local close frame as sent.
    ///
    /// Records (code, reason) set-if-absent: an earlier close, local or
    /// peer, wins. Returns the state after the transition.
    fn close_sent(&self, frame: &CloseFrame) -> ConnectionState {
        let mut inner = self.lock();
        if inner.close.is_none() {
            inner.close = Some(CloseMeta {
                code: Some(frame.code),
                reason: frame.reason.clone(),
            });
        }
        inner.state = match inner.state {
            ConnectionState::Open => ConnectionState::CloseSent,
            ConnectionState::CloseReceived => ConnectionState::Closed,
            other => other,
        };
        inner.state
    }

    /// Mark the peer's close frame as received.
    ///
    /// Same set-if-absent rule as [`close_sent`](Self::close_sent); an empty
    /// peer payload still occupies the slot, with the code absent. Returns
    /// the state after the transition and the recorded metadata.
    fn close_received(&self, frame: Option<&CloseFrame>) -> (ConnectionState, CloseMeta) {
        let mut inner = self.lock();
        if inner.close.is_none() {
            inner.close = Some(match frame {
                Some(frame) => CloseMeta {
                    code: Some(frame.code),
                    reason: frame.reason.clone(),
                },
                None => CloseMeta::default(),
            });
        }
        inner.state = match inner.state {
            ConnectionState::Open => ConnectionState::CloseReceived,
            ConnectionState::CloseSent => ConnectionState::Closed,
            other => other,
        };
        (inner.state, inner.close.clone().unwrap_or_default())
    }

    /// Drive the connection to `Aborted` and wake every blocked operation.
    ///
    /// A connection that already completed the close handshake stays
    /// `Closed`; `Aborted` absorbs only non-terminal states.
    fn abort(&self) {
        {
            let mut inner = self.lock();
            if !inner.state.is_terminal() {
                warn!(state = %inner.state, "aborting connection");
                inner.state = ConnectionState::Aborted;
            }
        }
        self.aborted.cancel();
    }
}

impl<R, W> Connection<R, W> {
    /// Create a connection over an already-established transport.
    ///
    /// The HTTP upgrade handshake is out of scope; the transport is
    /// expected to deliver delineated frames in order.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: AsyncMutex::new(ReadHalf {
                io: reader,
                partial: None,
            }),
            writer: AsyncMutex::new(writer),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    /// Close status code recorded from the first close frame observed on
    /// the connection, local or peer.
    ///
    /// `None` until a close frame is processed, or when the peer's close
    /// carried an empty payload.
    pub fn close_status(&self) -> Option<CloseCode> {
        self.lifecycle.close_meta().and_then(|meta| meta.code)
    }

    /// Close reason recorded alongside [`close_status`](Self::close_status).
    ///
    /// `None` until a close frame is processed; empty when the recorded
    /// close carried no reason.
    pub fn close_status_description(&self) -> Option<String> {
        self.lifecycle.close_meta().map(|meta| meta.reason)
    }

    fn check_state(
        &self,
        operation: &'static str,
        allowed: impl Fn(ConnectionState) -> bool,
    ) -> Result<()> {
        let state = self.lifecycle.state();
        if allowed(state) {
            Ok(())
        } else {
            Err(Error::InvalidState { operation, state })
        }
    }

    /// Precondition shared by both close operations: an aborted connection
    /// reports the abort itself, not a state mismatch.
    fn check_close_state(&self, operation: &'static str) -> Result<()> {
        let state = self.lifecycle.state();
        match state {
            state if state.can_send_close() => Ok(()),
            ConnectionState::Aborted => Err(Error::ConnectionAborted),
            state => Err(Error::InvalidState { operation, state }),
        }
    }
}

impl<R: FrameRead, W: FrameWrite> Connection<R, W> {
    /// Send one data frame.
    ///
    /// Sending is permitted while `Open` and after the peer's close was
    /// received but before the local close was sent (`CloseReceived`).
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidState`] in `CloseSent`, `Closed`, or `Aborted`
    /// - [`Error::Cancelled`] if the token fires; the connection aborts
    /// - [`Error::Io`] on transport failure; the connection aborts
    pub async fn send(
        &self,
        data: &[u8],
        kind: MessageKind,
        end_of_message: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.check_state("send", |state| state.can_send())?;
        let mut writer = self.lock_writer(cancel).await?;
        // Re-check under the write lock: a racing close may have advanced
        // the state while we waited.
        self.check_state("send", |state| state.can_send())?;

        let frame = Frame::data(kind, Bytes::copy_from_slice(data), end_of_message);
        self.write(&mut writer, frame, cancel).await?;
        trace!(len = data.len(), ?kind, end_of_message, "data frame sent");
        Ok(())
    }

    /// Receive the next data chunk or the peer's close frame.
    ///
    /// At most one receive may be outstanding per connection; a second
    /// concurrent call serializes behind the first. Ping and pong frames
    /// are skipped. The peer's close frame is never echoed automatically;
    /// acknowledging it is the caller's responsibility via
    /// [`close`](Self::close) or [`close_output`](Self::close_output).
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidState`] in `CloseReceived`, `Closed`, or `Aborted`
    /// - [`Error::ProtocolViolation`], [`Error::InvalidCloseCode`], or
    ///   [`Error::InvalidUtf8`] on a malformed peer close; the connection
    ///   aborts
    /// - [`Error::Io`] on transport failure or unexpected EOF; the
    ///   connection aborts
    /// - [`Error::Cancelled`] if the token fires; the connection aborts
    pub async fn receive(
        &self,
        buf: &mut [u8],
        cancel: &CancellationToken,
    ) -> Result<Received> {
        self.check_state("receive", |state| state.can_receive())?;
        let mut reader = self.lock_reader(cancel).await?;
        // A racing close may have finished the handshake while we waited
        // for the read half.
        self.check_state("receive", |state| state.can_receive())?;

        if let Some(received) = reader.next_partial(buf) {
            return Ok(received);
        }

        loop {
            let frame = self.read(&mut reader, cancel).await?;
            match frame.opcode {
                OpCode::Ping | OpCode::Pong => {
                    trace!(opcode = %frame.opcode, "skipping control frame");
                }
                OpCode::Close => {
                    let close = match decode_close(&frame.payload) {
                        Ok(close) => close,
                        Err(err) => {
                            self.lifecycle.abort();
                            return Err(err);
                        }
                    };
                    let (state, meta) = self.lifecycle.close_received(close.as_ref());
                    debug!(%state, code = ?meta.code, "close frame received");
                    return Ok(Received::Close {
                        code: meta.code,
                        reason: meta.reason,
                    });
                }
                OpCode::Text | OpCode::Binary => {
                    let kind = match frame.opcode {
                        OpCode::Text => MessageKind::Text,
                        _ => MessageKind::Binary,
                    };
                    return Ok(reader.deliver(kind, frame.payload, frame.fin, buf));
                }
            }
        }
    }

    /// Send the local close frame without waiting for the peer's reply.
    ///
    /// On success the state advances `Open -> CloseSent`, or
    /// `CloseReceived -> Closed` when the peer's close already arrived.
    /// The (code, reason) pair is recorded only if no close was recorded
    /// before.
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidCloseCode`] / [`Error::ReasonTooLong`] on invalid
    ///   arguments; no I/O happens and state is untouched
    /// - [`Error::InvalidState`] in `CloseSent` or `Closed`
    /// - [`Error::ConnectionAborted`] when already `Aborted`
    /// - [`Error::Cancelled`] / [`Error::Io`] as for [`send`](Self::send)
    pub async fn close_output(
        &self,
        code: CloseCode,
        reason: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        // Validation happens before any I/O or state mutation.
        let frame = Frame::close(code, reason)?;

        self.check_close_state("close_output")?;
        let mut writer = self.lock_writer(cancel).await?;
        // The write lock serializes racing close attempts; the loser sees
        // CloseSent here and fails instead of putting a second close frame
        // on the wire.
        self.check_close_state("close_output")?;

        self.write(&mut writer, frame, cancel).await?;
        let state = self.lifecycle.close_sent(&CloseFrame::new(code, reason));
        debug!(%state, %code, "close frame sent");
        Ok(())
    }

    /// Perform the full close handshake.
    ///
    /// Sends the local close frame if it was not sent yet, then drains
    /// incoming frames, discarding application data, until the peer's
    /// close frame arrives and the state reaches `Closed`.
    ///
    /// Calling after `close_output` is valid and only performs the drain;
    /// calling once the connection is `Closed` is an error.
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidCloseCode`] / [`Error::ReasonTooLong`] on invalid
    ///   arguments; no I/O happens and state is untouched
    /// - [`Error::InvalidState`] when already `Closed`
    /// - [`Error::ConnectionAborted`] when already `Aborted`
    /// - [`Error::Cancelled`] if the token fires before the handshake
    ///   completes; the connection aborts
    /// - [`Error::Io`] on transport failure or EOF before the peer's
    ///   close; the connection aborts
    pub async fn close(
        &self,
        code: CloseCode,
        reason: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let frame = Frame::close(code, reason)?;

        {
            let mut writer = self.lock_writer(cancel).await?;
            let state = self.lifecycle.state();
            match state {
                ConnectionState::Open | ConnectionState::CloseReceived => {
                    self.write(&mut writer, frame, cancel).await?;
                    let state = self.lifecycle.close_sent(&CloseFrame::new(code, reason));
                    debug!(%state, %code, "close frame sent");
                }
                // Already on the wire from an earlier close_output; only
                // the drain below remains.
                ConnectionState::CloseSent => {}
                ConnectionState::Closed => {
                    return Err(Error::InvalidState {
                        operation: "close",
                        state,
                    });
                }
                ConnectionState::Aborted => return Err(Error::ConnectionAborted),
            }
        }

        if self.lifecycle.state() == ConnectionState::Closed {
            return Ok(());
        }

        let mut reader = self.lock_reader(cancel).await?;
        // A racing receive may have consumed the peer's close while we
        // waited for the read half.
        if self.lifecycle.state() == ConnectionState::Closed {
            return Ok(());
        }

        loop {
            let frame = self.read(&mut reader, cancel).await?;
            match frame.opcode {
                OpCode::Close => {
                    let close = match decode_close(&frame.payload) {
                        Ok(close) => close,
                        Err(err) => {
                            self.lifecycle.abort();
                            return Err(err);
                        }
                    };
                    let (state, meta) = self.lifecycle.close_received(close.as_ref());
                    debug!(%state, code = ?meta.code, "close handshake complete");
                    return Ok(());
                }
                opcode => {
                    trace!(%opcode, "discarding frame while draining for close");
                }
            }
        }
    }

    async fn lock_reader(
        &self,
        cancel: &CancellationToken,
    ) -> Result<tokio::sync::MutexGuard<'_, ReadHalf<R>>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.lifecycle.abort();
                Err(Error::Cancelled)
            }
            _ = self.lifecycle.aborted.cancelled() => Err(Error::ConnectionAborted),
            guard = self.reader.lock() => Ok(guard),
        }
    }

    async fn lock_writer(
        &self,
        cancel: &CancellationToken,
    ) -> Result<tokio::sync::MutexGuard<'_, W>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.lifecycle.abort();
                Err(Error::Cancelled)
            }
            _ = self.lifecycle.aborted.cancelled() => Err(Error::ConnectionAborted),
            guard = self.writer.lock() => Ok(guard),
        }
    }

    /// Read one frame, watching the caller's token and the abort signal.
    ///
    /// EOF before the close handshake completed counts as a transport
    /// failure and aborts the connection.
    async fn read(
        &self,
        reader: &mut ReadHalf<R>,
        cancel: &CancellationToken,
    ) -> Result<Frame> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.lifecycle.abort();
                Err(Error::Cancelled)
            }
            _ = self.lifecycle.aborted.cancelled() => Err(Error::ConnectionAborted),
            result = reader.io.read_frame() => match result {
                Ok(Some(frame)) => Ok(frame),
                Ok(None) => {
                    self.lifecycle.abort();
                    Err(Error::Io(
                        "transport closed before the close handshake completed".into(),
                    ))
                }
                Err(err) => {
                    self.lifecycle.abort();
                    Err(err)
                }
            },
        }
    }

    /// Write one frame, watching the caller's token and the abort signal.
    async fn write(&self, writer: &mut W, frame: Frame, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.lifecycle.abort();
                Err(Error::Cancelled)
            }
            _ = self.lifecycle.aborted.cancelled() => Err(Error::ConnectionAborted),
            result = writer.write_frame(frame) => match result {
                Ok(()) => Ok(()),
                Err(err) => {
                    self.lifecycle.abort();
                    Err(err)
                }
            },
        }
    }
}

impl<R> ReadHalf<R> {
    /// Deliver a fresh data frame into the caller's buffer, stashing any
    /// remainder for the next receive.
    fn deliver(&mut self, kind: MessageKind, payload: Bytes, fin: bool, buf: &mut [u8]) -> Received {
        let len = payload.len().min(buf.len());
        buf[..len].copy_from_slice(&payload[..len]);
        if len < payload.len() {
            self.partial = Some(Partial {
                kind,
                payload,
                offset: len,
                fin,
            });
            Received::Data {
                kind,
                len,
                end_of_message: false,
            }
        } else {
            Received::Data {
                kind,
                len,
                end_of_message: fin,
            }
        }
    }

    /// Continue delivering a stashed frame remainder, if any.
    fn next_partial(&mut self, buf: &mut [u8]) -> Option<Received> {
        let mut partial = self.partial.take()?;
        let rest = &partial.payload[partial.offset..];
        let len = rest.len().min(buf.len());
        buf[..len].copy_from_slice(&rest[..len]);
        partial.offset += len;
        if partial.offset < partial.payload.len() {
            let kind = partial.kind;
            self.partial = Some(partial);
            Some(Received::Data {
                kind,
                len,
                end_of_message: false,
            })
        } else {
            Some(Received::Data {
                kind: partial.kind,
                len,
                end_of_message: partial.fin,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{PipeEnd, PipeReader, PipeWriter, pipe};

    fn endpoint() -> (Connection<PipeReader, PipeWriter>, PipeEnd) {
        let (a, b) = pipe(8);
        (Connection::new(a.reader, a.writer), b)
    }

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[test]
    fn test_connection_new() {
        let (conn, _peer) = endpoint();
        assert_eq!(conn.state(), ConnectionState::Open);
        assert_eq!(conn.close_status(), None);
        assert_eq!(conn.close_status_description(), None);
    }

    #[tokio::test]
    async fn test_send_data_frame() {
        let (conn, mut peer) = endpoint();

        conn.send(b"hello", MessageKind::Text, true, &token())
            .await
            .unwrap();

        let frame = peer.reader.read_frame().await.unwrap().unwrap();
        assert_eq!(frame.opcode, OpCode::Text);
        assert!(frame.fin);
        assert_eq!(&frame.payload[..], b"hello");
    }

    #[tokio::test]
    async fn test_receive_data_frame() {
        let (conn, mut peer) = endpoint();
        peer.writer
            .write_frame(Frame::binary(Bytes::from_static(&[1, 2, 3])))
            .await
            .unwrap();

        let mut buf = [0u8; 16];
        let received = conn.receive(&mut buf, &token()).await.unwrap();
        assert_eq!(
            received,
            Received::Data {
                kind: MessageKind::Binary,
                len: 3,
                end_of_message: true,
            }
        );
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_receive_skips_ping_pong() {
        let (conn, mut peer) = endpoint();
        peer.writer.write_frame(Frame::ping(Bytes::new())).await.unwrap();
        peer.writer.write_frame(Frame::pong(Bytes::new())).await.unwrap();
        peer.writer
            .write_frame(Frame::text(Bytes::from_static(b"after")))
            .await
            .unwrap();

        let mut buf = [0u8; 16];
        let received = conn.receive(&mut buf, &token()).await.unwrap();
        assert_eq!(received.len(), 5);
        assert_eq!(&buf[..5], b"after");
    }

    #[tokio::test]
    async fn test_partial_delivery() {
        let (conn, mut peer) = endpoint();
        peer.writer
            .write_frame(Frame::text(Bytes::from_static(b"0123456789")))
            .await
            .unwrap();

        let cancel = token();
        let mut buf = [0u8; 4];

        let received = conn.receive(&mut buf, &cancel).await.unwrap();
        assert_eq!(
            received,
            Received::Data {
                kind: MessageKind::Text,
                len: 4,
                end_of_message: false,
            }
        );
        assert_eq!(&buf, b"0123");

        let received = conn.receive(&mut buf, &cancel).await.unwrap();
        assert!(!received.is_close());
        assert_eq!(&buf, b"4567");

        let received = conn.receive(&mut buf, &cancel).await.unwrap();
        assert_eq!(
            received,
            Received::Data {
                kind: MessageKind::Text,
                len: 2,
                end_of_message: true,
            }
        );
        assert_eq!(&buf[..2], b"89");
    }

    #[tokio::test]
    async fn test_close_output_transitions_to_close_sent() {
        let (conn, mut peer) = endpoint();

        conn.close_output(CloseCode::NormalClosure, "bye", &token())
            .await
            .unwrap();

        assert_eq!(conn.state(), ConnectionState::CloseSent);
        assert_eq!(conn.close_status(), Some(CloseCode::NormalClosure));
        assert_eq!(conn.close_status_description().as_deref(), Some("bye"));

        let frame = peer.reader.read_frame().await.unwrap().unwrap();
        assert_eq!(frame.opcode, OpCode::Close);
        assert_eq!(&frame.payload[..2], &1000u16.to_be_bytes());
        assert_eq!(&frame.payload[2..], b"bye");
    }

    #[tokio::test]
    async fn test_close_output_twice_fails() {
        let (conn, _peer) = endpoint();
        let cancel = token();

        conn.close_output(CloseCode::NormalClosure, "", &cancel)
            .await
            .unwrap();
        let err = conn
            .close_output(CloseCode::NormalClosure, "", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                operation: "close_output",
                state: ConnectionState::CloseSent,
            }
        ));
    }

    #[tokio::test]
    async fn test_close_output_after_peer_close_completes_handshake() {
        let (conn, mut peer) = endpoint();
        peer.writer
            .write_frame(Frame::close(CloseCode::NormalClosure, "x").unwrap())
            .await
            .unwrap();

        let cancel = token();
        let mut buf = [0u8; 4];
        let received = conn.receive(&mut buf, &cancel).await.unwrap();
        assert!(received.is_close());
        assert_eq!(conn.state(), ConnectionState::CloseReceived);

        conn.close_output(CloseCode::NormalClosure, "x", &cancel)
            .await
            .unwrap();
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_validation_failure_leaves_state_untouched() {
        let (conn, _peer) = endpoint();
        let cancel = token();
        let reason = "x".repeat(124);

        let err = conn
            .close_output(CloseCode::NormalClosure, &reason, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReasonTooLong { len: 124, max: 123 }));
        assert_eq!(conn.state(), ConnectionState::Open);
        assert_eq!(conn.close_status(), None);

        let err = conn
            .close(CloseCode::Other(1005), "", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, Error::InvalidCloseCode(1005));
        assert_eq!(conn.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_send_after_close_output_fails() {
        let (conn, _peer) = endpoint();
        let cancel = token();

        conn.close_output(CloseCode::NormalClosure, "", &cancel)
            .await
            .unwrap();

        let err = conn
            .send(b"late", MessageKind::Text, true, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                operation: "send",
                state: ConnectionState::CloseSent,
            }
        ));
    }

    #[tokio::test]
    async fn test_receive_after_peer_close_fails() {
        let (conn, mut peer) = endpoint();
        peer.writer
            .write_frame(Frame::close(CloseCode::NormalClosure, "").unwrap())
            .await
            .unwrap();

        let cancel = token();
        let mut buf = [0u8; 4];
        conn.receive(&mut buf, &cancel).await.unwrap();

        let err = conn.receive(&mut buf, &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                operation: "receive",
                state: ConnectionState::CloseReceived,
            }
        ));
    }

    #[tokio::test]
    async fn test_malformed_peer_close_aborts() {
        let (conn, mut peer) = endpoint();
        peer.writer
            .write_frame(Frame {
                opcode: OpCode::Close,
                fin: true,
                payload: Bytes::from_static(&[0x03]),
            })
            .await
            .unwrap();

        let mut buf = [0u8; 4];
        let err = conn.receive(&mut buf, &token()).await.unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
        assert_eq!(conn.state(), ConnectionState::Aborted);
    }

    #[tokio::test]
    async fn test_transport_eof_aborts() {
        let (conn, peer) = endpoint();
        drop(peer);

        let mut buf = [0u8; 4];
        let err = conn.receive(&mut buf, &token()).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(conn.state(), ConnectionState::Aborted);
    }
}
