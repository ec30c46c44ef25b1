//! Delineated frames and the close control payload codec (RFC 6455).
//!
//! The transport below this crate delivers frames already delineated
//! (opcode + payload); this module only defines the frame value and the
//! encoding of the close control payload: a 2-byte big-endian status code
//! followed by a UTF-8 reason, at most 125 bytes in total.

use bytes::{BufMut, Bytes, BytesMut};

use crate::close::{CloseCode, CloseFrame};
use crate::error::{Error, Result};
use crate::message::MessageKind;
use crate::protocol::OpCode;

/// Maximum payload size for control frames (RFC 6455 Section 5.5).
pub const MAX_CONTROL_PAYLOAD: usize = 125;

/// Maximum encoded length of a close reason: the control payload cap
/// minus the 2-byte status code.
pub const MAX_CLOSE_REASON: usize = MAX_CONTROL_PAYLOAD - 2;

/// A single delineated WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame opcode.
    pub opcode: OpCode,
    /// Final frame of a message. Always `true` for control frames.
    pub fin: bool,
    /// Frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a data frame of the given kind.
    #[must_use]
    pub fn data(kind: MessageKind, payload: impl Into<Bytes>, end_of_message: bool) -> Self {
        let opcode = match kind {
            MessageKind::Text => OpCode::Text,
            MessageKind::Binary => OpCode::Binary,
        };
        Self {
            opcode,
            fin: end_of_message,
            payload: payload.into(),
        }
    }

    /// Create a single-frame text message.
    #[must_use]
    pub fn text(payload: impl Into<Bytes>) -> Self {
        Self::data(MessageKind::Text, payload, true)
    }

    /// Create a single-frame binary message.
    #[must_use]
    pub fn binary(payload: impl Into<Bytes>) -> Self {
        Self::data(MessageKind::Binary, payload, true)
    }

    /// Create a ping frame.
    #[must_use]
    pub fn ping(payload: impl Into<Bytes>) -> Self {
        Self {
            opcode: OpCode::Ping,
            fin: true,
            payload: payload.into(),
        }
    }

    /// Create a pong frame.
    #[must_use]
    pub fn pong(payload: impl Into<Bytes>) -> Self {
        Self {
            opcode: OpCode::Pong,
            fin: true,
            payload: payload.into(),
        }
    }

    /// Create a close frame with the given status code and reason.
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidCloseCode`] if the code is reserved or undefined
    /// - [`Error::ReasonTooLong`] if the reason exceeds 123 encoded bytes
    pub fn close(code: CloseCode, reason: &str) -> Result<Self> {
        Ok(Self {
            opcode: OpCode::Close,
            fin: true,
            payload: encode_close(code, reason)?,
        })
    }
}

/// Encode a close control payload: 2-byte big-endian code + UTF-8 reason.
///
/// The reason length counts encoded bytes, not characters; multi-byte
/// UTF-8 sequences eat into the 123-byte budget.
///
/// ## Errors
///
/// - [`Error::InvalidCloseCode`] if the code is reserved or undefined
/// - [`Error::ReasonTooLong`] if the reason exceeds [`MAX_CLOSE_REASON`] bytes
pub fn encode_close(code: CloseCode, reason: &str) -> Result<Bytes> {
    if !code.is_sendable() {
        return Err(Error::InvalidCloseCode(code.as_u16()));
    }
    if reason.len() > MAX_CLOSE_REASON {
        return Err(Error::ReasonTooLong {
            len: reason.len(),
            max: MAX_CLOSE_REASON,
        });
    }

    let mut buf = BytesMut::with_capacity(2 + reason.len());
    buf.put_u16(code.as_u16());
    buf.put_slice(reason.as_bytes());
    Ok(buf.freeze())
}

/// Decode a close control payload.
///
/// An empty payload is valid and decodes to `None` (status absent).
///
/// ## Errors
///
/// - [`Error::ProtocolViolation`] for a 1-byte or oversized payload
/// - [`Error::InvalidCloseCode`] for a reserved or undefined status code
/// - [`Error::InvalidUtf8`] for a non-UTF-8 reason
pub fn decode_close(payload: &[u8]) -> Result<Option<CloseFrame>> {
    if payload.is_empty() {
        return Ok(None);
    }
    if payload.len() == 1 {
        return Err(Error::ProtocolViolation(
            "close payload of one byte".into(),
        ));
    }
    if payload.len() > MAX_CONTROL_PAYLOAD {
        return Err(Error::ProtocolViolation(format!(
            "close payload of {} bytes exceeds the {MAX_CONTROL_PAYLOAD}-byte cap",
            payload.len()
        )));
    }

    let code = u16::from_be_bytes([payload[0], payload[1]]);
    let code = CloseCode::from_u16(code);
    if !code.is_sendable() {
        return Err(Error::InvalidCloseCode(code.as_u16()));
    }

    let reason = std::str::from_utf8(&payload[2..])?;
    Ok(Some(CloseFrame::new(code, reason)))
}
