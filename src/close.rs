//! Close status codes and close frame payloads as defined in RFC 6455.

/// WebSocket close status code per RFC 6455 Section 7.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum CloseCode {
    /// Normal closure (1000). The connection successfully completed.
    #[default]
    NormalClosure,
    /// Going away (1001). Endpoint is going away (e.g., server shutdown).
    GoingAway,
    /// Protocol error (1002). Endpoint received a malformed frame.
    ProtocolError,
    /// Invalid message type (1003). Endpoint received a data type it cannot handle.
    InvalidMessageType,
    /// Invalid payload data (1007). E.g., non-UTF-8 bytes in a text message.
    InvalidPayloadData,
    /// Policy violation (1008). Message violates the endpoint's policy.
    PolicyViolation,
    /// Message too big (1009). Message too large to process.
    MessageTooBig,
    /// Mandatory extension (1010). Client expected server to negotiate an extension.
    MandatoryExtension,
    /// Internal error (1011). Endpoint encountered an unexpected condition.
    InternalError,
    /// Any other code (1012-1014 registered, 3000-4999 application-defined).
    Other(u16),
}

impl CloseCode {
    /// Create a `CloseCode` from its numeric value.
    #[must_use]
    pub const fn from_u16(code: u16) -> Self {
        match code {
            1000 => CloseCode::NormalClosure,
            1001 => CloseCode::GoingAway,
            1002 => CloseCode::ProtocolError,
            1003 => CloseCode::InvalidMessageType,
            1007 => CloseCode::InvalidPayloadData,
            1008 => CloseCode::PolicyViolation,
            1009 => CloseCode::MessageTooBig,
            1010 => CloseCode::MandatoryExtension,
            1011 => CloseCode::InternalError,
            other => CloseCode::Other(other),
        }
    }

    /// Get the numeric value of this close code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        match self {
            CloseCode::NormalClosure => 1000,
            CloseCode::GoingAway => 1001,
            CloseCode::ProtocolError => 1002,
            CloseCode::InvalidMessageType => 1003,
            CloseCode::InvalidPayloadData => 1007,
            CloseCode::PolicyViolation => 1008,
            CloseCode::MessageTooBig => 1009,
            CloseCode::MandatoryExtension => 1010,
            CloseCode::InternalError => 1011,
            CloseCode::Other(code) => *code,
        }
    }

    /// Check if this close code may appear in a close frame per
    /// RFC 6455 Section 7.4.1.
    ///
    /// Sendable codes:
    /// - 1000-1003 and 1007-1011: protocol-defined codes
    /// - 1012-1014: registered codes (Service Restart, Try Again Later, Bad Gateway)
    /// - 3000-4999: reserved for libraries/frameworks and applications
    ///
    /// Codes 1004-1006 and 1015 are reserved and MUST NOT be set in a close
    /// frame; codes below 1000, in 1016-2999, and above 4999 are undefined.
    #[must_use]
    pub const fn is_sendable(&self) -> bool {
        let code = self.as_u16();
        matches!(code, 1000..=1003 | 1007..=1014 | 3000..=4999)
    }

    /// Check if this close code is reserved per RFC 6455 Section 7.4.1.
    ///
    /// - 1004: Reserved
    /// - 1005: No Status Received (signalling only, never on the wire)
    /// - 1006: Abnormal Closure (signalling only, never on the wire)
    /// - 1015: TLS Handshake (signalling only, never on the wire)
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        let code = self.as_u16();
        matches!(code, 1004..=1006 | 1015)
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Close frame payload: a status code paired with a UTF-8 reason.
///
/// The reason is limited to 123 encoded bytes so the full control payload
/// (2-byte code + reason) stays within the 125-byte RFC 6455 cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    /// The close status code.
    pub code: CloseCode,
    /// Human-readable reason for closing.
    pub reason: String,
}

impl CloseFrame {
    /// Create a new close frame payload with the given code and reason.
    #[must_use]
    pub fn new(code: CloseCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}
