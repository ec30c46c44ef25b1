//! WebSocket close-handshake state machine as defined in RFC 6455 Section 7.

/// WebSocket connection state.
///
/// States advance monotonically along
/// `Open -> {CloseSent, CloseReceived} -> Closed`; `Aborted` absorbs from
/// any non-terminal state on protocol violation, cancellation, or I/O
/// failure. No operation ever observes a rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ConnectionState {
    /// Connection is open in both directions.
    #[default]
    Open,
    /// Local close frame sent, waiting for the peer's close frame.
    CloseSent,
    /// Peer's close frame received, local close frame not yet sent.
    CloseReceived,
    /// Close handshake completed in both directions.
    Closed,
    /// Connection torn down without completing the close handshake.
    Aborted,
}

impl ConnectionState {
    /// Check if sending application data is allowed in this state.
    ///
    /// Sending stays permitted after the peer's close arrived but before
    /// the local close was sent (half-closed for receive, open for send).
    #[must_use]
    #[inline]
    pub const fn can_send(&self) -> bool {
        matches!(self, ConnectionState::Open | ConnectionState::CloseReceived)
    }

    /// Check if receiving is allowed in this state.
    ///
    /// Receiving stays permitted after the local close was sent, until the
    /// peer's close frame arrives.
    #[must_use]
    #[inline]
    pub const fn can_receive(&self) -> bool {
        matches!(self, ConnectionState::Open | ConnectionState::CloseSent)
    }

    /// Check if a close frame may still be sent in this state.
    #[must_use]
    #[inline]
    pub const fn can_send_close(&self) -> bool {
        matches!(self, ConnectionState::Open | ConnectionState::CloseReceived)
    }

    /// Check if this is a terminal state (`Closed` or `Aborted`).
    #[must_use]
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Aborted)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Open => write!(f, "Open"),
            ConnectionState::CloseSent => write!(f, "CloseSent"),
            ConnectionState::CloseReceived => write!(f, "CloseReceived"),
            ConnectionState::Closed => write!(f, "Closed"),
            ConnectionState::Aborted => write!(f, "Aborted"),
        }
    }
}
