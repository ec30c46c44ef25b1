//! Data message kinds and receive results.

use crate::close::CloseCode;

/// Kind of a data message carried over the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A text message (UTF-8 encoded).
    Text,
    /// A binary message (arbitrary bytes).
    Binary,
}

/// Result of a single receive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Received {
    /// A chunk of application data was copied into the caller's buffer.
    Data {
        /// Kind of the message this chunk belongs to.
        kind: MessageKind,
        /// Number of bytes copied into the buffer.
        len: usize,
        /// Whether this chunk completes the message.
        ///
        /// `false` when the frame payload exceeded the buffer and the
        /// remainder will be delivered by subsequent receives.
        end_of_message: bool,
    },
    /// The peer's close frame arrived.
    ///
    /// Carries the close metadata recorded on the connection, which is the
    /// locally sent close if that was recorded first.
    Close {
        /// Recorded close status code, absent for an empty close payload.
        code: Option<CloseCode>,
        /// Recorded close reason, empty if the peer sent none.
        reason: String,
    },
}

impl Received {
    /// Returns `true` if this result carries application data.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Received::Data { .. })
    }

    /// Returns `true` if this result is the peer's close frame.
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self, Received::Close { .. })
    }

    /// Number of payload bytes delivered; zero for a close result.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Received::Data { len, .. } => *len,
            Received::Close { .. } => 0,
        }
    }

    /// Returns `true` if no payload bytes were delivered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_received_data() {
        let received = Received::Data {
            kind: MessageKind::Text,
            len: 5,
            end_of_message: true,
        };
        assert!(received.is_data());
        assert!(!received.is_close());
        assert_eq!(received.len(), 5);
        assert!(!received.is_empty());
    }

    #[test]
    fn test_received_close() {
        let received = Received::Close {
            code: Some(CloseCode::NormalClosure),
            reason: String::from("bye"),
        };
        assert!(received.is_close());
        assert!(!received.is_data());
        assert_eq!(received.len(), 0);
        assert!(received.is_empty());
    }
}
