use serde::Serialize;
use thiserror::Error;

/// Recoverable failures met while turning a received frame into a message.
///
/// None of these end a session: the offending frame is dropped and the
/// failure is reported to the sink as a `FeedEvent::ParseError`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum ParseError {
    /// Checksum mismatch (only raised when strict verification is on)
    #[error("checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    MalformedMessage { expected: u8, actual: u8 },

    /// A recognized label had no numeric token next to it
    #[error("no numeric value after label '{label}'")]
    UnparsableField { label: String },

    /// Bytes that match none of the known message shapes
    #[error("unknown message shape: {reason}")]
    UnknownMessageShape { reason: String },
}

impl ParseError {
    pub fn unparsable(label: &str) -> Self {
        ParseError::UnparsableField {
            label: label.to_string(),
        }
    }

    pub fn unknown_shape(reason: impl Into<String>) -> Self {
        ParseError::UnknownMessageShape {
            reason: reason.into(),
        }
    }
}
