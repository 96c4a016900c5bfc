use thiserror::Error;

/// Errors returned by message decoding and construction.
///
/// # Examples
/// ```
/// use pacmon_core::FormatError;
///
/// let err = FormatError::UnknownMessageType { tag: b'X' };
/// assert!(err.to_string().contains("unknown message type"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("truncated message: need {needed} bytes, got {actual}")]
    TruncatedMessage { needed: usize, actual: usize },
    #[error("unknown message type tag 0x{tag:02x}")]
    UnknownMessageType { tag: u8 },
    #[error("unknown word type tag 0x{tag:02x} at word {index}")]
    UnknownWordType { index: usize, tag: u8 },
    #[error("trailing bytes: message is {expected} bytes, buffer has {actual}")]
    TrailingBytes { expected: usize, actual: usize },
    #[error("too many words for one message: {count} (max 65535)")]
    TooManyWords { count: usize },
}
