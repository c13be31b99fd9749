//! Error types and the related `Result<T>`

use std::fmt;
use std::io;

use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Name reported by errors the codec raises itself.
pub const COMPONENT: &str = "Codec";

/// Fixed codes carried by errors the codec detects on its own,
/// as opposed to ones passed through from gzip or JSON.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// No value (or an empty buffer) was provided
    DataUndefined = 1,
    /// A bare JSON string was provided where structured data was expected
    InvalidString = 2,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u16)
    }
}

/// What went wrong, without the payload. Handy for `match`ing and comparing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InputMissing,
    InvalidInputType,
    Serialize,
    Compression,
    Decompression,
    Parse,
    #[cfg(feature = "tokio")]
    Task,
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// The value to compress was null, or the buffer to decompress was empty.
    #[error("{} error {}: input is missing", COMPONENT, ErrorCode::DataUndefined)]
    InputMissing,

    /// The value to compress serialized to a bare string.
    /// Strings gain little from gzip; pass them through as-is instead.
    #[error(
        "{} error {}: strings can't be compressed",
        COMPONENT,
        ErrorCode::InvalidString
    )]
    InvalidInputType,

    /// The value couldn't be written as JSON
    /// (its `Serialize` impl failed, or a map had non-string keys).
    #[error("Couldn't serialize value to JSON")]
    Serialize(#[source] serde_json::Error),

    /// The gzip encoder failed
    #[error("Compression failed")]
    Compression(#[source] io::Error),

    /// The buffer wasn't valid gzip data (bad header, corrupt, or truncated)
    #[error("Decompression failed")]
    Decompression(#[source] io::Error),

    /// The buffer decompressed fine, but didn't hold JSON of the expected shape.
    #[error("Couldn't parse decompressed JSON")]
    Parse(#[source] serde_json::Error),

    /// The blocking task running gzip panicked or was cancelled by the runtime.
    #[cfg(feature = "tokio")]
    #[error("Compression task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InputMissing => ErrorKind::InputMissing,
            CodecError::InvalidInputType => ErrorKind::InvalidInputType,
            CodecError::Serialize(_) => ErrorKind::Serialize,
            CodecError::Compression(_) => ErrorKind::Compression,
            CodecError::Decompression(_) => ErrorKind::Decompression,
            CodecError::Parse(_) => ErrorKind::Parse,
            #[cfg(feature = "tokio")]
            CodecError::Task(_) => ErrorKind::Task,
        }
    }

    /// The fixed code for errors the codec raised itself,
    /// or `None` for ones passed through from gzip or JSON.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CodecError::InputMissing => Some(ErrorCode::DataUndefined),
            CodecError::InvalidInputType => Some(ErrorCode::InvalidString),
            _ => None,
        }
    }

    /// The component that raised the error, if it was the codec itself.
    pub fn component(&self) -> Option<&'static str> {
        self.code().map(|_| COMPONENT)
    }
}
