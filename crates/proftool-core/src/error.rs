//! Shared error type across proftool crates.

use thiserror::Error;

/// Stable error codes reported to introspection callers and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed target list line.
    InputFormat,
    /// Attribute name not currently derivable.
    UnknownAttribute,
    /// Completion event without a matching start event.
    CorrelationMiss,
    /// Registration name is not `domain:key=value`.
    InvalidObjectName,
    /// Configuration rejected.
    Config,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Filesystem failure.
    Io,
}

impl ErrorCode {
    /// String representation used in logs and tool output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InputFormat => "INPUT_FORMAT",
            ErrorCode::UnknownAttribute => "UNKNOWN_ATTRIBUTE",
            ErrorCode::CorrelationMiss => "CORRELATION_MISS",
            ErrorCode::InvalidObjectName => "INVALID_OBJECT_NAME",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProfError>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum ProfError {
    #[error("line {line}: {reason}")]
    InputFormat { line: usize, reason: String },
    #[error("attribute not found: {0}")]
    UnknownAttribute(String),
    #[error("no start recorded for {key} (correlation id {id})")]
    CorrelationMiss { key: String, id: u64 },
    #[error("invalid object name: {0}")]
    InvalidObjectName(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("io: {0}")]
    Io(String),
}

impl ProfError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProfError::InputFormat { .. } => ErrorCode::InputFormat,
            ProfError::UnknownAttribute(_) => ErrorCode::UnknownAttribute,
            ProfError::CorrelationMiss { .. } => ErrorCode::CorrelationMiss,
            ProfError::InvalidObjectName(_) => ErrorCode::InvalidObjectName,
            ProfError::Config(_) => ErrorCode::Config,
            ProfError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            ProfError::Io(_) => ErrorCode::Io,
        }
    }
}
