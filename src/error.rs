//! Error types for ledgerwire

use thiserror::Error;

/// Malformed-input failures raised while reading wire bytes.
///
/// Offsets are byte positions into the buffer handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("cannot decode empty input")]
    Empty,
    #[error("input ended unexpectedly at offset {0}")]
    UnexpectedEof(usize),
    #[error("non-canonical length prefix at offset {0}")]
    NonCanonical(usize),
    #[error("length prefix at offset {0} does not fit in memory")]
    LengthOverflow(usize),
    #[error("expected a byte string at offset {0}, found a list")]
    ExpectedBytes(usize),
    #[error("expected a list at offset {0}, found a byte string")]
    ExpectedList(usize),
    #[error("scalar at offset {offset} has a leading zero byte")]
    LeadingZero { offset: usize },
    #[error("scalar at offset {offset} does not fit in {target}")]
    ScalarOverflow { offset: usize, target: &'static str },
    #[error("{0} trailing bytes after top-level item")]
    TrailingBytes(usize),
    #[error("list ending at offset {0} still has unread items")]
    UnconsumedItems(usize),
    #[error("leave_list called without a matching enter_list")]
    NotInList,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),
    #[error("{field} must be 0 or 1, got {value}")]
    InvalidFlag { field: &'static str, value: u64 },
    #[error("unknown {kind} code {code}")]
    UnknownCode { kind: &'static str, code: u64 },
    #[error("payload list is missing its kind code")]
    MissingPayloadKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Malformed input: {0}")]
    Malformed(#[from] DecodeError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Validation error: {0} is required")]
    MissingField(&'static str),
    #[error("Cryptographic error: {0}")]
    Crypto(String),
    #[error("Signing error: {0}")]
    Signing(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChainError {
    /// True for failures caused by bad bytes rather than bad keys or bad drafts.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ChainError::Malformed(_))
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, ChainError::Crypto(_))
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
