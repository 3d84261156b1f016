use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("text exceeds {max} characters (got {actual})")]
    TextTooLong { max: usize, actual: usize },

    #[error("list exceeds {max} entries (got {actual})")]
    TooManyEntries { max: usize, actual: usize },

    #[error("profile is incomplete: identifier, region and expertise must be non-empty and capacity at least 1")]
    IncompleteProfile,

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
