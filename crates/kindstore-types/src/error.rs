use thiserror::Error;

/// Errors produced when building or parsing storage keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("kind must not be empty")]
    EmptyKind,

    #[error("id must not be empty")]
    EmptyId,

    #[error("invalid kind {kind:?}: must not contain ':'")]
    InvalidKind { kind: String },

    #[error("invalid id {id:?}: must not contain ':'")]
    InvalidId { id: String },

    #[error("malformed entry key: {0:?}")]
    Malformed(String),
}

/// Errors produced while encoding or decoding a record payload.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("kind mismatch: expected {expected}, payload says {found}")]
    KindMismatch { expected: String, found: String },
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
