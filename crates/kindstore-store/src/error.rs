use kindstore_kv::KvError;
use kindstore_types::{CodecError, KeyError};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No stored entry matches the requested id or name.
    #[error("object not found: {query}")]
    NotFound { query: String },

    /// A kind does not map to any registered record variant.
    #[error("unknown object kind: {0}")]
    UnknownKind(String),

    /// A stored payload could not be decoded into its variant.
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode object: {0}")]
    Encode(#[source] CodecError),

    /// A kind or id cannot be used as a key component.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// The backing key-value service failed.
    #[error("backend error: {0}")]
    Backend(#[from] KvError),

    /// The caller's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The store was built with an unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn not_found_id(id: &str) -> Self {
        Self::NotFound {
            query: format!("id {id:?}"),
        }
    }

    pub(crate) fn not_found_name(name: &str) -> Self {
        Self::NotFound {
            query: format!("name {name:?}"),
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the caller's context ended the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
