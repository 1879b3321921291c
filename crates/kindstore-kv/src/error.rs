/// Errors from the backing key-value service.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// Could not obtain a connection to the backend.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend rejected or failed a command.
    #[error("command {command} failed: {reason}")]
    Command { command: &'static str, reason: String },

    /// `incr` was applied to a value that is not a decimal integer.
    #[error("value at {key} is not an integer")]
    NotAnInteger { key: String },

    /// A shared lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for key-value operations.
pub type KvResult<T> = Result<T, KvError>;
