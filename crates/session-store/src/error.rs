use thiserror::Error;

/// Errors that can occur when reading or writing a session slot.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The backing medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key can't be mapped onto the backing medium.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, SessionStoreError>;
