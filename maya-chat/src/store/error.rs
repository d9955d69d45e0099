use thiserror::Error;

/// Failure reading or writing persisted chat state. Callers degrade to
/// in-memory history; none of these are fatal.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on blob '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid blob key '{0}'")]
    InvalidKey(String),

    #[error("Blob store unavailable: {0}")]
    Unavailable(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
