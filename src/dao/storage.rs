use std::error::Error;
use thiserror::Error;

/// Result alias for catalog storage calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend-agnostic failure surfaced by a [`GameStore`](super::game_store::GameStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Wrap any backend failure as an unavailable error.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
