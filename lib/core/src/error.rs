use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported similarity method: {0}")]
    UnsupportedMethod(String),

    #[error("Missing embeddings: {0}")]
    MissingEmbeddings(String),

    #[error("Invalid vector dimension for candidate {candidate}: expected {expected}, got {actual}")]
    DimensionMismatch {
        candidate: String,
        expected: usize,
        actual: usize,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the failure was caused by the request rather than the server.
    ///
    /// Transport adapters map these to a client-error response class.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_)
                | Error::UnsupportedMethod(_)
                | Error::MissingEmbeddings(_)
        )
    }
}
