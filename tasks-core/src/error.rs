use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a request can fail with. Handlers match exhaustively and
/// convert each variant into a structured JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The HTTP verb does not match the endpoint.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// No record exists for the given key. Also the outcome when a record
    /// vanishes between the existence check and the conditional write.
    #[error("Task not found: {pk}")]
    NotFound { pk: String },

    /// The backing store failed; carries the underlying cause.
    #[error("store request failed: {0}")]
    Store(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn store(cause: impl Into<String>) -> Self {
        Error::Store(cause.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::MethodNotAllowed => 405,
            Error::NotFound { .. } => 404,
            Error::Store(_) => 500,
        }
    }
}
