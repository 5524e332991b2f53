use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("stats unavailable for collection '{collection}': {reason}")]
    PartialStats { collection: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// True for the failures that mean the database could not be reached or
    /// rejected the query.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Mongo(_) | Error::Connection(_) | Error::Timeout(_))
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArgument(_) | Error::Config(_) => 2,
            Error::Cancelled => 130,
            _ => 1,
        }
    }
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
