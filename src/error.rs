use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Authentication failed. Please sign in.")]
    AuthError,
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("{0}")]
    ProviderError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LogoError {
    /// Status code used when this error is surfaced by an API route.
    pub fn status_code(&self) -> u16 {
        match self {
            LogoError::ValidationError(_) => 400,
            LogoError::AuthError => 401,
            LogoError::HttpError { status, .. } => *status,
            _ => 500,
        }
    }
}

impl From<std::io::Error> for LogoError {
    fn from(err: std::io::Error) -> Self {
        LogoError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LogoError>;
