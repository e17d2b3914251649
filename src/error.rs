use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Unrecognized response shape: {0}")]
    Malformed(String),

    #[error("Remote call failed: {0}")]
    TransportFailure(String),

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
