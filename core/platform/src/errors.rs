use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("logging error: {0}")]
    Logging(String),

    #[error("invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
}

pub type PlatformResult<T> = Result<T, PlatformError>;
