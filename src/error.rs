use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaterBoxError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("mismatch: {0}")]
    Mismatch(String),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

pub type WaterBoxResult<T> = Result<T, WaterBoxError>;
