use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&str> for QuillError {
    fn from(err: &str) -> Self {
        QuillError::Internal(err.to_string())
    }
}

impl From<String> for QuillError {
    fn from(err: String) -> Self {
        QuillError::Internal(err)
    }
}

pub type Result<T> = std::result::Result<T, QuillError>;
