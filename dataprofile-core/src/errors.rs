//! Error types for dataprofile

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid data format: {0}")]
    InvalidDataFormat(String),

    #[error("Input has no header row: {0}")]
    EmptyInput(String),

    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
}

impl From<::config::ConfigError> for ProfileError {
    fn from(err: ::config::ConfigError) -> Self {
        ProfileError::Configuration(err.to_string())
    }
}
