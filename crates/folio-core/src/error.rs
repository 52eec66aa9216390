use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Storage quota exceeded: writing '{key}' needs {needed} bytes, quota is {quota}")]
    QuotaExceeded { key: String, needed: usize, quota: usize },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("A '{0}' request is already in flight")]
    RequestInFlight(&'static str),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;
