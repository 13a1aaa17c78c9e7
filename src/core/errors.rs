use thiserror::Error;

#[derive(Error, Debug)]
pub enum OkcoinError {
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),

    #[error("Client has been stopped")]
    ClientStopped,
}
