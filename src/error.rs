//! Error types for robot command operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoppyError>;

#[derive(Error, Debug)]
pub enum PoppyError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Move '{0}' is already being recorded")]
    AlreadyRecording(String),

    #[error("Status channel is not connected")]
    NotConnected,

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PoppyError {
    fn from(err: reqwest::Error) -> Self {
        PoppyError::Transport(err.to_string())
    }
}

impl PoppyError {
    /// Whether the failure happened before any request was issued
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, PoppyError::InvalidInput(_) | PoppyError::AlreadyRecording(_))
    }
}
