use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtratoError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("Server returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Server rejected the request: {message}")]
    Rejected { message: String },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Statement '{0}' not found")]
    StatementNotFound(String),

    #[error("Only PDF files are accepted: '{file}' has type {content_type}")]
    NotPdf { file: String, content_type: String },

    #[error("File '{file}' is {size} bytes; the upload limit is {limit} bytes")]
    FileTooLarge { file: String, size: u64, limit: u64 },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtratoError {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtratoError::Transport { .. } => true,
            ExtratoError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtratoError>;
