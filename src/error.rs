use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the parsing service.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{detail}")]
    Service { status: u16, detail: String },

    #[error("Request failed with status: {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to read file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Text shown to the user after the error marker. Service errors yield
    /// the service's own message, everything else its raw description.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Service { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Transitions the upload/edit workflow refuses to take.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("A request is already in progress")]
    UploadInFlight,

    #[error("No request is awaiting a response")]
    NotAwaitingResponse,

    #[error("No parsed results to reload")]
    NoResults,

    #[error("No operation available to reload")]
    NoOperation,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
