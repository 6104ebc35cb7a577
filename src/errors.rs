use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("MongoDB: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("Unknown explain verbosity: {0}")]
    UnknownVerbosity(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl From<std::io::Error> for UsageError {
    fn from(e: std::io::Error) -> Self {
        UsageError::Io(e.to_string())
    }
}
