//! Error types for tagtest

use thiserror::Error;

/// Main error type for the test driver
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Empty tag in selection: {0:?}")]
    EmptyTagSelection(String),

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Tag registered twice: {0}")]
    DuplicateTag(String),

    #[error("Devel mode selected but no devel test was registered")]
    MissingDevelTest,

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl DriverError {
    /// Whether this error stems from the command line rather than the environment
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DriverError::UnknownTag(_) | DriverError::EmptyTagSelection(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
