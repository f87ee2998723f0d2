//! Error handling module for BgClip

use thiserror::Error;

use crate::domain::errors::{ConfigError, DownloadError, ToolError};

/// Fatal errors that stop the pipeline
///
/// Per-clip transcode failures and unknown durations never surface here;
/// they are recorded in the [`RunReport`](crate::domain::model::RunReport).
#[derive(Error, Debug)]
pub enum BgClipError {
    /// A required external binary is missing
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The source video could not be acquired
    #[error("acquisition failed: {0}")]
    Download(#[from] DownloadError),

    /// Configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output directory could not be created or listed
    #[error("output error: {message}")]
    OutputError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for BgClip operations
pub type BgClipResult<T> = std::result::Result<T, BgClipError>;
