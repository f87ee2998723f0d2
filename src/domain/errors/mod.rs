// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A required external binary could not be started
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("required tool `{tool}` was not found on PATH: {reason}")]
    Missing { tool: String, reason: String },
}

/// Failure of the acquisition stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DownloadError {
    #[error("failed to start `{tool}`: {reason}")]
    Spawn { tool: String, reason: String },

    #[error("downloader exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("downloader timed out after {0:?}")]
    TimedOut(Duration),

    #[error("downloader reported success but {} does not exist", .0.display())]
    MissingOutput(PathBuf),

    #[error("could not prepare cache location {}: {reason}", path.display())]
    CacheDir { path: PathBuf, reason: String },
}

/// Failure of the probe stage; never fatal to the pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("failed to start `{tool}`: {reason}")]
    Spawn { tool: String, reason: String },

    #[error("prober exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("prober timed out after {0:?}")]
    TimedOut(Duration),

    #[error("could not read a duration from prober output: {0}")]
    Unparsable(String),
}

/// Failure of a single clip transcode
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscodeError {
    #[error("failed to start `{tool}`: {reason}")]
    Spawn { tool: String, reason: String },

    #[error("transcoder exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("transcoder timed out after {0:?}")]
    TimedOut(Duration),
}

/// Invalid or unreadable configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: String, reason: String },

    #[error("failed to read config file {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("failed to parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("no source URL configured; pass --url or set `source_url`")]
    MissingSourceUrl,
}
