//! BgClip Library
//!
//! Acquires one source video, probes its duration, plans evenly spaced (or
//! explicit) start offsets and transcodes short, silent, looping background
//! clips with external `yt-dlp`, `ffprobe` and `ffmpeg` binaries.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::PipelineInteractor;
pub use config::PipelineConfig;
pub use domain::errors::{ConfigError, DownloadError, ProbeError, ToolError, TranscodeError};
pub use domain::model::{
    ClipOutcome, ClipPlan, ClipResult, Freshness, PlanEntry, PlanStrategy, RunReport, Seconds,
    SourceMedia, TranscodeSpec,
};
pub use error::{BgClipError, BgClipResult};
pub use ports::ExternalTool;
