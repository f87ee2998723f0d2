// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the external media tools the pipeline drives
///
/// The pipeline depends only on this trait; the shipped adapter shells out
/// to `yt-dlp`, `ffprobe` and `ffmpeg`, tests substitute fakes.
#[async_trait]
pub trait ExternalTool: Send + Sync {
    /// Fail if a binary the pipeline cannot run without is missing
    async fn ensure_available(&self) -> Result<(), ToolError>;

    /// Fetch `url` into `dest`
    async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;

    /// Duration of the media at `path`, fractional part truncated
    async fn probe_duration(&self, path: &Path) -> Result<Seconds, ProbeError>;

    /// Produce one clip as described by `spec`, overwriting its output
    async fn transcode(&self, spec: &TranscodeSpec) -> Result<(), TranscodeError>;
}
