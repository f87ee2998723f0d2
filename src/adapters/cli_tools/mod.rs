//! Command-line tool adapter implementing [`ExternalTool`]

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::download_ytdlp::YtDlpAdapter;
use crate::adapters::exec_ffmpeg::FFmpegAdapter;
use crate::adapters::probe_ffprobe::FFprobeAdapter;
use crate::adapters::process::run_tool;
use crate::config::PipelineConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::ExternalTool;

/// Drives `yt-dlp`, `ffprobe` and `ffmpeg` as child processes
#[derive(Debug, Clone)]
pub struct CommandLineTools {
    downloader: YtDlpAdapter,
    prober: FFprobeAdapter,
    transcoder: FFmpegAdapter,
}

impl CommandLineTools {
    pub fn new(downloader: YtDlpAdapter, prober: FFprobeAdapter, transcoder: FFmpegAdapter) -> Self {
        Self {
            downloader,
            prober,
            transcoder,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        let timeout = config.tool_timeout();
        Self::new(
            YtDlpAdapter::new(&config.tools.downloader, config.target_height, timeout),
            FFprobeAdapter::new(&config.tools.prober, timeout),
            FFmpegAdapter::new(&config.tools.transcoder, timeout),
        )
    }

    /// A tool is considered present when `<program> <version_flag>` can be spawned
    async fn check_tool(program: &str, version_flag: &str) -> Result<(), ToolError> {
        run_tool(program, &[version_flag.to_string()], None)
            .await
            .map(|output| {
                debug!("{} responded with status {:?}", program, output.code);
            })
            .map_err(|failure| ToolError::Missing {
                tool: program.to_string(),
                reason: format!("{:?}", failure),
            })
    }
}

#[async_trait]
impl ExternalTool for CommandLineTools {
    async fn ensure_available(&self) -> Result<(), ToolError> {
        // ffprobe is optional: a missing prober only means an unknown duration.
        Self::check_tool(self.downloader.program(), "--version").await?;
        Self::check_tool(self.transcoder.program(), "-version").await?;
        Ok(())
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.downloader.download(url, dest).await
    }

    async fn probe_duration(&self, path: &Path) -> Result<Seconds, ProbeError> {
        self.prober.probe_duration(path).await
    }

    async fn transcode(&self, spec: &TranscodeSpec) -> Result<(), TranscodeError> {
        self.transcoder.transcode(spec).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::ToolPaths;

    #[tokio::test]
    async fn test_missing_downloader_is_reported() {
        let config = PipelineConfig {
            tools: ToolPaths {
                downloader: "bgclip-missing-downloader".to_string(),
                prober: "ffprobe".to_string(),
                transcoder: "sh".to_string(),
            },
            ..Default::default()
        };
        let tools = CommandLineTools::from_config(&config);
        let err = tools.ensure_available().await.unwrap_err();
        assert!(matches!(err, ToolError::Missing { ref tool, .. } if tool == "bgclip-missing-downloader"));
    }
}
