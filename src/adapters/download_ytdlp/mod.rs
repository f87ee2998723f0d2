//! yt-dlp adapter for source acquisition

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::process::{run_tool, ProcessFailure};
use crate::domain::errors::DownloadError;
use crate::utils::Utils;

/// Downloads a single progressive mp4 no taller than `target_height`
#[derive(Debug, Clone)]
pub struct YtDlpAdapter {
    program: String,
    target_height: u32,
    timeout: Option<Duration>,
}

impl YtDlpAdapter {
    pub fn new(program: impl Into<String>, target_height: u32, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            target_height,
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Format selector: best video+audio at or below the target height
    pub fn format_selector(&self) -> String {
        format!(
            "bestvideo[height<={h}]+bestaudio/best[height<={h}]",
            h = self.target_height
        )
    }

    /// Command-line arguments for downloading `url` into `dest`
    pub fn build_args(&self, url: &str, dest: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.format_selector(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            dest.to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }

    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        info!("Downloading {} to {}", url, dest.display());

        let args = self.build_args(url, dest);
        let output = run_tool(&self.program, &args, self.timeout)
            .await
            .map_err(|failure| match failure {
                ProcessFailure::Spawn(reason) => DownloadError::Spawn {
                    tool: self.program.clone(),
                    reason,
                },
                ProcessFailure::TimedOut(limit) => DownloadError::TimedOut(limit),
            })?;

        if !output.success {
            return Err(DownloadError::Failed {
                code: output.code,
                stderr: Utils::tail_lines(&output.stderr, 5),
            });
        }
        debug!("{} output: {}", self.program, Utils::tail_lines(&output.stdout, 3));

        Ok(())
    }
}
