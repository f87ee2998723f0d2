//! FFmpeg execution adapter
//!
//! Each call produces exactly one clip. The output path is always
//! overwritten (`-y`).

use std::time::Duration;

use tracing::debug;

use crate::adapters::process::{run_tool, ProcessFailure};
use crate::domain::errors::TranscodeError;
use crate::domain::model::TranscodeSpec;
use crate::utils::Utils;

/// FFmpeg-based clip transcoder
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    program: String,
    timeout: Option<Duration>,
}

impl FFmpegAdapter {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Video filter chain: scale to `width` keeping aspect with an even height, then resample
    pub fn video_filter(spec: &TranscodeSpec) -> String {
        format!("scale={}:-2,fps={}", spec.width, spec.fps)
    }

    pub fn build_args(spec: &TranscodeSpec) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-ss".into(),
            spec.start.to_string(),
            "-i".into(),
            spec.source.to_string_lossy().into_owned(),
            "-t".into(),
            spec.duration.to_string(),
            "-vf".into(),
            Self::video_filter(spec),
            "-c:v".into(),
            spec.codec.clone(),
            "-crf".into(),
            spec.crf.to_string(),
            "-preset".into(),
            spec.preset.clone(),
        ];

        if spec.strip_audio {
            args.push("-an".into());
        }
        if spec.faststart {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }

        args.push(spec.output.to_string_lossy().into_owned());
        args
    }

    pub async fn transcode(&self, spec: &TranscodeSpec) -> Result<(), TranscodeError> {
        let args = Self::build_args(spec);
        let output = run_tool(&self.program, &args, self.timeout)
            .await
            .map_err(|failure| match failure {
                ProcessFailure::Spawn(reason) => TranscodeError::Spawn {
                    tool: self.program.clone(),
                    reason,
                },
                ProcessFailure::TimedOut(limit) => TranscodeError::TimedOut(limit),
            })?;

        if !output.success {
            return Err(TranscodeError::Failed {
                code: output.code,
                stderr: Utils::tail_lines(&output.stderr, 3),
            });
        }

        debug!("Wrote {}", spec.output.display());
        Ok(())
    }
}
