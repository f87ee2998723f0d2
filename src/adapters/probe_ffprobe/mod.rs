//! FFprobe adapter for media duration probing

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::process::{run_tool, ProcessFailure};
use crate::domain::errors::ProbeError;
use crate::domain::model::Seconds;
use crate::utils::Utils;

/// FFprobe-based duration prober
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    program: String,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FFprobeAdapter {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn build_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "json".to_string(),
            path.to_string_lossy().into_owned(),
        ]
    }

    /// Extract the container duration from ffprobe JSON, truncating fractions
    pub fn parse_duration(json: &str) -> Result<Seconds, ProbeError> {
        let parsed: ProbeOutput = serde_json::from_str(json)
            .map_err(|e| ProbeError::Unparsable(e.to_string()))?;

        let raw = parsed
            .format
            .and_then(|f| f.duration)
            .ok_or_else(|| ProbeError::Unparsable("no format.duration entry".to_string()))?;

        let seconds: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ProbeError::Unparsable(format!("duration `{}` is not a number", raw)))?;

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ProbeError::Unparsable(format!(
                "duration `{}` is out of range",
                raw
            )));
        }

        Ok(seconds.trunc() as Seconds)
    }

    pub async fn probe_duration(&self, path: &Path) -> Result<Seconds, ProbeError> {
        let output = run_tool(&self.program, &Self::build_args(path), self.timeout)
            .await
            .map_err(|failure| match failure {
                ProcessFailure::Spawn(reason) => ProbeError::Spawn {
                    tool: self.program.clone(),
                    reason,
                },
                ProcessFailure::TimedOut(limit) => ProbeError::TimedOut(limit),
            })?;

        if !output.success {
            return Err(ProbeError::Failed {
                code: output.code,
                stderr: Utils::tail_lines(&output.stderr, 3),
            });
        }

        Self::parse_duration(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_truncates() {
        let json = r#"{ "format": { "duration": "179.966000" } }"#;
        assert_eq!(FFprobeAdapter::parse_duration(json).unwrap(), 179);
    }

    #[test]
    fn test_parse_duration_whole_seconds() {
        let json = r#"{"format":{"duration":"120.000000"}}"#;
        assert_eq!(FFprobeAdapter::parse_duration(json).unwrap(), 120);
    }

    #[test]
    fn test_parse_duration_missing_entry() {
        assert!(FFprobeAdapter::parse_duration(r#"{"format":{}}"#).is_err());
        assert!(FFprobeAdapter::parse_duration("{}").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(FFprobeAdapter::parse_duration("").is_err());
        assert!(FFprobeAdapter::parse_duration(r#"{"format":{"duration":"N/A"}}"#).is_err());
        assert!(FFprobeAdapter::parse_duration(r#"{"format":{"duration":"-4.0"}}"#).is_err());
    }

    #[test]
    fn test_build_args_ends_with_path() {
        let args = FFprobeAdapter::build_args(Path::new("source.mp4"));
        assert_eq!(args.last().map(String::as_str), Some("source.mp4"));
        assert!(args.contains(&"format=duration".to_string()));
    }
}
