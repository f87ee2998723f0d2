// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;
use crate::domain::rules::clip_file_name;

/// Whole seconds; fractional parts are always truncated
pub type Seconds = u64;

/// The single full-length video all clips are cut from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMedia {
    pub path: PathBuf,
    /// `None` when the prober could not determine a duration
    pub duration: Option<Seconds>,
    /// True when acquisition found the file already cached
    pub cache_hit: bool,
}

impl SourceMedia {
    pub fn new(path: impl Into<PathBuf>, cache_hit: bool) -> Self {
        Self {
            path: path.into(),
            duration: None,
            cache_hit,
        }
    }

    pub fn with_duration(mut self, duration: Option<Seconds>) -> Self {
        self.duration = duration;
        self
    }
}

/// Where a clip source video comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceVariant {
    /// Watch-page URL carrying a numeric video id (`?v=<digits>`)
    #[default]
    Watch,
    /// Short-link URL: a host followed by a single opaque path segment
    ShortLink,
}

impl SourceVariant {
    /// Parse variant from string
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "watch" => Ok(SourceVariant::Watch),
            "short-link" | "short_link" | "short" => Ok(SourceVariant::ShortLink),
            other => Err(ConfigError::Invalid {
                key: "variant".to_string(),
                reason: format!("unknown variant `{}` (expected watch or short-link)", other),
            }),
        }
    }

    /// Default cache file name for a downloaded source of this variant
    pub fn default_cache_file(&self) -> &'static str {
        match self {
            SourceVariant::Watch => "source-watch.mp4",
            SourceVariant::ShortLink => "source-short.mp4",
        }
    }

    /// Check that `url` has the shape this variant expects
    pub fn validate_url(&self, url: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            key: "source_url".to_string(),
            reason: format!("{} ({})", reason, url),
        };

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| invalid("URL must start with http:// or https://"))?;
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if host.is_empty() {
            return Err(invalid("URL has no host"));
        }

        match self {
            SourceVariant::Watch => {
                let query = path
                    .split_once('?')
                    .map(|(_, q)| q)
                    .ok_or_else(|| invalid("watch URL has no query string"))?;
                let has_numeric_id = query.split('&').any(|pair| {
                    pair.strip_prefix("v=")
                        .map(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
                        .unwrap_or(false)
                });
                if has_numeric_id {
                    Ok(())
                } else {
                    Err(invalid(
                        "watch URL needs a numeric `v=` id; alphanumeric ids such as \
                         `watch?v=dQw4w9WgXcQ` are not supported, use the short-link variant",
                    ))
                }
            }
            SourceVariant::ShortLink => {
                // Share links often carry a tracking query such as `?si=...`.
                let path = path.split_once('?').map_or(path, |(p, _)| p);
                let segment = path.trim_end_matches('/');
                if segment.is_empty() || segment.contains('/') {
                    Err(invalid("short link must be a host followed by one path segment"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Display for SourceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceVariant::Watch => write!(f, "watch"),
            SourceVariant::ShortLink => write!(f, "short-link"),
        }
    }
}

/// What to do with a planned offset whose clip would run past the source end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverrunPolicy {
    /// Attempt the clip as planned; the transcode may fail
    #[default]
    Keep,
    /// Move the offset back to `duration - clip_duration`
    Clamp,
}

impl OverrunPolicy {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "keep" => Ok(OverrunPolicy::Keep),
            "clamp" => Ok(OverrunPolicy::Clamp),
            other => Err(ConfigError::Invalid {
                key: "overrun_policy".to_string(),
                reason: format!("unknown policy `{}` (expected keep or clamp)", other),
            }),
        }
    }
}

/// How the start offsets of a plan were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStrategy {
    /// `duration / (N + 1)` spacing
    EvenlySpaced,
    /// Offsets supplied by the operator
    Explicit,
    /// Fixed table used when duration is unknown or short
    Fallback,
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStrategy::EvenlySpaced => write!(f, "evenly-spaced"),
            PlanStrategy::Explicit => write!(f, "explicit"),
            PlanStrategy::Fallback => write!(f, "fallback"),
        }
    }
}

/// One planned clip: 1-based output index and start offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub index: usize,
    pub start: Seconds,
}

/// Ordered start offsets used to carve the source into clips
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipPlan {
    strategy: PlanStrategy,
    clip_duration: Seconds,
    entries: Vec<PlanEntry>,
}

impl ClipPlan {
    /// Build a plan from offsets; indices are assigned 1..=len in order
    pub fn new(strategy: PlanStrategy, clip_duration: Seconds, offsets: &[Seconds]) -> Self {
        let entries = offsets
            .iter()
            .enumerate()
            .map(|(i, &start)| PlanEntry {
                index: i + 1,
                start,
            })
            .collect();

        Self {
            strategy,
            clip_duration,
            entries,
        }
    }

    pub fn strategy(&self) -> PlanStrategy {
        self.strategy
    }

    pub fn clip_duration(&self) -> Seconds {
        self.clip_duration
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn offsets(&self) -> Vec<Seconds> {
        self.entries.iter().map(|e| e.start).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output path for an entry inside `output_dir`
    pub fn output_path(output_dir: &Path, entry: &PlanEntry) -> PathBuf {
        output_dir.join(clip_file_name(entry.index))
    }
}

/// Everything the transcoder needs to produce one clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSpec {
    pub source: PathBuf,
    pub output: PathBuf,
    pub start: Seconds,
    pub duration: Seconds,
    pub width: u32,
    pub fps: u32,
    pub codec: String,
    pub crf: u8,
    pub preset: String,
    pub faststart: bool,
    pub strip_audio: bool,
}

/// Outcome of one clip transcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ClipOutcome {
    Produced,
    Failed(String),
}

/// Result of producing one planned clip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipResult {
    pub index: usize,
    pub start: Seconds,
    pub output: PathBuf,
    pub outcome: ClipOutcome,
}

impl ClipResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ClipOutcome::Produced)
    }
}

/// Whether a listed clip file was written by the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Produced,
    Stale,
    /// Listing made without a run to compare against
    Unverified,
}

/// One `bg-clip-*.mp4` file found in the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub path: PathBuf,
    pub bytes: u64,
    pub freshness: Freshness,
}

/// Summary of one batch run; printed, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub output_dir: PathBuf,
    pub entries: Vec<ReportEntry>,
    pub total_dir_bytes: u64,
    pub results: Vec<ClipResult>,
    pub preview_url: String,
    pub cleanup_hint: Option<String>,
}

impl RunReport {
    pub fn produced_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ClipResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.is_success())
    }
}
