//! Pipeline configuration
//!
//! [`PipelineConfig`] is built once from defaults and a stack of
//! [`ConfigOverlay`] layers (file, environment, command line) and is
//! read-only afterwards.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;
use crate::domain::model::{OverrunPolicy, Seconds, SourceVariant};

/// Offsets used when the source duration is unknown or too short
pub const DEFAULT_FALLBACK_OFFSETS: [Seconds; 5] = [5, 10, 15, 20, 25];

/// Upper bound on `clip_count` and on the number of explicit offsets
pub const MAX_CLIP_COUNT: usize = 1000;

/// External binaries invoked by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub downloader: String,
    pub prober: String,
    pub transcoder: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            downloader: "yt-dlp".to_string(),
            prober: "ffprobe".to_string(),
            transcoder: "ffmpeg".to_string(),
        }
    }
}

/// Immutable configuration for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source_url: Option<String>,
    pub variant: SourceVariant,
    /// Explicit cache location; defaults to the variant's file name
    pub cache_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Maximum height requested from the downloader
    pub target_height: u32,
    pub width: u32,
    pub fps: u32,
    pub codec: String,
    pub crf: u8,
    pub preset: String,
    pub clip_count: usize,
    pub clip_duration: Seconds,
    /// Sources shorter than this use `fallback_offsets`
    pub min_duration: Seconds,
    pub fallback_offsets: Vec<Seconds>,
    /// Operator-supplied offsets; selects the explicit strategy
    pub offsets: Option<Vec<Seconds>>,
    pub overrun_policy: OverrunPolicy,
    /// Concurrent transcodes; 0 means one per CPU
    pub max_parallel: usize,
    pub tool_timeout_secs: Option<u64>,
    pub preview_url: String,
    pub tools: ToolPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            variant: SourceVariant::Watch,
            cache_path: None,
            output_dir: PathBuf::from("static/videos"),
            target_height: 720,
            width: 1280,
            fps: 20,
            codec: "libx264".to_string(),
            crf: 28,
            preset: "slow".to_string(),
            clip_count: 5,
            clip_duration: 5,
            min_duration: 30,
            fallback_offsets: DEFAULT_FALLBACK_OFFSETS.to_vec(),
            offsets: None,
            overrun_policy: OverrunPolicy::Keep,
            max_parallel: 1,
            tool_timeout_secs: None,
            preview_url: "http://localhost:3000".to_string(),
            tools: ToolPaths::default(),
        }
    }
}

impl PipelineConfig {
    /// Layer `overlay` on top of this configuration
    pub fn apply(mut self, overlay: ConfigOverlay) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = overlay.$field { self.$field = v; })*
            };
        }
        take!(
            variant,
            output_dir,
            target_height,
            width,
            fps,
            codec,
            crf,
            preset,
            clip_count,
            clip_duration,
            min_duration,
            fallback_offsets,
            overrun_policy,
            max_parallel,
            preview_url
        );

        if overlay.source_url.is_some() {
            self.source_url = overlay.source_url;
        }
        if overlay.cache_path.is_some() {
            self.cache_path = overlay.cache_path;
        }
        if overlay.offsets.is_some() {
            self.offsets = overlay.offsets;
        }
        if overlay.tool_timeout_secs.is_some() {
            self.tool_timeout_secs = overlay.tool_timeout_secs;
        }
        if let Some(v) = overlay.downloader {
            self.tools.downloader = v;
        }
        if let Some(v) = overlay.prober {
            self.tools.prober = v;
        }
        if let Some(v) = overlay.transcoder {
            self.tools.transcoder = v;
        }
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, reason: &str| {
            Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.clip_count == 0 {
            return invalid("clip_count", "must be at least 1");
        }
        if self.clip_count > MAX_CLIP_COUNT {
            return invalid("clip_count", &format!("cannot exceed {}", MAX_CLIP_COUNT));
        }
        if self.clip_duration == 0 {
            return invalid("clip_duration", "must be at least 1 second");
        }
        if self.width == 0 || self.width % 2 != 0 {
            return invalid("width", "must be a positive even number");
        }
        if self.fps == 0 {
            return invalid("fps", "must be positive");
        }
        if self.target_height == 0 {
            return invalid("target_height", "must be positive");
        }
        if self.crf > 51 {
            return invalid("crf", "cannot exceed 51");
        }
        if self.fallback_offsets.is_empty() {
            return invalid("fallback_offsets", "cannot be empty");
        }
        if let Some(offsets) = &self.offsets {
            if offsets.is_empty() {
                return invalid("offsets", "cannot be empty when given");
            }
            if offsets.len() > MAX_CLIP_COUNT {
                return invalid("offsets", &format!("cannot list more than {}", MAX_CLIP_COUNT));
            }
        }
        if let Some(url) = &self.source_url {
            self.variant.validate_url(url)?;
        }
        Ok(())
    }

    /// Source URL, required by the acquisition stage
    pub fn require_source_url(&self) -> Result<&str, ConfigError> {
        let url = self
            .source_url
            .as_deref()
            .ok_or(ConfigError::MissingSourceUrl)?;
        self.variant.validate_url(url)?;
        Ok(url)
    }

    /// Where the downloaded source video is cached
    pub fn resolved_cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.variant.default_cache_file()))
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }

    /// Number of transcodes allowed to run at once
    pub fn parallelism(&self) -> usize {
        match self.max_parallel {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

/// A partial configuration layer; `None` leaves the lower layer's value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverlay {
    pub source_url: Option<String>,
    pub variant: Option<SourceVariant>,
    pub cache_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub target_height: Option<u32>,
    pub width: Option<u32>,
    pub fps: Option<u32>,
    pub codec: Option<String>,
    pub crf: Option<u8>,
    pub preset: Option<String>,
    pub clip_count: Option<usize>,
    pub clip_duration: Option<Seconds>,
    pub min_duration: Option<Seconds>,
    pub fallback_offsets: Option<Vec<Seconds>>,
    pub offsets: Option<Vec<Seconds>>,
    pub overrun_policy: Option<OverrunPolicy>,
    pub max_parallel: Option<usize>,
    pub tool_timeout_secs: Option<u64>,
    pub preview_url: Option<String>,
    pub downloader: Option<String>,
    pub prober: Option<String>,
    pub transcoder: Option<String>,
}

/// Prefix of every environment variable read by [`ConfigOverlay::from_env_with`]
pub const ENV_PREFIX: &str = "BGCLIP_";

impl ConfigOverlay {
    /// Build an overlay from environment variables, read through `lookup`
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key.to_uppercase()));

        Ok(Self {
            source_url: get("source_url"),
            variant: get("variant")
                .map(|v| SourceVariant::parse(&v))
                .transpose()?,
            cache_path: get("cache_path").map(PathBuf::from),
            output_dir: get("output_dir").map(PathBuf::from),
            target_height: parse_env(&get, "target_height")?,
            width: parse_env(&get, "width")?,
            fps: parse_env(&get, "fps")?,
            codec: get("codec"),
            crf: parse_env(&get, "crf")?,
            preset: get("preset"),
            clip_count: parse_env(&get, "clip_count")?,
            clip_duration: parse_env(&get, "clip_duration")?,
            min_duration: parse_env(&get, "min_duration")?,
            fallback_offsets: get("fallback_offsets")
                .map(|v| parse_offsets(&v))
                .transpose()?,
            offsets: get("offsets").map(|v| parse_offsets(&v)).transpose()?,
            overrun_policy: get("overrun_policy")
                .map(|v| OverrunPolicy::parse(&v))
                .transpose()?,
            max_parallel: parse_env(&get, "max_parallel")?,
            tool_timeout_secs: parse_env(&get, "tool_timeout_secs")?,
            preview_url: get("preview_url"),
            downloader: get("downloader"),
            prober: get("prober"),
            transcoder: get("transcoder"),
        })
    }

    /// Overlay from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Number of fields this layer sets
    pub fn len(&self) -> usize {
        [
            self.source_url.is_some(),
            self.variant.is_some(),
            self.cache_path.is_some(),
            self.output_dir.is_some(),
            self.target_height.is_some(),
            self.width.is_some(),
            self.fps.is_some(),
            self.codec.is_some(),
            self.crf.is_some(),
            self.preset.is_some(),
            self.clip_count.is_some(),
            self.clip_duration.is_some(),
            self.min_duration.is_some(),
            self.fallback_offsets.is_some(),
            self.offsets.is_some(),
            self.overrun_policy.is_some(),
            self.max_parallel.is_some(),
            self.tool_timeout_secs.is_some(),
            self.preview_url.is_some(),
            self.downloader.is_some(),
            self.prober.is_some(),
            self.transcoder.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_env<T, G>(get: &G, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                reason: format!("`{}`: {}", raw, e),
            })
        })
        .transpose()
}

/// Parse a comma separated list of whole seconds, e.g. `5,10,15`
pub fn parse_offsets(value: &str) -> Result<Vec<Seconds>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Seconds>().map_err(|e| ConfigError::Invalid {
                key: "offsets".to_string(),
                reason: format!("`{}`: {}", s, e),
            })
        })
        .collect()
}
