//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::config::ConfigOverlay;
use crate::domain::errors::ConfigError;
use crate::domain::model::{OverrunPolicy, Seconds, SourceVariant};

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source URL scheme: watch or short-link
    #[arg(long)]
    pub variant: Option<String>,

    /// Source video URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Directory receiving bg-clip-N.mp4 files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Where the downloaded source video is cached
    #[arg(long)]
    pub cache_path: Option<PathBuf>,

    /// Explicit start offsets in seconds, e.g. 5,40,95
    #[arg(long, value_delimiter = ',')]
    pub offsets: Option<Vec<Seconds>>,

    /// Concurrent transcodes (0 = one per CPU)
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Offsets running past the source end: keep or clamp
    #[arg(long)]
    pub overrun_policy: Option<String>,

    /// Timeout in seconds for each external tool call
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Exit with status 2 when any clip failed
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Configuration layer for the values given on the command line
    pub fn to_overlay(&self) -> Result<ConfigOverlay, ConfigError> {
        Ok(ConfigOverlay {
            source_url: self.url.clone(),
            variant: self
                .variant
                .as_deref()
                .map(SourceVariant::parse)
                .transpose()?,
            cache_path: self.cache_path.clone(),
            output_dir: self.output_dir.clone(),
            offsets: self.offsets.clone(),
            max_parallel: self.parallel,
            overrun_policy: self
                .overrun_policy
                .as_deref()
                .map(OverrunPolicy::parse)
                .transpose()?,
            tool_timeout_secs: self.timeout,
            ..Default::default()
        })
    }
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Source duration in whole seconds
    #[arg(short, long, conflicts_with = "input")]
    pub duration: Option<Seconds>,

    /// Local video file to probe for its duration
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Explicit start offsets in seconds
    #[arg(long, value_delimiter = ',')]
    pub offsets: Option<Vec<Seconds>>,

    /// Number of clips
    #[arg(long)]
    pub clip_count: Option<usize>,

    /// Offsets running past the source end: keep or clamp
    #[arg(long)]
    pub overrun_policy: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn to_overlay(&self) -> Result<ConfigOverlay, ConfigError> {
        Ok(ConfigOverlay {
            offsets: self.offsets.clone(),
            clip_count: self.clip_count,
            overrun_policy: self
                .overrun_policy
                .as_deref()
                .map(OverrunPolicy::parse)
                .transpose()?,
            ..Default::default()
        })
    }
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Directory holding bg-clip-N.mp4 files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn to_overlay(&self) -> ConfigOverlay {
        ConfigOverlay {
            output_dir: self.output_dir.clone(),
            ..Default::default()
        }
    }
}
