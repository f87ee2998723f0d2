//! CLI module for BgClip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// BgClip background clip extractor
///
/// Downloads one source video and carves it into short, silent, looping
/// background clips named `bg-clip-1.mp4` … `bg-clip-N.mp4`.
#[derive(Parser, Debug)]
#[command(name = "bgclip")]
#[command(about = "BgClip - carve looping background clips out of a video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./bgclip.toml when present)
    #[arg(long, env = "BGCLIP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, env = "BGCLIP_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download, probe, plan, transcode and report
    Run(args::RunArgs),
    /// Show the clip plan for a duration or a local file
    Plan(args::PlanArgs),
    /// List the clips currently in the output directory
    Report(args::ReportArgs),
}
