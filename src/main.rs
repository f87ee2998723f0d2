//! BgClip CLI
//!
//! Carves looping background clips for a website out of one downloaded video.
//!
//! # Usage
//!
//! ```bash
//! bgclip run --url "https://www.example.com/watch/?v=1234567890"
//! bgclip run --variant short-link --url "https://short.example/AbC123"
//! bgclip plan --duration 180
//! bgclip report --output-dir static/videos
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use bgclip_cli::adapters::tracing_log::init_logging;
use bgclip_cli::cli::{commands, Cli, Commands};

/// Main entry point for the BgClip CLI application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level, cli.log_json) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting BgClip");

    let config_file = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run(args) => commands::run(config_file, args).await,
        Commands::Plan(args) => commands::plan(config_file, args).await,
        Commands::Report(args) => commands::report(config_file, args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
