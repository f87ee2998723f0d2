//! Command implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::args::{PlanArgs, ReportArgs, RunArgs};
use crate::config_initialization::initialize_configuration;
use crate::domain::model::{ClipPlan, RunReport};
use crate::output::report::render_text;
use crate::output::ReportBuilder;
use crate::utils::Utils;

/// Exit status used by `run --strict` when at least one clip failed
pub const EXIT_CLIP_FAILURES: u8 = 2;

/// Execute the run command
pub async fn run(config_file: Option<&Path>, args: RunArgs) -> Result<ExitCode> {
    let overlay = args.to_overlay().context("Invalid command-line arguments")?;
    let config = initialize_configuration(config_file, overlay)
        .context("Failed to initialize configuration")?;

    info!("Source variant: {}", config.variant);
    info!("Output directory: {}", config.output_dir.display());

    let container = DefaultAppContainer::new(config);
    let report = container
        .pipeline_interactor()
        .run()
        .await
        .context("Clip pipeline failed")?;

    print_report(&report, args.json)?;

    if report.has_failures() {
        warn!("{} clip(s) failed", report.failed_results().count());
        if args.strict {
            return Ok(ExitCode::from(EXIT_CLIP_FAILURES));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Execute the plan command
pub async fn plan(config_file: Option<&Path>, args: PlanArgs) -> Result<ExitCode> {
    let overlay = args.to_overlay().context("Invalid command-line arguments")?;
    let config = initialize_configuration(config_file, overlay)
        .context("Failed to initialize configuration")?;

    let container = DefaultAppContainer::new(config);
    let interactor = container.pipeline_interactor();

    let duration = match (&args.input, args.duration) {
        (Some(input), _) => {
            if !input.exists() {
                return Err(anyhow::anyhow!("Input file does not exist: {}", input.display()));
            }
            interactor.probe(input).await
        }
        (None, duration) => duration,
    };

    let plan = interactor.plan(duration);

    if args.json {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan to JSON")?;
        println!("{}", json);
    } else {
        display_plan(&plan, duration, &interactor.config().output_dir);
    }
    Ok(ExitCode::SUCCESS)
}

/// Execute the report command
pub fn report(config_file: Option<&Path>, args: ReportArgs) -> Result<ExitCode> {
    let config = initialize_configuration(config_file, args.to_overlay())
        .context("Failed to initialize configuration")?;

    let report = ReportBuilder::new(&config.output_dir, &config.preview_url)
        .with_cache_path(config.resolved_cache_path())
        .build_listing()
        .context("Failed to build report")?;

    print_report(&report, args.json)?;
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let json =
            serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;
        println!("{}", json);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

/// Display a clip plan in human-readable format
fn display_plan(plan: &ClipPlan, duration: Option<u64>, output_dir: &Path) {
    println!("Clip Plan");
    println!("=========");
    match duration {
        Some(d) => println!("Source duration: {}s ({})", d, Utils::format_offset(d)),
        None => println!("Source duration: unknown"),
    }
    println!("Strategy: {}", plan.strategy());
    println!("Clip duration: {}s", plan.clip_duration());
    println!();
    for entry in plan.entries() {
        println!(
            "  {}  start {:>7} ({}s)",
            ClipPlan::output_path(output_dir, entry).display(),
            Utils::format_offset(entry.start),
            entry.start
        );
    }
}
