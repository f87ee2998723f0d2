// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

use crate::domain::errors::ConfigError;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Build the filter: `RUST_LOG` wins when set, otherwise `level`
pub fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    let level = level.trim().to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Invalid {
            key: "log_level".to_string(),
            reason: format!(
                "`{}` (valid levels: trace, debug, info, warn, error)",
                level
            ),
        });
    }

    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for reports.
pub fn init_logging(level: &str, json: bool) -> Result<(), ConfigError> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}
