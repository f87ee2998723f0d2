//! Configuration initialization and hierarchy management

use std::path::Path;

use tracing::{debug, info};

use crate::adapters::TomlConfigAdapter;
use crate::config::{ConfigOverlay, PipelineConfig};
use crate::domain::errors::ConfigError;

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(
    config_file: Option<&Path>,
    cli_overrides: ConfigOverlay,
) -> Result<PipelineConfig, ConfigError> {
    let env_overrides = ConfigOverlay::from_env()?;
    initialize_configuration_with(config_file, env_overrides, cli_overrides)
}

/// Same as [`initialize_configuration`] with an explicit environment layer
pub fn initialize_configuration_with(
    config_file: Option<&Path>,
    env_overrides: ConfigOverlay,
    cli_overrides: ConfigOverlay,
) -> Result<PipelineConfig, ConfigError> {
    info!("Initializing configuration hierarchy");

    let mut config = PipelineConfig::default();

    match TomlConfigAdapter::discover(config_file)? {
        Some(file_layer) => config = config.apply(file_layer),
        None => debug!("No config file loaded"),
    }

    if !env_overrides.is_empty() {
        info!("Applied {} environment variable overrides", env_overrides.len());
        config = config.apply(env_overrides);
    }

    if !cli_overrides.is_empty() {
        info!("Applied {} CLI configuration overrides", cli_overrides.len());
        config = config.apply(cli_overrides);
    }

    config.validate()?;
    Ok(config)
}
