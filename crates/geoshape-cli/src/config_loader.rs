//! Configuration loading for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use geoshape_core::config::{parse_default_crs, CliConfigOverrides, LayeredConfig};
use geoshape_core::OverridePolicy;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when --config is not given
pub const DEFAULT_CONFIG_FILE: &str = "geoshape.toml";

/// Load layered configuration: defaults, file, environment, then CLI flags
pub fn load_config(cli: &Cli, allow_override: bool) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    }

    let mut config = config.load_from_env();

    let default_crs = cli.default_crs.as_deref().map(parse_default_crs).transpose()?;

    config.update_from_cli(CliConfigOverrides {
        default_crs,
        override_policy: allow_override.then_some(OverridePolicy::Allow),
        precision: cli.precision,
    });

    Ok(config)
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        }
    }
}
