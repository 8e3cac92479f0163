use crate::crs::{Crs, CrsDefinition};
use crate::error::{GeoshapeError, Result};
use crate::models::OverridePolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default number of decimal places used when printing coordinates
pub const DEFAULT_PRECISION: usize = 6;

const MAX_PRECISION: usize = 15;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoShape
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// CRS given to input geometries that carry none
    pub default_crs: ConfigValue<Option<String>>,
    pub override_policy: ConfigValue<OverridePolicy>,
    pub precision: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            default_crs: ConfigValue::new(None, ConfigSource::Default),
            override_policy: ConfigValue::new(OverridePolicy::Reject, ConfigSource::Default),
            precision: ConfigValue::new(DEFAULT_PRECISION, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoshapeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(default_crs) = file_config.default_crs {
            let default_crs = parse_default_crs(&default_crs)?;
            self.default_crs.update(Some(default_crs), ConfigSource::File);
        }

        if let Some(allow_override) = file_config.allow_override {
            self.override_policy.update(allow_override.into(), ConfigSource::File);
        }

        if let Some(precision) = file_config.precision {
            self.precision.update(check_precision(precision)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOSHAPE_DEFAULT_CRS
        if let Ok(crs_str) = env::var("GEOSHAPE_DEFAULT_CRS") {
            match parse_default_crs(&crs_str) {
                Ok(crs) => self.default_crs.update(Some(crs), ConfigSource::Environment),
                Err(e) => tracing::warn!("Invalid GEOSHAPE_DEFAULT_CRS value '{}': {}", crs_str, e),
            }
        }

        // GEOSHAPE_ALLOW_OVERRIDE
        if let Ok(flag_str) = env::var("GEOSHAPE_ALLOW_OVERRIDE") {
            match parse_override_policy(&flag_str) {
                Ok(policy) => self.override_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSHAPE_ALLOW_OVERRIDE value '{}': expected true or false",
                    flag_str
                ),
            }
        }

        // GEOSHAPE_PRECISION
        if let Ok(precision_str) = env::var("GEOSHAPE_PRECISION") {
            match precision_str.parse::<usize>() {
                Ok(precision) if precision <= MAX_PRECISION => {
                    self.precision.update(precision, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOSHAPE_PRECISION value '{}': expected an integer between 0 and {}",
                    precision_str,
                    MAX_PRECISION
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(default_crs) = overrides.default_crs {
            self.default_crs.update(Some(default_crs), ConfigSource::Cli);
        }

        if let Some(policy) = overrides.override_policy {
            self.override_policy.update(policy, ConfigSource::Cli);
        }

        if let Some(precision) = overrides.precision {
            self.precision.update(precision.min(MAX_PRECISION), ConfigSource::Cli);
        }
    }

    /// Resolve the configured default CRS
    pub fn default_crs(&self) -> Result<Option<Crs>> {
        self.default_crs.value.as_deref().map(Crs::from_user_input).transpose()
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "default_crs".to_string(),
            (
                self.default_crs.value.clone().unwrap_or_else(|| "none".to_string()),
                self.default_crs.source,
            ),
        );

        map.insert(
            "override_policy".to_string(),
            (format!("{:?}", self.override_policy.value), self.override_policy.source),
        );

        map.insert(
            "precision".to_string(),
            (self.precision.value.to_string(), self.precision.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    default_crs: Option<String>,
    allow_override: Option<bool>,
    precision: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub default_crs: Option<String>,
    pub override_policy: Option<OverridePolicy>,
    pub precision: Option<usize>,
}

/// Normalize a configured CRS without building it
pub fn parse_default_crs(s: &str) -> Result<String> {
    CrsDefinition::parse(s).map(|def| def.as_definition().into_owned()).map_err(|e| {
        GeoshapeError::ConfigInvalid { key: "default_crs".to_string(), reason: e.to_string() }
    })
}

/// Parse override policy from a boolean-like string
pub fn parse_override_policy(s: &str) -> Result<OverridePolicy> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "allow" => Ok(OverridePolicy::Allow),
        "false" | "no" | "0" | "reject" => Ok(OverridePolicy::Reject),
        _ => Err(GeoshapeError::ConfigInvalid {
            key: "allow_override".to_string(),
            reason: format!("Invalid override flag: {}. Use true or false", s),
        }),
    }
}

fn check_precision(precision: usize) -> Result<usize> {
    if precision > MAX_PRECISION {
        return Err(GeoshapeError::ConfigInvalid {
            key: "precision".to_string(),
            reason: format!("{} exceeds the maximum of {}", precision, MAX_PRECISION),
        });
    }
    Ok(precision)
}
