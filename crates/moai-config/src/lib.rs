//! Configuration system for MOAI.
//!
//! Load compiler configuration from TOML or YAML files to bound
//! enumeration sizes and control logging without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use moai_config::CompilerConfig;
//!
//! let config = CompilerConfig::from_toml_str(r#"
//!     environment_mode = "checked"
//!
//!     [limits]
//!     max_instances_per_constraint = 100000
//!
//!     [logging]
//!     filter = "moai=debug"
//! "#).unwrap();
//!
//! assert_eq!(config.limits.max_instances_per_constraint, Some(100_000));
//! assert_eq!(config.limits.max_aggregation_terms, None);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use moai_config::CompilerConfig;
//!
//! let config = CompilerConfig::load("moai.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main compiler configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CompilerConfig {
    /// How much checking runs before emission.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Enumeration guards.
    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CompilerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Caps the number of combinations a quantified constraint may
    /// enumerate.
    pub fn with_max_instances(mut self, limit: u64) -> Self {
        self.limits.max_instances_per_constraint = Some(limit);
        self
    }

    /// Caps the number of combinations a single aggregation may enumerate.
    pub fn with_max_aggregation_terms(mut self, limit: u64) -> Self {
        self.limits.max_aggregation_terms = Some(limit);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Sets the default log filter directive.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.logging.filter = Some(filter.into());
        self
    }

    /// Checks values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_instances_per_constraint == Some(0) {
            return Err(ConfigError::Invalid(
                "limits.max_instances_per_constraint must be positive".to_string(),
            ));
        }
        if self.limits.max_aggregation_terms == Some(0) {
            return Err(ConfigError::Invalid(
                "limits.max_aggregation_terms must be positive".to_string(),
            ));
        }
        if matches!(&self.logging.filter, Some(filter) if filter.trim().is_empty()) {
            return Err(ConfigError::Invalid("logging.filter is empty".to_string()));
        }
        Ok(())
    }
}

/// Environment mode affecting how much the compiler checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Trust the checks made when declarations were added.
    #[default]
    Fast,

    /// Re-validate the whole model before compiling and warn about
    /// constraint instances that reference no decision variable.
    Checked,
}

/// Enumeration guards. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default)]
    pub max_instances_per_constraint: Option<u64>,

    #[serde(default)]
    pub max_aggregation_terms: Option<u64>,
}

/// Console logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default)]
    pub filter: Option<String>,

    /// Print the banner on first initialization.
    #[serde(default = "default_banner")]
    pub banner: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            banner: default_banner(),
        }
    }
}

fn default_banner() -> bool {
    true
}
