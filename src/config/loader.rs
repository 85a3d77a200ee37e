//! Configuration loading
//!
//! Precedence order (highest to lowest):
//! 1. Environment variable overrides
//! 2. Root config file
//! 3. Built-in defaults

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Environment override of `consoleUrl`
pub const CONSOLE_URL_ENV: &str = "DEVCATALOG_CONSOLE_URL";

/// Environment override of `defaultNamespace`
pub const DEFAULT_NAMESPACE_ENV: &str = "DEVCATALOG_DEFAULT_NAMESPACE";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    pub fn load() -> Result<Config> {
        Self::load_from(&paths::root_config_path())
    }

    /// Load configuration from a specific root file
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Config> {
        let config = if path.exists() {
            Self::load_file(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::load_defaults()
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the root config file
    ///
    /// Fails on invalid YAML, invalid value types, a malformed console URL or
    /// an invalid Helm timeout.
    pub fn validate() -> Result<()> {
        let config = Self::load().context("Failed to load configuration")?;
        Self::validate_config(&config)
    }

    pub fn validate_config(config: &Config) -> Result<()> {
        url::Url::parse(&config.console_url)
            .with_context(|| format!("Invalid consoleUrl '{}'", config.console_url))?;
        config.helm.timeout()?;

        if config.catalog.shared_namespace.trim().is_empty() {
            anyhow::bail!("catalog.sharedNamespace cannot be empty");
        }
        if config
            .default_namespace
            .as_deref()
            .is_some_and(|ns| ns.trim().is_empty())
        {
            anyhow::bail!("defaultNamespace cannot be empty when set");
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(console_url) = std::env::var(CONSOLE_URL_ENV) {
            config.console_url = console_url;
        }

        if let Ok(namespace) = std::env::var(DEFAULT_NAMESPACE_ENV) {
            config.default_namespace = Some(namespace).filter(|ns| !ns.is_empty());
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
