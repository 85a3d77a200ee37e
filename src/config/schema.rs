//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace to browse when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,

    /// Console base URL serving the Helm endpoints
    #[serde(default = "default_console_url")]
    pub console_url: String,

    /// Helm chart repository settings
    #[serde(default)]
    pub helm: HelmConfig,

    /// Catalog source settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Feature flag overrides; unset flags are detected from the cluster
    #[serde(default)]
    pub features: FeaturesConfig,
}

/// Helm configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmConfig {
    /// Include Helm charts in the catalog
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Timeout of chart repository requests (e.g., "10s", "500ms")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

impl HelmConfig {
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.request_timeout)
            .with_context(|| format!("Invalid helm.requestTimeout '{}'", self.request_timeout))
    }
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Namespace holding the shared templates and builder image streams
    #[serde(default = "default_shared_namespace")]
    pub shared_namespace: String,
}

/// Feature flag overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openshift: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_catalog: Option<bool>,
}

/// Parse duration string (e.g., "30s", "1m", "500ms")
pub fn parse_duration(s: &str) -> Result<Duration> {
    if let Some(ms) = s.strip_suffix("ms") {
        let ms: u64 = ms.parse().context("Invalid duration")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(secs) = s.strip_suffix('s') {
        let secs: u64 = secs.parse().context("Invalid duration")?;
        Ok(Duration::from_secs(secs))
    } else if let Some(mins) = s.strip_suffix('m') {
        let mins: u64 = mins.parse().context("Invalid duration")?;
        Ok(Duration::from_secs(mins * 60))
    } else {
        anyhow::bail!("Invalid duration format: {}", s)
    }
}

// Default value functions
fn default_console_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> String {
    "10s".to_string()
}

fn default_shared_namespace() -> String {
    "openshift".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: None,
            console_url: default_console_url(),
            helm: HelmConfig::default(),
            catalog: CatalogConfig::default(),
            features: FeaturesConfig::default(),
        }
    }
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            shared_namespace: default_shared_namespace(),
        }
    }
}
