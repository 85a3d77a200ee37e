//! Configuration for devcatalog
//!
//! A single YAML file in the config directory, with environment overrides.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{CatalogConfig, Config, FeaturesConfig, HelmConfig};

/// Keys accepted by `config get` / `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "defaultNamespace",
    "consoleUrl",
    "helm.enabled",
    "helm.requestTimeout",
    "catalog.sharedNamespace",
    "features.openshift",
    "features.serviceCatalog",
];

fn optional_bool(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "auto".to_string())
}

fn parse_optional_bool(key: &str, value: &str) -> anyhow::Result<Option<bool>> {
    match value {
        "" | "auto" => Ok(None),
        other => other
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be 'true', 'false' or 'auto'", key)),
    }
}

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone().unwrap_or_default()),
        "consoleUrl" => Ok(config.console_url.clone()),
        "helm.enabled" => Ok(config.helm.enabled.to_string()),
        "helm.requestTimeout" => Ok(config.helm.request_timeout.clone()),
        "catalog.sharedNamespace" => Ok(config.catalog.shared_namespace.clone()),
        "features.openshift" => Ok(optional_bool(config.features.openshift)),
        "features.serviceCatalog" => Ok(optional_bool(config.features.service_catalog)),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "defaultNamespace" => {
            config.default_namespace = Some(value.to_string()).filter(|v| !v.is_empty());
        }
        "consoleUrl" => {
            url::Url::parse(value).with_context(|| format!("Invalid consoleUrl '{}'", value))?;
            config.console_url = value.to_string();
        }
        "helm.enabled" => {
            config.helm.enabled = value
                .parse()
                .context("helm.enabled must be 'true' or 'false'")?;
        }
        "helm.requestTimeout" => {
            schema::parse_duration(value)
                .context("helm.requestTimeout must look like '10s', '1m' or '500ms'")?;
            config.helm.request_timeout = value.to_string();
        }
        "catalog.sharedNamespace" => {
            if value.is_empty() {
                anyhow::bail!("catalog.sharedNamespace cannot be empty");
            }
            config.catalog.shared_namespace = value.to_string();
        }
        "features.openshift" => {
            config.features.openshift = parse_optional_bool(key, value)?;
        }
        "features.serviceCatalog" => {
            config.features.service_catalog = parse_optional_bool(key, value)?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
