//! Plugin loader
//!
//! Scans the plugins directory and loads catalog plugin manifests with
//! validation and conflict detection.

use super::manifest::CatalogPluginManifest;
use super::validator::PluginValidator;
use super::{PluginError, PluginResult};
use crate::config::paths;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Plugin loader
pub struct PluginLoader {
    plugins_dir: PathBuf,
}

impl PluginLoader {
    /// Create a plugin loader for the default plugins directory
    pub fn new() -> Self {
        Self::with_dir(paths::plugins_dir())
    }

    /// Create a plugin loader with a custom plugins directory
    pub fn with_dir(plugins_dir: PathBuf) -> Self {
        Self { plugins_dir }
    }

    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    /// Load all enabled plugins from the plugins directory
    ///
    /// Invalid files are logged and skipped; conflicts between valid plugins
    /// are errors.
    pub fn load_all(&self) -> Result<Vec<CatalogPluginManifest>> {
        tracing::debug!("Loading plugins from: {:?}", self.plugins_dir);

        if !self.plugins_dir.exists() {
            tracing::debug!("Plugins directory does not exist: {:?}", self.plugins_dir);
            return Ok(vec![]);
        }

        let mut paths = Vec::new();
        for entry in
            std::fs::read_dir(&self.plugins_dir).context("Failed to read plugins directory")?
        {
            let path = entry.context("Failed to read directory entry")?.path();
            let extension = path.extension().and_then(|e| e.to_str());
            if path.is_file() && matches!(extension, Some("yaml") | Some("yml")) {
                paths.push(path);
            }
        }
        // Directory order is platform dependent; registration order must not be
        paths.sort();

        let mut plugins = Vec::new();
        let mut load_errors = 0;

        for path in paths {
            match self.load_plugin(&path) {
                Ok(plugin) if plugin.enabled => {
                    tracing::info!("Loaded plugin: {}", plugin.name);
                    plugins.push(plugin);
                }
                Ok(plugin) => tracing::info!("Plugin {} is disabled", plugin.name),
                Err(e) => {
                    tracing::warn!("Failed to load plugin {:?}: {:#}", path, e);
                    load_errors += 1;
                }
            }
        }

        if !plugins.is_empty() {
            self.check_conflicts(&plugins)?;
        }

        if load_errors > 0 {
            tracing::warn!(
                "Loaded {} plugins with {} errors",
                plugins.len(),
                load_errors
            );
        } else if !plugins.is_empty() {
            tracing::info!(
                "Successfully loaded {} plugin(s): {}",
                plugins.len(),
                plugins
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(plugins)
    }

    /// Load and validate a single plugin file
    pub fn load_plugin(&self, path: &Path) -> Result<CatalogPluginManifest> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plugin file: {:?}", path))?;

        let manifest: CatalogPluginManifest = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse plugin YAML: {:?}", path))?;

        PluginValidator::validate(&manifest)
            .with_context(|| format!("Plugin validation failed: {:?}", path))?;

        tracing::debug!(
            "Plugin '{}' v{} validated from {:?}",
            manifest.name,
            manifest.version,
            path
        );

        Ok(manifest)
    }

    fn check_conflicts(&self, plugins: &[CatalogPluginManifest]) -> PluginResult<()> {
        self.check_name_conflicts(plugins)?;
        self.check_model_conflicts(plugins)?;
        Ok(())
    }

    /// Check for duplicate plugin names
    fn check_name_conflicts(&self, plugins: &[CatalogPluginManifest]) -> PluginResult<()> {
        let mut seen_names = HashSet::new();
        let duplicates: Vec<&str> = plugins
            .iter()
            .filter(|p| !seen_names.insert(p.name.as_str()))
            .map(|p| p.name.as_str())
            .collect();

        if !duplicates.is_empty() {
            return Err(PluginError::Conflict(format!(
                "Duplicate plugin names found: {}. Each plugin must have a unique name.",
                duplicates.join(", ")
            )));
        }

        Ok(())
    }

    /// Check that no two plugins contribute the same model
    fn check_model_conflicts(&self, plugins: &[CatalogPluginManifest]) -> PluginResult<()> {
        let mut model_owners: HashMap<String, Vec<&str>> = HashMap::new();
        for plugin in plugins {
            model_owners
                .entry(plugin.model.reference())
                .or_default()
                .push(plugin.name.as_str());
        }

        let mut conflicts: Vec<_> = model_owners
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .collect();
        if conflicts.is_empty() {
            return Ok(());
        }
        conflicts.sort();

        let mut error_msg = String::from("Model conflicts detected:\n");
        for (reference, owners) in conflicts {
            tracing::error!(
                "Model conflict: '{}' contributed by plugins: {}",
                reference,
                owners.join(", ")
            );
            error_msg.push_str(&format!(
                "  - Model '{}' is contributed by multiple plugins: {}\n",
                reference,
                owners.join(", ")
            ));
        }
        Err(PluginError::Conflict(error_msg))
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}
