//! Plugin CLI commands

use crate::plugins::{CatalogPluginManifest, PluginLoader};
use anyhow::{Context, Result};
use clap::Subcommand;
use inflector::Inflector;
use std::path::{Path, PathBuf};

/// Plugin subcommands
#[derive(Subcommand, Debug)]
pub enum PluginSubcommand {
    /// List loaded catalog plugins
    List,

    /// Validate a plugin YAML file
    Validate {
        /// Path to plugin YAML file
        path: PathBuf,
    },

    /// Generate a plugin template
    Init {
        /// Plugin name
        name: String,

        /// Output path (defaults to plugins directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle plugin CLI commands
pub fn handle_plugin_command(subcommand: PluginSubcommand) -> Result<()> {
    tracing::debug!("Handling plugin command: {:?}", subcommand);

    match subcommand {
        PluginSubcommand::List => list_plugins(),
        PluginSubcommand::Validate { path } => validate_plugin(&path),
        PluginSubcommand::Init { name, output } => init_plugin(&name, output.as_deref()),
    }
}

fn describe(plugin: &CatalogPluginManifest, indent: &str) {
    println!("{}Model: {}", indent, plugin.model.reference());
    println!("{}Create label: {}", indent, plugin.create_label);
    println!("{}Href: {}", indent, plugin.href);
    if let Some(flag) = &plugin.flag {
        println!("{}Flag: {}", indent, flag);
    }
    if let Some(desc) = &plugin.description {
        println!("{}Description: {}", indent, desc);
    }
}

fn list_plugins() -> Result<()> {
    let loader = PluginLoader::new();
    let plugins = loader.load_all()?;

    if plugins.is_empty() {
        println!("No plugins found.");
        println!("\nPlugins directory: {}", loader.plugins_dir().display());
        println!("To create a plugin: devcatalog plugins init <name>");
        return Ok(());
    }

    println!("Loaded plugins ({}):\n", plugins.len());
    for plugin in &plugins {
        println!("  {} (v{})", plugin.name, plugin.version);
        describe(plugin, "    ");
        println!();
    }

    Ok(())
}

fn validate_plugin(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Plugin file not found: {}", path.display());
    }

    let plugin = PluginLoader::new()
        .load_plugin(path)
        .context("Plugin validation failed")?;

    println!("Plugin is valid: {} (v{})", plugin.name, plugin.version);
    println!("  Enabled: {}", plugin.enabled);
    describe(&plugin, "  ");
    Ok(())
}

/// Manifest template for a new plugin
pub fn plugin_template(name: &str) -> String {
    let display = name.to_title_case();
    format!(
        r#"name: {name}
version: 1.0.0
enabled: true
description: "{display} catalog tiles"

# Cluster model whose objects become catalog tiles
model:
  group: example.com
  version: v1
  kind: MyResource
  plural: myresources
  namespaced: true

# Optional feature flag gating this plugin (e.g., OPENSHIFT)
# flag: MY_FLAG

create_label: Create {display}
# Placeholders: {{name}}, {{namespace}}, {{preselectedNamespace}}
href: /k8s/ns/{{preselectedNamespace}}/myresources/~new?from={{name}}

# Object paths mapped onto tile fields; tile_name defaults to .metadata.name
fields:
  tile_name: .spec.displayName
  description: .spec.description
  provider: .spec.provider.name
  icon_class: .metadata.annotations["iconClass"]
  tags: .spec.keywords
"#
    )
}

fn init_plugin(name: &str, output: Option<&Path>) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let plugins_dir = PluginLoader::new().plugins_dir().to_path_buf();
            std::fs::create_dir_all(&plugins_dir).context("Failed to create plugins directory")?;
            plugins_dir.join(format!("{}.yaml", name))
        }
    };

    if output_path.exists() {
        anyhow::bail!(
            "Plugin file already exists: {}\nUse a different name or specify --output",
            output_path.display()
        );
    }

    std::fs::write(&output_path, plugin_template(name))
        .with_context(|| format!("Failed to write plugin template: {}", output_path.display()))?;
    println!("Created plugin template: {}", output_path.display());
    Ok(())
}
