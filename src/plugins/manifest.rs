//! Catalog plugin manifest schema
//!
//! Defines the YAML files that declare a plugin-contributed catalog kind: the
//! cluster model to list, how its objects map onto tile fields, and where the
//! tile's create action links to.

use serde::{Deserialize, Serialize};

/// Plugin manifest - root structure of a plugin YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPluginManifest {
    /// Plugin name (must be unique)
    pub name: String,

    /// Plugin version (semver recommended)
    pub version: String,

    /// Whether this plugin is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cluster model whose objects become tiles
    pub model: ModelRef,

    /// Feature flag that must be enabled for this plugin to be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,

    /// Label of the tile's create action
    #[serde(default = "default_create_label")]
    pub create_label: String,

    /// Create action link; supports `{name}`, `{namespace}` and
    /// `{preselectedNamespace}` placeholders
    pub href: String,

    /// Object paths mapped onto tile fields
    #[serde(default)]
    pub fields: FieldMapping,
}

/// Reference to a cluster API model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ModelRef {
    /// API group (empty for the core group)
    #[serde(default)]
    pub group: String,

    /// API version (e.g., "v1alpha1")
    pub version: String,

    /// Kind (e.g., "ClusterServiceVersion")
    pub kind: String,

    /// Plural name for API calls (e.g., "clusterserviceversions")
    pub plural: String,

    /// Whether objects live in namespaces
    #[serde(default = "default_enabled")]
    pub namespaced: bool,
}

impl ModelRef {
    /// Reference string used as the plugin data key: `group~version~kind`
    pub fn reference(&self) -> String {
        let group = if self.group.is_empty() {
            "core"
        } else {
            self.group.as_str()
        };
        format!("{}~{}~{}", group, self.version, self.kind)
    }

    /// Get the API version string (group/version)
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// Object paths for each tile field
///
/// Paths use the `.spec.field[0]` syntax; bracketed keys (`["a/b"]`) address
/// keys containing dots or slashes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldMapping {
    /// Tile name; falls back to `metadata.name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Either a list of strings or a comma separated string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl FieldMapping {
    /// All configured paths with their field names
    pub fn paths(&self) -> Vec<(&'static str, &str)> {
        [
            ("tile_name", &self.tile_name),
            ("description", &self.description),
            ("icon_class", &self.icon_class),
            ("image_url", &self.image_url),
            ("provider", &self.provider),
            ("tags", &self.tags),
            ("documentation_url", &self.documentation_url),
            ("support_url", &self.support_url),
            ("long_description", &self.long_description),
        ]
        .into_iter()
        .filter_map(|(field, path)| path.as_deref().map(|p| (field, p)))
        .collect()
    }
}

fn default_enabled() -> bool {
    true
}

fn default_create_label() -> String {
    "Create".to_string()
}
