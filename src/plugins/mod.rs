// Catalog plugin system
//
// Plugins contribute extra catalog kinds: a cluster model to list and a
// normalizer that turns its objects into tiles. Plugins are either compiled in
// or declared through YAML manifests.

pub mod field_path;
pub mod loader;
pub mod manifest;
pub mod normalizer;
pub mod registry;
pub mod validator;

pub use loader::PluginLoader;
pub use manifest::{CatalogPluginManifest, FieldMapping, ModelRef};
pub use normalizer::ManifestNormalizer;
pub use registry::{CatalogNormalizer, DevCatalogModel, PluginRegistry};
pub use validator::PluginValidator;

/// Plugin errors
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Invalid plugin manifest: {0}")]
    InvalidManifest(String),

    #[error("Plugin conflict: {0}")]
    Conflict(String),

    #[error("Plugin not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;
