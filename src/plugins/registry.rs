//! Catalog plugin registry
//!
//! Holds the models plugins contribute to the catalog, in registration order.

use super::manifest::{CatalogPluginManifest, ModelRef};
use super::normalizer::ManifestNormalizer;
use super::{PluginError, PluginResult};
use crate::flags::FeatureFlags;
use crate::models::Item;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Turns the raw objects of one plugin model into catalog tiles
pub trait CatalogNormalizer: Send + Sync {
    fn normalize(&self, data: &[Value], namespace: Option<&str>) -> Vec<Item>;
}

impl<F> CatalogNormalizer for F
where
    F: Fn(&[Value], Option<&str>) -> Vec<Item> + Send + Sync,
{
    fn normalize(&self, data: &[Value], namespace: Option<&str>) -> Vec<Item> {
        self(data, namespace)
    }
}

/// A plugin-contributed catalog model
#[derive(Clone)]
pub struct DevCatalogModel {
    pub model: ModelRef,
    pub normalizer: Arc<dyn CatalogNormalizer>,
    /// Feature flag gating the model
    pub flag: Option<String>,
}

impl DevCatalogModel {
    pub fn new(model: ModelRef, normalizer: impl CatalogNormalizer + 'static) -> Self {
        Self {
            model,
            normalizer: Arc::new(normalizer),
            flag: None,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn from_manifest(manifest: &CatalogPluginManifest) -> Self {
        Self {
            model: manifest.model.clone(),
            normalizer: Arc::new(ManifestNormalizer::from_manifest(manifest)),
            flag: manifest.flag.clone(),
        }
    }

    pub fn reference(&self) -> String {
        self.model.reference()
    }
}

impl fmt::Debug for DevCatalogModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevCatalogModel")
            .field("model", &self.model)
            .field("flag", &self.flag)
            .finish_non_exhaustive()
    }
}

/// Registry of plugin catalog models
#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
    models: Vec<DevCatalogModel>,
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loaded manifests
    pub fn from_manifests(manifests: &[CatalogPluginManifest]) -> PluginResult<Self> {
        let mut registry = Self::new();
        for manifest in manifests {
            registry.register(DevCatalogModel::from_manifest(manifest))?;
        }
        Ok(registry)
    }

    /// Register a model; a model reference can only be registered once
    pub fn register(&mut self, model: DevCatalogModel) -> PluginResult<()> {
        let reference = model.reference();
        if self.contains(&reference) {
            return Err(PluginError::Conflict(format!(
                "Model {} is already registered",
                reference
            )));
        }
        tracing::debug!("Registered catalog plugin model: {}", reference);
        self.models.push(model);
        Ok(())
    }

    /// Get a model by reference
    pub fn get(&self, reference: &str) -> Option<&DevCatalogModel> {
        self.models.iter().find(|m| m.reference() == reference)
    }

    /// Get all models
    pub fn all(&self) -> &[DevCatalogModel] {
        &self.models
    }

    /// Get model references
    pub fn references(&self) -> Vec<String> {
        self.models.iter().map(DevCatalogModel::reference).collect()
    }

    /// Check if a model is registered
    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Remove a model by reference
    pub fn remove(&mut self, reference: &str) -> PluginResult<DevCatalogModel> {
        let index = self
            .models
            .iter()
            .position(|m| m.reference() == reference)
            .ok_or_else(|| PluginError::NotFound(reference.to_string()))?;
        Ok(self.models.remove(index))
    }

    /// Models whose feature flag is enabled (or that have none)
    pub fn enabled_models(&self, flags: &FeatureFlags) -> Vec<&DevCatalogModel> {
        self.models
            .iter()
            .filter(|m| flags.allows(m.flag.as_deref()))
            .collect()
    }

    /// Normalize fetched plugin data, keyed by model reference
    ///
    /// Models with no fetched slice contribute nothing.
    pub fn normalize(
        &self,
        plugin_data: &BTreeMap<String, Vec<Value>>,
        namespace: Option<&str>,
    ) -> Vec<Item> {
        self.models
            .iter()
            .filter_map(|m| {
                plugin_data
                    .get(&m.reference())
                    .map(|data| m.normalizer.normalize(data, namespace))
            })
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogKind, TileVisual};
    use serde_json::json;

    fn model(kind: &str) -> ModelRef {
        ModelRef {
            group: "example.io".to_string(),
            version: "v1".to_string(),
            kind: kind.to_string(),
            plural: format!("{}s", kind.to_lowercase()),
            namespaced: true,
        }
    }

    fn names_normalizer(data: &[Value], _namespace: Option<&str>) -> Vec<Item> {
        data.iter()
            .map(|obj| {
                Item::new(
                    CatalogKind::Plugin("Widget".to_string()),
                    obj["metadata"]["name"].as_str().unwrap_or_default(),
                    TileVisual::resolve(None, None),
                    "Create",
                    "/widgets",
                    obj.clone(),
                )
            })
            .collect()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = PluginRegistry::new();
        registry
            .register(DevCatalogModel::new(model("Widget"), names_normalizer))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("example.io~v1~Widget"));
        assert!(registry.get("example.io~v1~Gadget").is_none());
    }

    #[test]
    fn test_duplicate_reference_conflicts() {
        let mut registry = PluginRegistry::new();
        registry
            .register(DevCatalogModel::new(model("Widget"), names_normalizer))
            .unwrap();
        let result = registry.register(DevCatalogModel::new(model("Widget"), names_normalizer));
        assert!(matches!(result, Err(PluginError::Conflict(_))));
    }

    #[test]
    fn test_remove() {
        let mut registry = PluginRegistry::new();
        registry
            .register(DevCatalogModel::new(model("Widget"), names_normalizer))
            .unwrap();
        assert!(registry.remove("example.io~v1~Widget").is_ok());
        assert!(registry.is_empty());
        assert!(matches!(
            registry.remove("example.io~v1~Widget"),
            Err(PluginError::NotFound(_))
        ));
    }

    #[test]
    fn test_enabled_models_respects_flags() {
        let mut registry = PluginRegistry::new();
        registry
            .register(DevCatalogModel::new(model("Widget"), names_normalizer).with_flag("WIDGETS"))
            .unwrap();
        registry
            .register(DevCatalogModel::new(model("Gadget"), names_normalizer))
            .unwrap();

        let flags = FeatureFlags::new();
        let enabled = registry.enabled_models(&flags);
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].model.kind, "Gadget");
    }

    #[test]
    fn test_normalize_skips_missing_slices() {
        let mut registry = PluginRegistry::new();
        registry
            .register(DevCatalogModel::new(model("Widget"), names_normalizer))
            .unwrap();
        registry
            .register(DevCatalogModel::new(model("Gadget"), names_normalizer))
            .unwrap();

        let mut data = BTreeMap::new();
        data.insert(
            "example.io~v1~Gadget".to_string(),
            vec![json!({"metadata": {"name": "g1"}})],
        );

        let items = registry.normalize(&data, None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tile_name, "g1");
    }
}
