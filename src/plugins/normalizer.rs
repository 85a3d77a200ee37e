//! Normalizer driven by a plugin manifest's field mapping

use super::field_path::{extract_string, extract_tags};
use super::manifest::{CatalogPluginManifest, FieldMapping};
use super::registry::CatalogNormalizer;
use crate::catalog::icons;
use crate::models::{CatalogKind, Item, TileVisual};
use serde_json::Value;

const NAME_PATH: &str = ".metadata.name";
const NAMESPACE_PATH: &str = ".metadata.namespace";

/// Maps plugin objects onto tiles using configured object paths
#[derive(Debug, Clone)]
pub struct ManifestNormalizer {
    kind: CatalogKind,
    create_label: String,
    href: String,
    fields: FieldMapping,
}

impl ManifestNormalizer {
    pub fn new(
        kind: CatalogKind,
        create_label: impl Into<String>,
        href: impl Into<String>,
        fields: FieldMapping,
    ) -> Self {
        Self {
            kind,
            create_label: create_label.into(),
            href: href.into(),
            fields,
        }
    }

    pub fn from_manifest(manifest: &CatalogPluginManifest) -> Self {
        Self::new(
            CatalogKind::Plugin(manifest.model.kind.clone()),
            &manifest.create_label,
            &manifest.href,
            manifest.fields.clone(),
        )
    }

    fn field(&self, obj: &Value, path: &Option<String>) -> Option<String> {
        path.as_deref()
            .and_then(|p| extract_string(obj, p))
            .filter(|s| !s.is_empty())
    }

    fn render_href(&self, obj: &Value, namespace: Option<&str>) -> String {
        let name = extract_string(obj, NAME_PATH).unwrap_or_default();
        let object_ns = extract_string(obj, NAMESPACE_PATH).unwrap_or_default();
        self.href
            .replace("{name}", &name)
            .replace("{namespace}", &object_ns)
            .replace("{preselectedNamespace}", namespace.unwrap_or_default())
    }

    fn item(&self, obj: &Value, namespace: Option<&str>) -> Option<Item> {
        let tile_name = self
            .field(obj, &self.fields.tile_name)
            .or_else(|| extract_string(obj, NAME_PATH))?;

        let icon = self.field(obj, &self.fields.icon_class);
        let visual = match self.field(obj, &self.fields.image_url) {
            Some(url) => {
                TileVisual::resolve(Some(url), icon.map(|c| icons::normalize_icon_class(&c)))
            }
            None => icons::visual_for_icon_class(icon.as_deref()),
        };

        let mut item = Item::new(
            self.kind.clone(),
            tile_name,
            visual,
            &self.create_label,
            self.render_href(obj, namespace),
            obj.clone(),
        );
        item.tile_description = self.field(obj, &self.fields.description);
        item.tile_provider = self.field(obj, &self.fields.provider);
        item.tags = self
            .fields
            .tags
            .as_deref()
            .map(|p| extract_tags(obj, p))
            .unwrap_or_default();
        item.documentation_url = self.field(obj, &self.fields.documentation_url);
        item.support_url = self.field(obj, &self.fields.support_url);
        item.long_description = self.field(obj, &self.fields.long_description);
        Some(item)
    }
}

impl CatalogNormalizer for ManifestNormalizer {
    fn normalize(&self, data: &[Value], namespace: Option<&str>) -> Vec<Item> {
        data.iter()
            .filter_map(|obj| {
                let item = self.item(obj, namespace);
                if item.is_none() {
                    tracing::warn!("Skipping {} object without a name", self.kind);
                }
                item
            })
            .collect()
    }
}
