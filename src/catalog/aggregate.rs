//! Catalog aggregation
//!
//! Merges every normalized source into one list sorted by tile name, and
//! caches the result until the sources change.

use super::normalize;
use crate::models::{CatalogKind, HelmChartEntries, Item};
use crate::plugins::PluginRegistry;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Snapshot of every raw catalog source for one namespace context
///
/// `None` lists were not fetched (or failed softly) and contribute nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSources {
    /// All required sources have been fetched
    pub loaded: bool,
    /// Current namespace; `None` means all namespaces
    pub namespace: Option<String>,
    pub service_classes: Option<Vec<Value>>,
    pub cluster_service_classes: Option<Vec<Value>>,
    pub image_streams: Option<Vec<Value>>,
    /// Templates of the shared namespace
    pub template_metadata: Option<Vec<Value>>,
    /// Templates of the current project
    pub project_template_metadata: Option<Vec<Value>>,
    pub helm_charts: Option<HelmChartEntries>,
    /// Plugin objects keyed by model reference
    pub plugin_data: BTreeMap<String, Vec<Value>>,
}

/// Build the sorted catalog for a snapshot
pub fn aggregate(sources: &CatalogSources, registry: &PluginRegistry) -> Vec<Item> {
    if !sources.loaded {
        return Vec::new();
    }

    let namespace = sources.namespace.as_deref();
    fn slice(list: &Option<Vec<Value>>) -> &[Value] {
        list.as_deref().unwrap_or_default()
    }

    let mut items = Vec::new();
    items.extend(normalize::normalize_service_classes(
        slice(&sources.service_classes),
        namespace,
    ));
    items.extend(normalize::normalize_cluster_service_classes(slice(
        &sources.cluster_service_classes,
    )));
    items.extend(normalize::normalize_image_streams(
        slice(&sources.image_streams),
        namespace,
    ));
    items.extend(normalize::normalize_templates(
        slice(&sources.template_metadata),
        namespace,
    ));
    items.extend(registry.normalize(&sources.plugin_data, namespace));
    items.extend(normalize::normalize_templates(
        slice(&sources.project_template_metadata),
        namespace,
    ));
    if let Some(entries) = &sources.helm_charts {
        items.extend(normalize::normalize_helm_charts(entries, namespace));
    }

    sort_items(&mut items);
    tracing::debug!("Aggregated {} catalog item(s)", items.len());
    items
}

/// Stable ascending sort by tile name, byte-wise
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| a.tile_name.cmp(&b.tile_name));
}

/// Items matching an optional kind and an optional tag
pub fn filter_items<'a>(
    items: &'a [Item],
    kind: Option<&CatalogKind>,
    tag: Option<&str>,
) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| kind.is_none_or(|k| item.kind.matches(k)))
        .filter(|item| tag.is_none_or(|t| item.has_tag(t)))
        .collect()
}

/// Last aggregated catalog and the snapshot it was built from
#[derive(Debug)]
pub struct CatalogState {
    sources: Option<CatalogSources>,
    items: Arc<[Item]>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            sources: None,
            items: Arc::from(Vec::new()),
        }
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the catalog when the snapshot differs from the last one
    ///
    /// Returns whether a recomputation happened.
    pub fn update(&mut self, sources: CatalogSources, registry: &PluginRegistry) -> bool {
        if self.sources.as_ref() == Some(&sources) {
            return false;
        }
        self.items = aggregate(&sources, registry).into();
        self.sources = Some(sources);
        true
    }

    /// Current catalog
    pub fn items(&self) -> Arc<[Item]> {
        Arc::clone(&self.items)
    }

    pub fn sources(&self) -> Option<&CatalogSources> {
        self.sources.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HelmChartEntry;
    use serde_json::json;

    fn template(name: &str, display: &str, tags: &str) -> Value {
        json!({
            "metadata": {
                "name": name,
                "namespace": "openshift",
                "annotations": {"openshift.io/display-name": display, "tags": tags}
            }
        })
    }

    fn loaded() -> CatalogSources {
        CatalogSources {
            loaded: true,
            namespace: Some("dev".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_not_loaded_is_empty() {
        let mut sources = loaded();
        sources.loaded = false;
        sources.template_metadata = Some(vec![template("a", "A", "")]);
        assert!(aggregate(&sources, &PluginRegistry::new()).is_empty());
    }

    #[test]
    fn test_sorted_and_stable() {
        let mut sources = loaded();
        sources.template_metadata = Some(vec![
            template("t1", "Same", "first"),
            template("t2", "Alpha", ""),
        ]);
        sources.project_template_metadata = Some(vec![template("t3", "Same", "second")]);

        let items = aggregate(&sources, &PluginRegistry::new());
        let names: Vec<&str> = items.iter().map(|i| i.tile_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Same", "Same"]);
        assert!(items[1].has_tag("first"));
        assert!(items[2].has_tag("second"));
    }

    #[test]
    fn test_absent_sources_contribute_nothing() {
        let mut sources = loaded();
        sources.service_classes = None;
        sources.image_streams = Some(Vec::new());
        sources.project_template_metadata = Some(vec![template("p", "Project", "")]);

        let items = aggregate(&sources, &PluginRegistry::new());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tile_name, "Project");
    }

    #[test]
    fn test_hidden_templates_excluded() {
        let mut sources = loaded();
        sources.template_metadata = Some(vec![
            template("shown", "Shown", "java"),
            template("secret", "Secret", "java,hidden"),
        ]);
        let items = aggregate(&sources, &PluginRegistry::new());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tile_name, "Shown");
    }

    #[test]
    fn test_helm_charts_included() {
        let mut entries = HelmChartEntries::new();
        entries.insert(
            "nginx".to_string(),
            vec![HelmChartEntry {
                name: "nginx".to_string(),
                version: "1.0".to_string(),
                ..Default::default()
            }],
        );
        let mut sources = loaded();
        sources.helm_charts = Some(entries);

        let items = aggregate(&sources, &PluginRegistry::new());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, CatalogKind::HelmChart);
    }

    #[test]
    fn test_filter_items() {
        let mut sources = loaded();
        sources.template_metadata = Some(vec![
            template("java", "Java", "java,builder"),
            template("php", "PHP", "php"),
        ]);
        let items = aggregate(&sources, &PluginRegistry::new());

        let kind = CatalogKind::from_str_case_insensitive("templates");
        assert_eq!(filter_items(&items, Some(&kind), None).len(), 2);
        assert_eq!(filter_items(&items, None, Some("BUILDER")).len(), 1);
        let helm = CatalogKind::HelmChart;
        assert!(filter_items(&items, Some(&helm), None).is_empty());
    }

    #[test]
    fn test_state_recomputes_only_on_change() {
        let registry = PluginRegistry::new();
        let mut state = CatalogState::new();
        let mut sources = loaded();
        sources.template_metadata = Some(vec![template("a", "A", "")]);

        assert!(state.update(sources.clone(), &registry));
        let first = state.items();
        assert!(!state.update(sources.clone(), &registry));
        assert!(Arc::ptr_eq(&first, &state.items()));

        sources.namespace = Some("other".to_string());
        assert!(state.update(sources, &registry));
        assert!(!Arc::ptr_eq(&first, &state.items()));
    }
}
