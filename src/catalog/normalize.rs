//! Per-kind catalog normalizers
//!
//! Each function maps a raw source list onto catalog tiles. Resources that can
//! not be read are skipped with a warning; missing fields become absent values.

use super::icons::{self, HELM_ICON_CLASS};
use super::image_stream;
use crate::models::resources::{
    DESCRIPTION_ANNOTATION, DISPLAY_NAME_ANNOTATION, DOCUMENTATION_URL_ANNOTATION,
    ImageStreamView, PROVIDER_DISPLAY_NAME_ANNOTATION, SAMPLE_REPO_ANNOTATION,
    SUPPORT_URL_ANNOTATION, ServiceClassView, TAGS_ANNOTATION, TemplateView,
};
use crate::models::{
    CatalogKind, ChartReadme, HelmChartEntries, HelmChartEntry, Item, PropertyItem, TileVisual,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Namespace service instance links fall back to when none is selected
pub const DEFAULT_SERVICE_INSTANCE_NAMESPACE: &str = "default";

pub const SERVICE_CLASS_CREATE_LABEL: &str = "Create Service Instance";
pub const TEMPLATE_CREATE_LABEL: &str = "Instantiate Template";
pub const HELM_CHART_CREATE_LABEL: &str = "Install Helm Chart";
pub const IMAGE_STREAM_CREATE_LABEL: &str = "Create Application";

/// Tag that removes a template from the catalog
pub const HIDDEN_TAG: &str = "hidden";

fn read_view<T: DeserializeOwned>(kind: &CatalogKind, raw: &Value) -> Option<T> {
    match T::deserialize(raw) {
        Ok(view) => Some(view),
        Err(e) => {
            let name = raw
                .get("metadata")
                .and_then(|m| m.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>");
            tracing::warn!("Skipping unreadable {} '{}': {}", kind, name, e);
            None
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

fn service_instance_href(namespace: &str) -> String {
    format!("/k8s/ns/{}/serviceinstances/~new", namespace)
}

fn service_class_item(
    kind: CatalogKind,
    raw: &Value,
    href: String,
    documentation_url: fn(&ServiceClassView) -> Option<String>,
) -> Option<Item> {
    let view: ServiceClassView = read_view(&kind, raw)?;
    let metadata = &view.spec.external_metadata;

    let mut item = Item::new(
        kind,
        view.display_name(),
        icons::service_class_visual(metadata),
        SERVICE_CLASS_CREATE_LABEL,
        href,
        raw.clone(),
    );
    item.tile_description = view.spec.description.clone();
    item.tile_provider = metadata.provider_display_name.clone();
    item.tags = view.spec.tags.clone();
    item.support_url = metadata.support_url.clone();
    item.long_description = metadata.long_description.clone();
    item.documentation_url = documentation_url(&view);
    Some(item)
}

/// Namespaced service classes
///
/// Links point at the service instance form of the current namespace, or of
/// `default` when browsing all namespaces.
pub fn normalize_service_classes(service_classes: &[Value], namespace: Option<&str>) -> Vec<Item> {
    let namespace = namespace
        .filter(|ns| !ns.is_empty())
        .unwrap_or(DEFAULT_SERVICE_INSTANCE_NAMESPACE);

    service_classes
        .iter()
        .filter_map(|raw| {
            service_class_item(
                CatalogKind::ServiceClass,
                raw,
                service_instance_href(namespace),
                |view| view.spec.external_metadata.url_description.clone(),
            )
        })
        .collect()
}

/// Cluster service classes
///
/// Links always target the `default` namespace, independent of the current
/// namespace.
pub fn normalize_cluster_service_classes(cluster_service_classes: &[Value]) -> Vec<Item> {
    cluster_service_classes
        .iter()
        .filter_map(|raw| {
            service_class_item(
                CatalogKind::ClusterServiceClass,
                raw,
                service_instance_href(DEFAULT_SERVICE_INSTANCE_NAMESPACE),
                |view| view.spec.external_metadata.documentation_url.clone(),
            )
        })
        .collect()
}

/// Templates (metadata only); templates tagged `hidden` are dropped
pub fn normalize_templates(templates: &[Value], namespace: Option<&str>) -> Vec<Item> {
    let preselected = namespace.unwrap_or("");

    templates
        .iter()
        .filter_map(|raw| {
            let view: TemplateView = read_view(&CatalogKind::Template, raw)?;
            let meta = &view.metadata;
            let tags = image_stream::split_tags(meta.annotation(TAGS_ANNOTATION).unwrap_or(""));
            if tags.iter().any(|t| t == HIDDEN_TAG) {
                tracing::debug!("Template '{}' is hidden", meta.name);
                return None;
            }

            let href = format!(
                "/catalog/instantiate-template?template={}&template-ns={}&preselected-ns={}",
                meta.name,
                meta.namespace_or_empty(),
                preselected
            );
            let tile_name = non_empty(meta.annotation(DISPLAY_NAME_ANNOTATION))
                .unwrap_or_else(|| meta.name.clone());

            let mut item = Item::new(
                CatalogKind::Template,
                tile_name,
                icons::visual_for_icon_class(icons::template_icon(meta)),
                TEMPLATE_CREATE_LABEL,
                href,
                raw.clone(),
            );
            item.tile_description = non_empty(meta.annotation(DESCRIPTION_ANNOTATION));
            item.tags = tags.into_iter().filter(|t| !t.is_empty()).collect();
            item.tile_provider = non_empty(meta.annotation(PROVIDER_DISPLAY_NAME_ANNOTATION));
            item.documentation_url = non_empty(meta.annotation(DOCUMENTATION_URL_ANNOTATION));
            item.support_url = non_empty(meta.annotation(SUPPORT_URL_ANNOTATION));
            Some(item)
        })
        .collect()
}

/// Chart versions as tile title: `Nginx Ingress v1.2.0`
pub fn helm_tile_name(chart_name: &str, version: &str) -> String {
    format!("{} v{}", start_case(chart_name), version)
}

/// Split a chart name into words and raise the first letter of each
///
/// Separators, lower-to-upper humps and digit runs start a new word. The tail
/// of an upper-case run followed by lower case starts one too (`HAProxy` is
/// `HA Proxy`). The rest of each word keeps its case.
fn start_case(name: &str) -> String {
    let chars: Vec<char> = name
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect();
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            continue;
        }
        if let Some(prev) = word.chars().last() {
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_numeric() != c.is_numeric()
                || (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_lower);
            if boundary {
                words.push(std::mem::take(&mut word));
            }
        }
        word.push(c);
    }
    if !word.is_empty() {
        words.push(word);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Percent-encode a query value the way `encodeURIComponent` does for URLs
fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn helm_custom_properties(chart: &HelmChartEntry) -> Vec<PropertyItem> {
    let mut properties = vec![
        PropertyItem::new("Chart Version", chart.version.clone()),
        PropertyItem::new("App Version", chart.app_version.clone().unwrap_or_default()),
    ];

    if let Some(home) = chart.home.as_deref().filter(|h| !h.is_empty()) {
        properties.push(PropertyItem::new("Home Page", home));
    }

    if !chart.maintainers.is_empty() {
        let maintainers = chart
            .maintainers
            .iter()
            .map(|m| match m.email.as_deref() {
                Some(email) if !email.is_empty() => format!("{} <{}>", m.name, email),
                _ => m.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        properties.push(PropertyItem::new("Maintainers", maintainers));
    }

    properties
}

/// Chart entry wrapped with a synthetic identity (digest + creation time)
fn helm_chart_object(chart: &HelmChartEntry) -> Value {
    let mut obj = serde_json::to_value(chart).unwrap_or_default();
    if let Value::Object(map) = &mut obj {
        map.insert(
            "metadata".to_string(),
            json!({
                "uid": chart.digest,
                "creationTimestamp": chart.created,
            }),
        );
    }
    obj
}

fn helm_chart_item(chart: &HelmChartEntry, namespace: &str) -> Item {
    let chart_url = chart.chart_url().map(str::to_string);
    let href = format!(
        "/catalog/helm-install?chartName={}&chartURL={}&preselected-ns={}",
        chart.name,
        encode_query_value(chart_url.as_deref().unwrap_or("")),
        namespace
    );
    let visual = TileVisual::resolve(
        chart
            .icon
            .clone()
            .filter(|icon| !icon.is_empty())
            .or_else(|| icons::image_for_icon_class(HELM_ICON_CLASS).map(str::to_string)),
        Some(icons::normalize_icon_class(HELM_ICON_CLASS)),
    );

    let mut item = Item::new(
        CatalogKind::HelmChart,
        helm_tile_name(&chart.name, &chart.version),
        visual,
        HELM_CHART_CREATE_LABEL,
        href,
        helm_chart_object(chart),
    );
    item.tile_description = chart.description.clone();
    item.tags = chart.keywords.clone();
    item.markdown_description = Some(ChartReadme { chart_url });
    item.custom_properties = helm_custom_properties(chart);
    item
}

/// Helm charts: one tile per version entry of every chart
pub fn normalize_helm_charts(entries: &HelmChartEntries, namespace: Option<&str>) -> Vec<Item> {
    let namespace = namespace.unwrap_or("");
    entries
        .values()
        .flat_map(|versions| versions.iter())
        .map(|chart| helm_chart_item(chart, namespace))
        .collect()
}

/// Builder image streams; other streams are filtered out
pub fn normalize_image_streams(image_streams: &[Value], namespace: Option<&str>) -> Vec<Item> {
    let preselected = namespace.unwrap_or("");

    image_streams
        .iter()
        .filter_map(|raw| {
            let view: ImageStreamView = read_view(&CatalogKind::ImageStream, raw)?;
            if !image_stream::is_builder(&view) {
                return None;
            }

            let meta = &view.metadata;
            let tag = image_stream::most_recent_builder_tag(&view);
            let tile_name = non_empty(meta.annotation(DISPLAY_NAME_ANNOTATION))
                .unwrap_or_else(|| meta.name.clone());
            let href = format!(
                "/catalog/source-to-image?imagestream={}&imagestream-ns={}&preselected-ns={}",
                meta.name,
                meta.namespace_or_empty(),
                preselected
            );

            let mut item = Item::new(
                CatalogKind::ImageStream,
                tile_name,
                icons::visual_for_icon_class(icons::image_stream_icon(tag)),
                IMAGE_STREAM_CREATE_LABEL,
                href,
                raw.clone(),
            );
            if let Some(tag) = tag {
                item.tile_description = non_empty(tag.annotation(DESCRIPTION_ANNOTATION));
                item.tags = image_stream::annotation_tags(tag)
                    .into_iter()
                    .filter(|t| !t.is_empty())
                    .collect();
                item.tile_provider = non_empty(tag.annotation(PROVIDER_DISPLAY_NAME_ANNOTATION));
            }
            item.sample_repo = view
                .spec
                .tags
                .first()
                .and_then(|first| non_empty(first.annotation(SAMPLE_REPO_ANNOTATION)));
            Some(item)
        })
        .collect()
}
