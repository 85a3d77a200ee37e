//! Catalog and quota source fetching
//!
//! Lists every catalog source concurrently through the dynamic API. Optional
//! sources degrade to absent lists; template lists are required.

use crate::catalog::{CatalogError, CatalogSources, ChartFetcher};
use crate::config::FeaturesConfig;
use crate::flags::{self, FeatureFlags};
use crate::models::{HelmChartEntries, Quota};
use crate::plugins::{DevCatalogModel, ModelRef, PluginRegistry};
use k8s_openapi::api::core::v1::ResourceQuota;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::{Api, Client};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn api_resource(group: &str, version: &str, kind: &str, plural: &str) -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(group, version, kind), plural)
}

pub fn service_class_resource() -> ApiResource {
    api_resource("servicecatalog.k8s.io", "v1beta1", "ServiceClass", "serviceclasses")
}

pub fn cluster_service_class_resource() -> ApiResource {
    api_resource(
        "servicecatalog.k8s.io",
        "v1beta1",
        "ClusterServiceClass",
        "clusterserviceclasses",
    )
}

pub fn image_stream_resource() -> ApiResource {
    api_resource("image.openshift.io", "v1", "ImageStream", "imagestreams")
}

pub fn template_resource() -> ApiResource {
    api_resource("template.openshift.io", "v1", "Template", "templates")
}

pub fn cluster_resource_quota_resource() -> ApiResource {
    api_resource(
        "quota.openshift.io",
        "v1",
        "ClusterResourceQuota",
        "clusterresourcequotas",
    )
}

pub fn plugin_resource(model: &ModelRef) -> ApiResource {
    api_resource(&model.group, &model.version, &model.kind, &model.plural)
}

fn dynamic_api(
    client: &Client,
    resource: &ApiResource,
    namespace: Option<&str>,
) -> Api<DynamicObject> {
    match namespace {
        Some(ns) => Api::namespaced_with(client.clone(), ns, resource),
        None => Api::all_with(client.clone(), resource),
    }
}

fn to_values<T: Serialize>(kind: &str, items: Vec<T>) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| {
            serde_json::to_value(&item)
                .map_err(|e| tracing::warn!("Failed to convert {} to JSON: {}", kind, e))
                .ok()
        })
        .collect()
}

/// List objects of a model; `None` namespace lists across all namespaces
pub async fn list_objects(
    client: &Client,
    resource: &ApiResource,
    namespace: Option<&str>,
) -> Result<Vec<Value>, kube::Error> {
    let list = dynamic_api(client, resource, namespace)
        .list(&ListParams::default())
        .await?;
    tracing::debug!(
        "Listed {} {} object(s) in {}",
        list.items.len(),
        resource.kind,
        namespace.unwrap_or("all namespaces")
    );
    Ok(to_values(&resource.kind, list.items))
}

/// List templates as metadata only; parameters and objects are never needed
pub async fn list_template_metadata(
    client: &Client,
    namespace: &str,
) -> Result<Vec<Value>, kube::Error> {
    let resource = template_resource();
    let list = dynamic_api(client, &resource, Some(namespace))
        .list_metadata(&ListParams::default())
        .await?;
    tracing::debug!("Listed {} template(s) in {}", list.items.len(), namespace);
    Ok(list
        .items
        .into_iter()
        .map(|item| json!({ "metadata": item.metadata }))
        .collect())
}

/// Log a failed optional list and treat it as absent
fn optional<T, E: std::fmt::Display>(label: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Skipping {}: {}", label, e);
            None
        }
    }
}

/// Detect feature flags from the API groups the cluster serves
///
/// Discovery failures leave every flag disabled.
pub async fn detect_flags(client: &Client) -> FeatureFlags {
    match client.list_api_groups().await {
        Ok(groups) => {
            FeatureFlags::from_api_groups(groups.groups.iter().map(|g| g.name.as_str()))
        }
        Err(e) => {
            tracing::warn!("API group discovery failed: {}", e);
            FeatureFlags::new()
        }
    }
}

/// Detected flags with config overrides applied
pub async fn resolve_flags(client: &Client, overrides: &FeaturesConfig) -> FeatureFlags {
    let mut flags = detect_flags(client).await;
    flags.apply_override(flags::OPENSHIFT, overrides.openshift);
    flags.apply_override(flags::SERVICE_CATALOG, overrides.service_catalog);
    for (flag, enabled) in flags.iter() {
        tracing::debug!("Feature flag {} = {}", flag, enabled);
    }
    flags
}

/// Built-in catalog sources listed from the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSource {
    ServiceClasses,
    ClusterServiceClasses,
    ImageStreams,
    Templates,
}

impl ClusterSource {
    /// Flag the source is gated on; namespaced service classes are always
    /// listed and a missing API only makes them absent
    pub fn required_flag(self) -> Option<&'static str> {
        match self {
            Self::ServiceClasses => None,
            Self::ClusterServiceClasses => Some(flags::SERVICE_CATALOG),
            Self::ImageStreams | Self::Templates => Some(flags::OPENSHIFT),
        }
    }
}

/// Namespace whose own templates join the shared ones
///
/// None when browsing all namespaces or the shared namespace itself.
pub fn project_template_namespace<'n>(
    namespace: Option<&'n str>,
    shared_namespace: &str,
) -> Option<&'n str> {
    namespace.filter(|ns| *ns != shared_namespace)
}

/// Fetches a [`CatalogSources`] snapshot for one namespace context
pub struct SourceFetcher<'a> {
    client: Client,
    flags: &'a FeatureFlags,
    registry: &'a PluginRegistry,
    shared_namespace: &'a str,
    charts: Option<&'a dyn ChartFetcher>,
}

impl<'a> SourceFetcher<'a> {
    pub fn new(
        client: Client,
        flags: &'a FeatureFlags,
        registry: &'a PluginRegistry,
        shared_namespace: &'a str,
    ) -> Self {
        Self {
            client,
            flags,
            registry,
            shared_namespace,
            charts: None,
        }
    }

    /// Include Helm charts from this fetcher
    pub fn with_charts(mut self, charts: &'a dyn ChartFetcher) -> Self {
        self.charts = Some(charts);
        self
    }

    /// Fetch every enabled source concurrently
    pub async fn fetch(&self, namespace: Option<&str>) -> Result<CatalogSources, CatalogError> {
        let (
            service_classes,
            cluster_service_classes,
            image_streams,
            templates,
            project_templates,
            plugin_data,
            helm_charts,
        ) = futures::join!(
            self.service_classes(namespace),
            self.cluster_service_classes(),
            self.image_streams(),
            self.shared_templates(),
            self.project_templates(namespace),
            self.plugin_data(namespace),
            self.helm_charts(),
        );

        Ok(CatalogSources {
            loaded: true,
            namespace: namespace.map(str::to_string),
            service_classes,
            cluster_service_classes,
            image_streams,
            template_metadata: templates?,
            project_template_metadata: project_templates?,
            helm_charts,
            plugin_data,
        })
    }

    fn lists(&self, source: ClusterSource) -> bool {
        self.flags.allows(source.required_flag())
    }

    async fn service_classes(&self, namespace: Option<&str>) -> Option<Vec<Value>> {
        if !self.lists(ClusterSource::ServiceClasses) {
            return None;
        }
        optional(
            "service classes",
            list_objects(&self.client, &service_class_resource(), namespace).await,
        )
    }

    async fn cluster_service_classes(&self) -> Option<Vec<Value>> {
        if !self.lists(ClusterSource::ClusterServiceClasses) {
            return None;
        }
        optional(
            "cluster service classes",
            list_objects(&self.client, &cluster_service_class_resource(), None).await,
        )
    }

    async fn image_streams(&self) -> Option<Vec<Value>> {
        if !self.lists(ClusterSource::ImageStreams) {
            return None;
        }
        optional(
            "image streams",
            list_objects(&self.client, &image_stream_resource(), Some(self.shared_namespace))
                .await,
        )
    }

    async fn shared_templates(&self) -> Result<Option<Vec<Value>>, CatalogError> {
        if !self.lists(ClusterSource::Templates) {
            return Ok(None);
        }
        list_template_metadata(&self.client, self.shared_namespace)
            .await
            .map(Some)
            .map_err(|e| CatalogError::list("Templates", e))
    }

    async fn project_templates(
        &self,
        namespace: Option<&str>,
    ) -> Result<Option<Vec<Value>>, CatalogError> {
        let Some(ns) = project_template_namespace(namespace, self.shared_namespace) else {
            return Ok(None);
        };
        if !self.lists(ClusterSource::Templates) {
            return Ok(None);
        }
        list_template_metadata(&self.client, ns)
            .await
            .map(Some)
            .map_err(|e| CatalogError::list("Templates", e))
    }

    async fn plugin_data(&self, namespace: Option<&str>) -> BTreeMap<String, Vec<Value>> {
        let models = self.registry.enabled_models(self.flags);
        let lists = futures::future::join_all(
            models
                .iter()
                .map(|model| self.plugin_objects(model, namespace)),
        )
        .await;

        models
            .iter()
            .zip(lists)
            .filter_map(|(model, list)| list.map(|objects| (model.reference(), objects)))
            .collect()
    }

    async fn plugin_objects(
        &self,
        model: &DevCatalogModel,
        namespace: Option<&str>,
    ) -> Option<Vec<Value>> {
        let scope = if model.model.namespaced { namespace } else { None };
        optional(
            &model.reference(),
            list_objects(&self.client, &plugin_resource(&model.model), scope).await,
        )
    }

    async fn helm_charts(&self) -> Option<HelmChartEntries> {
        let charts = self.charts?;
        match charts.fetch_index().await {
            Ok(index) => Some(index.entries),
            Err(e) => {
                tracing::warn!("{}", CatalogError::HelmIndex(e));
                None
            }
        }
    }
}

/// List namespaced quotas and, on OpenShift, cluster quotas
///
/// Cluster quotas are optional; a failed list is logged and skipped.
pub async fn list_quotas(
    client: &Client,
    namespace: Option<&str>,
    flags: &FeatureFlags,
) -> Result<Vec<Quota>, CatalogError> {
    let api: Api<ResourceQuota> = match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    };

    let cluster_quotas = async {
        if !flags.is_enabled(flags::OPENSHIFT) {
            return None;
        }
        optional(
            "cluster resource quotas",
            list_objects(client, &cluster_resource_quota_resource(), None).await,
        )
    };

    let lp = ListParams::default();
    let (quotas, cluster_quotas) = futures::join!(api.list(&lp), cluster_quotas);
    let quotas = quotas.map_err(|e| CatalogError::list("Resource Quotas", e))?;

    Ok(to_values("ResourceQuota", quotas.items)
        .into_iter()
        .chain(cluster_quotas.unwrap_or_default())
        .filter_map(|value| {
            serde_json::from_value::<Quota>(value)
                .map_err(|e| tracing::warn!("Skipping unreadable quota: {}", e))
                .ok()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_resources() {
        let sc = service_class_resource();
        assert_eq!(sc.api_version, "servicecatalog.k8s.io/v1beta1");
        assert_eq!(sc.plural, "serviceclasses");

        let template = template_resource();
        assert_eq!(template.group, "template.openshift.io");
        assert_eq!(template.kind, "Template");
    }

    #[test]
    fn test_plugin_resource_core_group() {
        let model = ModelRef {
            group: String::new(),
            version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            plural: "configmaps".to_string(),
            namespaced: true,
        };
        let resource = plugin_resource(&model);
        assert_eq!(resource.api_version, "v1");
        assert_eq!(resource.plural, "configmaps");
    }

    #[test]
    fn test_source_gating() {
        let kubernetes = FeatureFlags::from_api_groups(["apps"]);
        assert!(kubernetes.allows(ClusterSource::ServiceClasses.required_flag()));
        assert!(!kubernetes.allows(ClusterSource::ClusterServiceClasses.required_flag()));
        assert!(!kubernetes.allows(ClusterSource::Templates.required_flag()));

        let openshift = FeatureFlags::from_api_groups(["project.openshift.io"]);
        assert!(openshift.allows(ClusterSource::ImageStreams.required_flag()));
        assert!(openshift.allows(ClusterSource::Templates.required_flag()));
    }

    #[test]
    fn test_project_template_namespace() {
        assert_eq!(project_template_namespace(Some("dev"), "openshift"), Some("dev"));
        assert_eq!(project_template_namespace(Some("openshift"), "openshift"), None);
        assert_eq!(project_template_namespace(None, "openshift"), None);
    }

    #[test]
    fn test_optional_absorbs_errors() {
        let err: Result<Vec<Value>, String> = Err("forbidden".to_string());
        assert_eq!(optional("things", err), None);
        assert_eq!(optional::<u8, String>("things", Ok(3)), Some(3));
    }
}
