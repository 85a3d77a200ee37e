//! Typed views over raw catalog source resources
//!
//! The fetcher hands over `serde_json::Value` objects. Each normalizer reads them
//! through one of these views; every field is optional or defaulted so partial
//! objects still produce tiles.

use super::lenient;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Annotation carrying the human readable name of a resource
pub const DISPLAY_NAME_ANNOTATION: &str = "openshift.io/display-name";
pub const PROVIDER_DISPLAY_NAME_ANNOTATION: &str = "openshift.io/provider-display-name";
pub const DOCUMENTATION_URL_ANNOTATION: &str = "openshift.io/documentation-url";
pub const SUPPORT_URL_ANNOTATION: &str = "openshift.io/support-url";
pub const ICON_CLASS_ANNOTATION: &str = "iconClass";
pub const DESCRIPTION_ANNOTATION: &str = "description";
pub const TAGS_ANNOTATION: &str = "tags";
pub const SAMPLE_REPO_ANNOTATION: &str = "sampleRepo";

/// Object metadata subset used by the catalog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub annotations: BTreeMap<String, String>,
}

impl ResourceMeta {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Namespace as a path segment (empty when unset)
    pub fn namespace_or_empty(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }
}

/// ServiceClass / ClusterServiceClass (servicecatalog.k8s.io/v1beta1)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassView {
    #[serde(default)]
    pub metadata: ResourceMeta,
    #[serde(default)]
    pub spec: ServiceClassSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassSpec {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub external_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub external_metadata: ExternalMetadata,
}

/// Broker-supplied free-form metadata of a service class
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetadata {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub provider_display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub support_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub documentation_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url_description: Option<String>,
    #[serde(
        default,
        rename = "console.openshift.io/iconClass",
        deserialize_with = "lenient::opt_string"
    )]
    pub icon_class: Option<String>,
}

impl ServiceClassView {
    /// Display name: external display name, then external name, then object name
    pub fn display_name(&self) -> String {
        self.spec
            .external_metadata
            .display_name
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.spec.external_name.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| self.metadata.name.clone())
    }
}

/// Template metadata (template.openshift.io/v1, metadata-only list)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateView {
    #[serde(default)]
    pub metadata: ResourceMeta,
}

/// ImageStream (image.openshift.io/v1)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageStreamView {
    #[serde(default)]
    pub metadata: ResourceMeta,
    #[serde(default)]
    pub spec: ImageStreamSpec,
    #[serde(default)]
    pub status: ImageStreamStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageStreamSpec {
    #[serde(default)]
    pub tags: Vec<SpecTag>,
}

/// Declared tag of an image stream
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SpecTag {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub annotations: BTreeMap<String, String>,
}

impl SpecTag {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageStreamStatus {
    #[serde(default)]
    pub tags: Vec<StatusTag>,
}

/// Imported tag reported in image stream status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusTag {
    #[serde(default, deserialize_with = "lenient::string")]
    pub tag: String,
}
