//! Developer catalog pipeline
//!
//! Raw cluster lists are normalized per kind into [`Item`](crate::models::Item)
//! tiles, then aggregated into one sorted list.

pub mod aggregate;
pub mod helm;
pub mod icons;
pub mod image_stream;
pub mod normalize;

pub use aggregate::{CatalogSources, CatalogState, aggregate, filter_items, sort_items};
pub use helm::{ChartFetcher, HttpChartFetcher, readme_from_bundle};
pub use normalize::{
    normalize_cluster_service_classes, normalize_helm_charts, normalize_image_streams,
    normalize_service_classes, normalize_templates,
};

/// Catalog fetch errors surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A required source list could not be fetched
    #[error("Failed to load {label}: {source}")]
    List {
        label: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to load Helm chart index: {0:#}")]
    HelmIndex(#[source] anyhow::Error),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

impl CatalogError {
    pub fn list(label: impl Into<String>, source: kube::Error) -> Self {
        Self::List {
            label: label.into(),
            source,
        }
    }
}
