//! Resource quota views
//!
//! Covers both `ResourceQuota` (namespaced) and OpenShift `ClusterResourceQuota`
//! (cluster-scoped, totals nested under `quota`/`total`).

use super::lenient;
use super::resources::ResourceMeta;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Quantity strings keyed by resource type (e.g. `requests.cpu` -> `500m`)
pub type ResourceList = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quota {
    #[serde(default)]
    pub metadata: ResourceMeta,
    #[serde(default)]
    pub spec: QuotaSpec,
    #[serde(default)]
    pub status: QuotaStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaSpec {
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub hard: ResourceList,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub scopes: Vec<String>,
    /// Cluster quota spec
    #[serde(default)]
    pub quota: Option<HardLimits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaStatus {
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub hard: ResourceList,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub used: ResourceList,
    /// Cluster quota totals across selected namespaces
    #[serde(default)]
    pub total: Option<QuotaTotals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HardLimits {
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub hard: ResourceList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaTotals {
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub hard: ResourceList,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub used: ResourceList,
}

impl Quota {
    /// Cluster quotas are the ones without a namespace
    pub fn is_cluster_quota(&self) -> bool {
        self.metadata
            .namespace
            .as_deref()
            .is_none_or(str::is_empty)
    }

    /// Declared hard limits
    pub fn spec_hard(&self) -> Option<&ResourceList> {
        if self.is_cluster_quota() {
            self.spec.quota.as_ref().map(|q| &q.hard)
        } else {
            Some(&self.spec.hard)
        }
    }

    /// Hard limits reported by the quota controller
    pub fn status_hard(&self) -> Option<&ResourceList> {
        if self.is_cluster_quota() {
            self.status.total.as_ref().map(|t| &t.hard)
        } else {
            Some(&self.status.hard)
        }
    }

    /// Current usage reported by the quota controller
    pub fn status_used(&self) -> Option<&ResourceList> {
        if self.is_cluster_quota() {
            self.status.total.as_ref().map(|t| &t.used)
        } else {
            Some(&self.status.used)
        }
    }
}
