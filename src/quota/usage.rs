//! Quota usage and severity
//!
//! Works on both namespaced and cluster quotas; [`Quota`] picks the right
//! limit and usage maps.

use super::quantity::convert_to_base_value;
use crate::models::Quota;
use serde::Serialize;
use std::fmt;

/// Gauge color thresholds in percent
pub const GAUGE_THRESHOLDS: [f64; 2] = [90.0, 101.0];

/// Gauge caption when the quota sets no limit for the resource
pub const NO_QUOTA_LABEL: &str = "No Quota";

/// Resource types that get a gauge
pub const COMPUTE_RESOURCE_TYPES: &[&str] = &[
    "requests.cpu",
    "cpu",
    "limits.cpu",
    "requests.memory",
    "memory",
    "limits.memory",
];

/// Usage of one resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub used: Option<String>,
    pub max: Option<String>,
    pub percent: f64,
}

impl ResourceUsage {
    pub fn bucket(&self) -> UsageBucket {
        UsageBucket::from_percent(self.percent)
    }
}

fn lookup(map: Option<&crate::models::quota::ResourceList>, key: &str) -> Option<String> {
    map.and_then(|m| m.get(key))
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

/// Compute usage of `resource_type`
///
/// The live status limit wins over the declared one. Percent is `0` whenever
/// either side is missing, unparsable, or the limit is zero.
pub fn get_resource_usage(quota: &Quota, resource_type: &str) -> ResourceUsage {
    let max = lookup(quota.status_hard(), resource_type)
        .or_else(|| lookup(quota.spec_hard(), resource_type));
    let used = lookup(quota.status_used(), resource_type);

    let percent = match (used.as_deref(), max.as_deref()) {
        (Some(used), Some(max)) => usage_percent(used, max),
        _ => 0.0,
    };

    ResourceUsage { used, max, percent }
}

fn usage_percent(used: &str, max: &str) -> f64 {
    match (convert_to_base_value(used), convert_to_base_value(max)) {
        (Some(used), Some(max)) if max != 0.0 => {
            let percent = used / max * 100.0;
            if percent.is_finite() { percent } else { 0.0 }
        }
        _ => 0.0,
    }
}

/// Severity of a usage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageBucket {
    Empty,
    AlmostEmpty,
    AlmostFull,
    Full,
    Exceeded,
    Unknown,
}

impl UsageBucket {
    pub fn from_percent(percent: f64) -> Self {
        if percent.is_nan() {
            UsageBucket::Unknown
        } else if percent == 0.0 {
            UsageBucket::Empty
        } else if percent > 0.0 && percent < 50.0 {
            UsageBucket::AlmostEmpty
        } else if (50.0..100.0).contains(&percent) {
            UsageBucket::AlmostFull
        } else if percent == 100.0 {
            UsageBucket::Full
        } else if percent > 100.0 {
            UsageBucket::Exceeded
        } else {
            UsageBucket::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageBucket::Empty => "empty",
            UsageBucket::AlmostEmpty => "almost-empty",
            UsageBucket::AlmostFull => "almost-full",
            UsageBucket::Full => "full",
            UsageBucket::Exceeded => "exceeded",
            UsageBucket::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UsageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorted resource types the quota declares limits for
pub fn quota_resource_types(quota: &Quota) -> Vec<String> {
    // BTreeMap keys are already sorted
    quota
        .spec_hard()
        .map(|hard| hard.keys().cloned().collect())
        .unwrap_or_default()
}

/// Whether any CPU or memory type is limited
pub fn has_compute_resources(resource_types: &[String]) -> bool {
    resource_types
        .iter()
        .any(|t| COMPUTE_RESOURCE_TYPES.contains(&t.as_str()))
}

/// Usage of every declared resource type
pub fn quota_usage_rows(quota: &Quota) -> Vec<(String, ResourceUsage)> {
    quota_resource_types(quota)
        .into_iter()
        .map(|rt| {
            let usage = get_resource_usage(quota, &rt);
            (rt, usage)
        })
        .collect()
}

/// Gauge color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeLevel {
    Ok,
    Warning,
    Danger,
}

/// Compute resource gauge; `percent` is `None` when no quota is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaGauge {
    pub title: &'static str,
    pub percent: Option<f64>,
}

impl QuotaGauge {
    pub fn level(&self) -> Option<GaugeLevel> {
        let percent = self.percent?;
        Some(if percent >= GAUGE_THRESHOLDS[1] {
            GaugeLevel::Danger
        } else if percent >= GAUGE_THRESHOLDS[0] {
            GaugeLevel::Warning
        } else {
            GaugeLevel::Ok
        })
    }

    pub fn caption(&self) -> String {
        match self.percent {
            Some(percent) => format!("{:.0}%", percent),
            None => NO_QUOTA_LABEL.to_string(),
        }
    }
}

/// CPU and memory gauges: request and limit for each
///
/// Requests fall back to the bare `cpu` / `memory` types.
pub fn quota_gauges(quota: &Quota) -> Vec<QuotaGauge> {
    let types = quota_resource_types(quota);
    let has = |t: &str| types.iter().any(|rt| rt == t);
    let gauge = |title: &'static str, candidates: &[&str]| QuotaGauge {
        title,
        percent: candidates
            .iter()
            .find(|t| has(t))
            .map(|t| get_resource_usage(quota, t).percent),
    };

    vec![
        gauge("CPU Request", &["requests.cpu", "cpu"]),
        gauge("CPU Limit", &["limits.cpu"]),
        gauge("Memory Request", &["requests.memory", "memory"]),
        gauge("Memory Limit", &["limits.memory"]),
    ]
}

/// Pod scope a quota applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaScope {
    Terminating,
    NotTerminating,
    BestEffort,
    NotBestEffort,
    Other(String),
}

impl QuotaScope {
    pub fn parse(scope: &str) -> Self {
        match scope {
            "Terminating" => QuotaScope::Terminating,
            "NotTerminating" => QuotaScope::NotTerminating,
            "BestEffort" => QuotaScope::BestEffort,
            "NotBestEffort" => QuotaScope::NotBestEffort,
            other => QuotaScope::Other(other.to_string()),
        }
    }

    /// Display label; unknown scopes show verbatim
    pub fn label(&self) -> &str {
        match self {
            QuotaScope::Terminating => "Terminating",
            QuotaScope::NotTerminating => "Not Terminating",
            QuotaScope::BestEffort => "Best Effort",
            QuotaScope::NotBestEffort => "Not Best Effort",
            QuotaScope::Other(scope) => scope,
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self {
            QuotaScope::Terminating => Some(
                "Affects pods that have an active deadline. These pods usually include builds, deployers, and jobs.",
            ),
            QuotaScope::NotTerminating => Some(
                "Affects pods that do not have an active deadline. These pods usually include your applications.",
            ),
            QuotaScope::BestEffort => Some(
                "Affects pods that do not have resource limits set. These pods have a best effort quality of service.",
            ),
            QuotaScope::NotBestEffort => Some(
                "Affects pods that have at least one resource limit set. These pods do not have a best effort quality of service.",
            ),
            QuotaScope::Other(_) => None,
        }
    }
}

/// Scopes declared by the quota
pub fn quota_scopes(quota: &Quota) -> Vec<QuotaScope> {
    quota.spec.scopes.iter().map(|s| QuotaScope::parse(s)).collect()
}

/// Quota type label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaType {
    Namespace,
    Cluster,
}

impl QuotaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaType::Namespace => "namespace",
            QuotaType::Cluster => "cluster",
        }
    }
}

impl fmt::Display for QuotaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn quota_type(quota: &Quota) -> QuotaType {
    if quota.is_cluster_quota() {
        QuotaType::Cluster
    } else {
        QuotaType::Namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quota(value: serde_json::Value) -> Quota {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_namespaced_usage() {
        let q = quota(json!({
            "metadata": {"name": "compute", "namespace": "dev"},
            "spec": {"hard": {"requests.cpu": "2"}},
            "status": {"hard": {"requests.cpu": "2"}, "used": {"requests.cpu": "500m"}}
        }));
        let usage = get_resource_usage(&q, "requests.cpu");
        assert_eq!(usage.used.as_deref(), Some("500m"));
        assert_eq!(usage.max.as_deref(), Some("2"));
        assert!((usage.percent - 25.0).abs() < 1e-9);
        assert_eq!(usage.bucket(), UsageBucket::AlmostEmpty);
    }

    #[test]
    fn test_max_falls_back_to_spec() {
        let q = quota(json!({
            "metadata": {"name": "compute", "namespace": "dev"},
            "spec": {"hard": {"pods": "10"}},
            "status": {"used": {"pods": "10"}}
        }));
        let usage = get_resource_usage(&q, "pods");
        assert_eq!(usage.percent, 100.0);
        assert_eq!(usage.bucket(), UsageBucket::Full);
    }

    #[test]
    fn test_cluster_quota_paths() {
        let q = quota(json!({
            "metadata": {"name": "team"},
            "spec": {"quota": {"hard": {"pods": "4"}}},
            "status": {"total": {"hard": {"pods": "4"}, "used": {"pods": "6"}}}
        }));
        assert_eq!(quota_type(&q), QuotaType::Cluster);
        assert_eq!(quota_resource_types(&q), vec!["pods"]);
        let usage = get_resource_usage(&q, "pods");
        assert_eq!(usage.percent, 150.0);
        assert_eq!(usage.bucket(), UsageBucket::Exceeded);
    }

    #[test]
    fn test_missing_or_zero_is_zero_percent() {
        let q = quota(json!({
            "metadata": {"name": "q", "namespace": "dev"},
            "spec": {"hard": {"pods": "0", "secrets": "bogus"}},
            "status": {"used": {"pods": "3", "secrets": "1", "services": "2"}}
        }));
        assert_eq!(get_resource_usage(&q, "pods").percent, 0.0);
        assert_eq!(get_resource_usage(&q, "secrets").percent, 0.0);
        assert_eq!(get_resource_usage(&q, "services").percent, 0.0);
        assert_eq!(get_resource_usage(&q, "configmaps").percent, 0.0);
    }

    #[test]
    fn test_buckets() {
        assert_eq!(UsageBucket::from_percent(0.0), UsageBucket::Empty);
        assert_eq!(UsageBucket::from_percent(25.0), UsageBucket::AlmostEmpty);
        assert_eq!(UsageBucket::from_percent(50.0), UsageBucket::AlmostFull);
        assert_eq!(UsageBucket::from_percent(99.9), UsageBucket::AlmostFull);
        assert_eq!(UsageBucket::from_percent(100.0), UsageBucket::Full);
        assert_eq!(UsageBucket::from_percent(150.0), UsageBucket::Exceeded);
        assert_eq!(UsageBucket::from_percent(f64::NAN), UsageBucket::Unknown);
        assert_eq!(UsageBucket::from_percent(-5.0), UsageBucket::Unknown);
    }

    #[test]
    fn test_gauges() {
        let q = quota(json!({
            "metadata": {"name": "q", "namespace": "dev"},
            "spec": {"hard": {"cpu": "1", "limits.memory": "1Gi"}},
            "status": {"used": {"cpu": "950m", "limits.memory": "512Mi"}}
        }));
        let gauges = quota_gauges(&q);
        assert_eq!(gauges.len(), 4);
        assert_eq!(gauges[0].level(), Some(GaugeLevel::Warning));
        assert_eq!(gauges[1].percent, None);
        assert_eq!(gauges[1].caption(), NO_QUOTA_LABEL);
        assert_eq!(gauges[3].caption(), "50%");
        assert!(has_compute_resources(&quota_resource_types(&q)));
    }

    #[test]
    fn test_scopes() {
        let q = quota(json!({
            "metadata": {"name": "q", "namespace": "dev"},
            "spec": {"scopes": ["BestEffort", "CrossNamespacePodAffinity"]}
        }));
        let scopes = quota_scopes(&q);
        assert_eq!(scopes[0].label(), "Best Effort");
        assert!(scopes[0].description().is_some());
        assert_eq!(scopes[1].label(), "CrossNamespacePodAffinity");
        assert_eq!(scopes[1].description(), None);
    }
}
