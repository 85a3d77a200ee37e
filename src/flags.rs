//! Cluster feature flags
//!
//! Flags gate which catalog sources are fetched. They are detected from the
//! API groups a cluster serves, and can be pinned in the config file.

use std::collections::BTreeMap;

/// Cluster is an OpenShift cluster (templates, image streams, cluster quotas)
pub const OPENSHIFT: &str = "OPENSHIFT";

/// Service catalog API is installed (cluster service classes)
pub const SERVICE_CATALOG: &str = "SERVICE_CATALOG";

/// API groups whose presence sets a flag
pub const FLAG_API_GROUPS: &[(&str, &str)] = &[
    (OPENSHIFT, "project.openshift.io"),
    (SERVICE_CATALOG, "servicecatalog.k8s.io"),
];

/// Resolved set of feature flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    flags: BTreeMap<String, bool>,
}

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive flags from the list of served API group names
    pub fn from_api_groups<'a>(groups: impl IntoIterator<Item = &'a str>) -> Self {
        let groups: Vec<&str> = groups.into_iter().collect();
        let mut flags = Self::new();
        for (flag, group) in FLAG_API_GROUPS {
            flags.set(flag, groups.contains(group));
        }
        flags
    }

    pub fn set(&mut self, flag: &str, enabled: bool) {
        self.flags.insert(flag.to_string(), enabled);
    }

    /// Pin a flag when an override is given
    pub fn apply_override(&mut self, flag: &str, value: Option<bool>) {
        if let Some(enabled) = value {
            self.set(flag, enabled);
        }
    }

    /// Unknown flags are disabled
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    /// Optional flag gate: no flag means always enabled
    pub fn allows(&self, flag: Option<&str>) -> bool {
        flag.is_none_or(|f| self.is_enabled(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
