//! Catalog item kind definitions
//!
//! Every catalog tile carries exactly one kind. The built-in kinds are fixed;
//! plugin-contributed kinds are carried by name.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Source kind of a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    ServiceClass,
    ClusterServiceClass,
    ImageStream,
    Template,
    HelmChart,
    /// Kind contributed by a registered catalog plugin
    Plugin(String),
}

impl CatalogKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &str {
        match self {
            CatalogKind::ServiceClass => "ServiceClass",
            CatalogKind::ClusterServiceClass => "ClusterServiceClass",
            CatalogKind::ImageStream => "ImageStream",
            CatalogKind::Template => "Template",
            CatalogKind::HelmChart => "HelmChart",
            CatalogKind::Plugin(kind) => kind,
        }
    }

    /// Built-in kinds, in aggregation order
    pub fn builtin() -> &'static [Self] {
        &[
            CatalogKind::ServiceClass,
            CatalogKind::ClusterServiceClass,
            CatalogKind::ImageStream,
            CatalogKind::Template,
            CatalogKind::HelmChart,
        ]
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self, CatalogKind::Plugin(_))
    }

    /// Parse user input (case-insensitive, with short aliases)
    ///
    /// Unknown names are treated as plugin kinds so `--kind` filters also work
    /// for plugin-contributed tiles.
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "serviceclass" | "serviceclasses" | "sc" => CatalogKind::ServiceClass,
            "clusterserviceclass" | "clusterserviceclasses" | "csc" => {
                CatalogKind::ClusterServiceClass
            }
            "imagestream" | "imagestreams" | "is" => CatalogKind::ImageStream,
            "template" | "templates" => CatalogKind::Template,
            "helmchart" | "helmcharts" | "helm" | "chart" => CatalogKind::HelmChart,
            _ => CatalogKind::Plugin(s.to_string()),
        }
    }

    /// Case-insensitive comparison used by kind filters
    pub fn matches(&self, other: &CatalogKind) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<CatalogKind> for String {
    fn from(kind: CatalogKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for CatalogKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ServiceClass" => CatalogKind::ServiceClass,
            "ClusterServiceClass" => CatalogKind::ClusterServiceClass,
            "ImageStream" => CatalogKind::ImageStream,
            "Template" => CatalogKind::Template,
            "HelmChart" => CatalogKind::HelmChart,
            other => CatalogKind::Plugin(other.to_string()),
        })
    }
}

impl Serialize for CatalogKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CatalogKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(CatalogKind::Plugin(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(CatalogKind::ServiceClass.as_str(), "ServiceClass");
        assert_eq!(CatalogKind::HelmChart.as_str(), "HelmChart");
        assert_eq!(
            CatalogKind::Plugin("ClusterServiceVersion".to_string()).as_str(),
            "ClusterServiceVersion"
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Template".parse::<CatalogKind>().unwrap(),
            CatalogKind::Template
        );
        assert_eq!(
            "Operator".parse::<CatalogKind>().unwrap(),
            CatalogKind::Plugin("Operator".to_string())
        );
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(
            CatalogKind::from_str_case_insensitive("helm"),
            CatalogKind::HelmChart
        );
        assert_eq!(
            CatalogKind::from_str_case_insensitive("IS"),
            CatalogKind::ImageStream
        );
        assert_eq!(
            CatalogKind::from_str_case_insensitive("csc"),
            CatalogKind::ClusterServiceClass
        );
        assert!(CatalogKind::from_str_case_insensitive("operator").is_plugin());
    }

    #[test]
    fn test_plugin_kind_matches_ignoring_case() {
        let kind = CatalogKind::Plugin("ClusterServiceVersion".to_string());
        assert!(kind.matches(&CatalogKind::from_str_case_insensitive(
            "clusterserviceversion"
        )));
        assert!(!kind.matches(&CatalogKind::Template));
    }

    #[test]
    fn test_serialize_as_plain_string() {
        let json = serde_json::to_string(&CatalogKind::ImageStream).unwrap();
        assert_eq!(json, "\"ImageStream\"");

        let kind: CatalogKind = serde_json::from_str("\"Widget\"").unwrap();
        assert_eq!(kind, CatalogKind::Plugin("Widget".to_string()));
    }
}
