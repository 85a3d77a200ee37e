//! Helm chart repository index and chart bundle types

use super::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Chart name to version entries, as found under `entries` in `index.yaml`
pub type HelmChartEntries = BTreeMap<String, Vec<HelmChartEntry>>;

/// Chart repository index (`index.yaml`)
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmIndex {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub api_version: Option<String>,
    #[serde(default, deserialize_with = "chart_entries")]
    pub entries: HelmChartEntries,
}

/// Chart entries where an unreadable version only drops itself
fn chart_entries<'de, D>(deserializer: D) -> Result<HelmChartEntries, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Object(charts)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(HelmChartEntries::new());
    };

    Ok(charts
        .into_iter()
        .filter_map(|(name, versions)| {
            let Value::Array(versions) = versions else {
                tracing::warn!("Skipping chart {}: versions are not a list", name);
                return None;
            };
            let entries: Vec<HelmChartEntry> = versions
                .into_iter()
                .filter_map(|version| {
                    serde_json::from_value(version)
                        .map_err(|e| {
                            tracing::warn!("Skipping unreadable {} chart entry: {}", name, e)
                        })
                        .ok()
                })
                .collect();
            (!entries.is_empty()).then_some((name, entries))
        })
        .collect())
}

/// One version of a chart in the repository index
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartEntry {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub api_version: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub app_version: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub digest: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub home: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub maintainers: Vec<HelmMaintainer>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub urls: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tiller_version: Option<String>,
}

impl HelmChartEntry {
    /// First download URL, which keys the chart bundle request
    pub fn chart_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct HelmMaintainer {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
}

/// Chart package contents returned by the console chart endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ChartBundle {
    #[serde(default)]
    pub files: Vec<ChartFile>,
}

/// A file of a chart package; `data` is base64 encoded
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ChartFile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub data: Option<String>,
}

/// Deferred README loader attached to Helm chart tiles
///
/// Holds only the chart URL; the README is fetched when a tile is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReadme {
    pub chart_url: Option<String>,
}
