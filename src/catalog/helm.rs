//! Helm chart repository access and deferred README loading
//!
//! The console proxies the configured chart repository: the index is served
//! as YAML and individual chart packages are unpacked into a JSON file list.

use crate::models::{ChartBundle, ChartReadme, HelmIndex};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Console path serving the chart repository index
pub const HELM_INDEX_PATH: &str = "/api/helm/charts/index.yaml";

/// Console path serving unpacked chart packages
pub const HELM_CHART_PATH: &str = "/api/helm/chart";

/// Chart file rendered as the tile's long description
pub const README_FILE_NAME: &str = "README.md";

/// Source of chart repository data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartFetcher: Send + Sync {
    /// Fetch and parse the repository index
    async fn fetch_index(&self) -> Result<HelmIndex>;

    /// Fetch the unpacked package of the chart at `chart_url`
    async fn fetch_chart(&self, chart_url: &str) -> Result<ChartBundle>;
}

/// Chart fetcher talking to the console's Helm endpoints
pub struct HttpChartFetcher {
    client: reqwest::Client,
    console_url: String,
}

impl HttpChartFetcher {
    pub fn new(console_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::debug!("Created Helm chart fetcher for: {}", console_url);

        Ok(Self {
            client,
            console_url: console_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.console_url, path)
    }
}

#[async_trait]
impl ChartFetcher for HttpChartFetcher {
    async fn fetch_index(&self) -> Result<HelmIndex> {
        let endpoint = self.endpoint(HELM_INDEX_PATH);
        tracing::debug!("Fetching Helm index from: {}", endpoint);

        let resp = self
            .client
            .get(&endpoint)
            .send()
            .await
            .with_context(|| format!("Failed to fetch from: {}", endpoint))?;

        if !resp.status().is_success() {
            anyhow::bail!(
                "HTTP request failed: {} (status: {})",
                endpoint,
                resp.status()
            );
        }

        let body = resp.text().await.context("Failed to read Helm index")?;
        let index: HelmIndex =
            serde_yaml::from_str(&body).context("Failed to parse Helm index YAML")?;

        tracing::debug!(
            "Fetched Helm index with {} chart(s)",
            index.entries.len()
        );

        Ok(index)
    }

    async fn fetch_chart(&self, chart_url: &str) -> Result<ChartBundle> {
        let endpoint = self.endpoint(HELM_CHART_PATH);
        tracing::debug!("Fetching chart {} from: {}", chart_url, endpoint);

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("url", chart_url)])
            .send()
            .await
            .with_context(|| format!("Failed to fetch chart: {}", chart_url))?;

        if !resp.status().is_success() {
            anyhow::bail!(
                "HTTP request failed: {} (status: {})",
                endpoint,
                resp.status()
            );
        }

        resp.json().await.context("Failed to parse chart JSON response")
    }
}

/// Extract and decode the README of a chart bundle
///
/// Returns `None` when the bundle has no `README.md` or its data is not valid
/// base64 UTF-8.
pub fn readme_from_bundle(bundle: &ChartBundle) -> Option<String> {
    let data = bundle
        .files
        .iter()
        .find(|file| file.name == README_FILE_NAME)?
        .data
        .as_deref()
        .filter(|d| !d.is_empty())?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| tracing::warn!("Failed to decode chart README: {}", e))
        .ok()?;
    let text = String::from_utf8(decoded)
        .map_err(|e| tracing::warn!("Chart README is not UTF-8: {}", e))
        .ok()?;

    Some(format!("## README\n{}", text))
}

impl ChartReadme {
    /// Load the README markdown for this chart
    ///
    /// Never fails: fetch and decode errors are logged and yield `None`.
    pub async fn load(&self, fetcher: &dyn ChartFetcher) -> Option<String> {
        let chart_url = self.chart_url.as_deref()?;
        match fetcher.fetch_chart(chart_url).await {
            Ok(bundle) => readme_from_bundle(&bundle),
            Err(e) => {
                tracing::warn!("Failed to load README for {}: {:#}", chart_url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartFile;

    fn encoded(text: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(text)
    }

    fn bundle(files: Vec<(&str, Option<String>)>) -> ChartBundle {
        ChartBundle {
            files: files
                .into_iter()
                .map(|(name, data)| ChartFile {
                    name: name.to_string(),
                    data,
                })
                .collect(),
        }
    }

    #[test]
    fn test_readme_from_bundle() {
        let b = bundle(vec![
            ("Chart.yaml", Some(encoded("name: nginx"))),
            ("README.md", Some(encoded("# Nginx\nA web server"))),
        ]);
        assert_eq!(
            readme_from_bundle(&b).as_deref(),
            Some("## README\n# Nginx\nA web server")
        );
    }

    #[test]
    fn test_readme_name_must_match_exactly() {
        let b = bundle(vec![("readme.md", Some(encoded("lower")))]);
        assert_eq!(readme_from_bundle(&b), None);
    }

    #[test]
    fn test_readme_invalid_base64() {
        let b = bundle(vec![("README.md", Some("%%%".to_string()))]);
        assert_eq!(readme_from_bundle(&b), None);
    }

    #[tokio::test]
    async fn test_load_readme_through_fetcher() {
        let mut fetcher = MockChartFetcher::new();
        fetcher
            .expect_fetch_chart()
            .withf(|url| url.to_string() == "https://charts.example.com/nginx-1.0.tgz")
            .times(1)
            .returning(|_| Ok(bundle(vec![("README.md", Some(encoded("hello")))])));

        let readme = ChartReadme {
            chart_url: Some("https://charts.example.com/nginx-1.0.tgz".to_string()),
        };
        assert_eq!(
            readme.load(&fetcher).await.as_deref(),
            Some("## README\nhello")
        );
    }

    #[tokio::test]
    async fn test_load_readme_fetch_error_is_absent() {
        let mut fetcher = MockChartFetcher::new();
        fetcher
            .expect_fetch_chart()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let readme = ChartReadme {
            chart_url: Some("https://charts.example.com/x.tgz".to_string()),
        };
        assert_eq!(readme.load(&fetcher).await, None);
    }

    #[tokio::test]
    async fn test_load_readme_without_url_skips_fetch() {
        let mut fetcher = MockChartFetcher::new();
        fetcher.expect_fetch_chart().never();

        let readme = ChartReadme { chart_url: None };
        assert_eq!(readme.load(&fetcher).await, None);
    }

    #[test]
    fn test_fetcher_trims_trailing_slash() {
        let fetcher =
            HttpChartFetcher::new("http://console.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            fetcher.endpoint(HELM_INDEX_PATH),
            "http://console.local/api/helm/charts/index.yaml"
        );
    }
}
