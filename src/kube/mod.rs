//! Kubernetes client module
//!
//! Supports HTTP/HTTPS proxy configuration via the standard `HTTP_PROXY`,
//! `HTTPS_PROXY` and `NO_PROXY` environment variables. Internal API server
//! hosts are added to `NO_PROXY` automatically.

pub mod fetch;

pub use fetch::{SourceFetcher, detect_flags, list_quotas, resolve_flags};

use anyhow::{Context, Result};
use kube::{Client, Config};
use url::Url;

/// Initialize a Kubernetes client from the inferred kubeconfig
///
/// Loading order: in-cluster config, `KUBECONFIG`, then `~/.kube/config`.
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to load Kubernetes configuration")?;

    if let Some(host) = Url::parse(&config.cluster_url.to_string())
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
    {
        ensure_no_proxy_bypass(&host);
    }

    tracing::debug!("Connecting to cluster at {}", config.cluster_url);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Namespace to work in: the command line wins over the configured default
///
/// `all`, `-A` and the empty string select all namespaces.
pub fn resolve_namespace(cli: Option<&str>, configured: Option<&str>) -> Option<String> {
    let namespace = cli.or(configured)?;
    if namespace.is_empty() || namespace == "all" || namespace == "-A" {
        return None;
    }
    Some(namespace.to_string())
}

/// Add an internal host to NO_PROXY unless it is already covered
fn ensure_no_proxy_bypass(host: &str) {
    if !is_internal_host(host) {
        return;
    }

    let current = std::env::var("NO_PROXY")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("no_proxy").ok())
        .unwrap_or_default();

    if no_proxy_contains(&current, host) {
        return;
    }

    let updated = if current.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current, host)
    };

    tracing::debug!("Adding {} to NO_PROXY", host);
    // SAFETY: runs on the main task while the first client is built. The
    // runtime's worker threads are up but no other task has been spawned, so
    // nothing reads the environment concurrently.
    unsafe {
        std::env::set_var("NO_PROXY", &updated);
        std::env::set_var("no_proxy", &updated);
    }
}

/// Private addresses, loopback and internal-looking domains
fn is_internal_host(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("172.")
        || host.starts_with("192.168.")
        || matches!(host, "localhost" | "127.0.0.1" | "::1")
    {
        return true;
    }

    if host.ends_with(".local") || host.ends_with(".internal") {
        return true;
    }

    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() < 2 {
        return false;
    }
    if matches!(parts[parts.len() - 2], "corp" | "internal" | "int" | "local") {
        return true;
    }

    // Environment prefixes anywhere but the TLD (devprod.example.com)
    parts[..parts.len() - 1].iter().any(|part| {
        ["dev", "test", "staging", "qa", "uat", "internal"]
            .iter()
            .any(|prefix| part.starts_with(prefix))
    })
}

/// Whether a NO_PROXY list already covers `host`
///
/// `example.com` and `.example.com` both cover the domain and its subdomains.
fn no_proxy_contains(no_proxy: &str, host: &str) -> bool {
    no_proxy
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .any(|pattern| {
            let domain = pattern.strip_prefix('.').unwrap_or(pattern);
            host == domain || host.ends_with(&format!(".{}", domain))
        })
}
