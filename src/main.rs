//! devcatalog - developer catalog and resource quota views for Kubernetes
//!
//! Lists the tiles a web console's developer catalog would show for a
//! namespace, and summarizes resource quota usage.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devcatalog::catalog::{self, CatalogState, ChartFetcher, HttpChartFetcher};
use devcatalog::cli::{self, ConfigSubcommand, PluginSubcommand};
use devcatalog::config::{Config, ConfigLoader};
use devcatalog::kube::{self as cluster, SourceFetcher};
use devcatalog::models::{CatalogKind, ChartReadme, Quota};
use devcatalog::plugins::{PluginLoader, PluginRegistry};
use devcatalog::quota;
use serde_json::json;

/// devcatalog - developer catalog and resource quota views for Kubernetes
#[derive(Parser, Debug)]
#[command(name = "devcatalog")]
#[command(version)]
#[command(about = "Developer catalog and resource quota views for Kubernetes and OpenShift clusters", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Namespace to work in ("all" for all namespaces)
    #[arg(long, short = 'n', global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// List developer catalog tiles
    Catalog {
        /// Print tiles as JSON
        #[arg(long)]
        json: bool,

        /// Only show tiles of this kind (e.g., "templates", "helm")
        #[arg(long)]
        kind: Option<String>,

        /// Only show tiles carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show resource quota usage
    Quota {
        /// Print quotas as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the README of a Helm chart
    Readme {
        /// Chart name in the repository index
        chart: String,

        /// Chart version (defaults to the first listed version)
        #[arg(long)]
        version: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Catalog plugin management
    Plugins {
        #[command(subcommand)]
        subcommand: PluginSubcommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    match args.command {
        Command::Config { subcommand } => cli::handle_config_command(subcommand),
        Command::Plugins { subcommand } => cli::handle_plugin_command(subcommand),
        Command::Catalog { json, kind, tag } => {
            let config = load_config(args.debug);
            let namespace = cluster::resolve_namespace(
                args.namespace.as_deref(),
                config.default_namespace.as_deref(),
            );
            run_catalog(&config, namespace.as_deref(), json, kind, tag).await
        }
        Command::Quota { json } => {
            let config = load_config(args.debug);
            let namespace = cluster::resolve_namespace(
                args.namespace.as_deref(),
                config.default_namespace.as_deref(),
            );
            run_quota(&config, namespace.as_deref(), json).await
        }
        Command::Readme { chart, version } => {
            let config = load_config(args.debug);
            run_readme(&config, &chart, version.as_deref()).await
        }
    }
}

fn load_config(debug: bool) -> Config {
    let config = ConfigLoader::load().unwrap_or_else(|e| {
        if debug {
            tracing::warn!("Failed to load configuration: {:#}, using defaults", e);
        }
        ConfigLoader::load_defaults()
    });
    tracing::debug!(
        "Configuration loaded: consoleUrl={}, helm.enabled={}",
        config.console_url,
        config.helm.enabled
    );
    config
}

fn chart_fetcher(config: &Config) -> Result<HttpChartFetcher> {
    HttpChartFetcher::new(&config.console_url, config.helm.timeout()?)
}

async fn run_catalog(
    config: &Config,
    namespace: Option<&str>,
    json: bool,
    kind: Option<String>,
    tag: Option<String>,
) -> Result<()> {
    let client = cluster::create_client().await?;
    let flags = cluster::resolve_flags(&client, &config.features).await;

    let manifests = PluginLoader::new().load_all()?;
    let registry =
        PluginRegistry::from_manifests(&manifests).context("Failed to register catalog plugins")?;
    tracing::debug!("Registered {} catalog plugin(s)", registry.len());

    let charts = if config.helm.enabled {
        Some(chart_fetcher(config)?)
    } else {
        None
    };

    let mut fetcher = SourceFetcher::new(
        client,
        &flags,
        &registry,
        &config.catalog.shared_namespace,
    );
    if let Some(charts) = charts.as_ref() {
        fetcher = fetcher.with_charts(charts);
    }
    let sources = fetcher.fetch(namespace).await?;

    let mut state = CatalogState::new();
    state.update(sources, &registry);
    let items = state.items();

    let kind = kind.map(|k| CatalogKind::from_str_case_insensitive(&k));
    let filtered = catalog::filter_items(&items, kind.as_ref(), tag.as_deref());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&filtered).context("Failed to serialize catalog")?
        );
    } else {
        print!("{}", cli::render_catalog_table(&filtered));
    }
    Ok(())
}

fn quota_json(quota: &Quota) -> serde_json::Value {
    let usage: Vec<_> = quota::quota_usage_rows(quota)
        .into_iter()
        .map(|(resource_type, usage)| {
            json!({
                "resourceType": resource_type,
                "used": usage.used,
                "max": usage.max,
                "percent": usage.percent,
                "bucket": usage.bucket(),
            })
        })
        .collect();
    let scopes: Vec<_> = quota::quota_scopes(quota)
        .iter()
        .map(|scope| json!({"label": scope.label(), "description": scope.description()}))
        .collect();

    json!({
        "name": quota.metadata.name,
        "namespace": quota.metadata.namespace,
        "type": quota::quota_type(quota),
        "scopes": scopes,
        "gauges": quota::quota_gauges(quota),
        "usage": usage,
    })
}

async fn run_quota(config: &Config, namespace: Option<&str>, json: bool) -> Result<()> {
    let client = cluster::create_client().await?;
    let flags = cluster::resolve_flags(&client, &config.features).await;
    let quotas = cluster::list_quotas(&client, namespace, &flags).await?;

    if json {
        let values: Vec<_> = quotas.iter().map(quota_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&values).context("Failed to serialize quotas")?
        );
        return Ok(());
    }

    if quotas.is_empty() {
        println!("No resource quotas found.");
        return Ok(());
    }
    let rendered: Vec<String> = quotas.iter().map(cli::render_quota).collect();
    print!("{}", rendered.join("\n"));
    Ok(())
}

async fn run_readme(config: &Config, chart: &str, version: Option<&str>) -> Result<()> {
    let fetcher = chart_fetcher(config)?;
    let index = fetcher.fetch_index().await?;

    let entries = index
        .entries
        .get(chart)
        .with_context(|| format!("Chart not found in repository index: {}", chart))?;
    let entry = match version {
        Some(version) => entries
            .iter()
            .find(|e| e.version == version)
            .with_context(|| format!("Chart {} has no version {}", chart, version))?,
        None => entries
            .first()
            .with_context(|| format!("Chart {} has no versions", chart))?,
    };

    let readme = ChartReadme {
        chart_url: entry.chart_url().map(str::to_string),
    };
    match readme.load(&fetcher).await {
        Some(markdown) => println!("{}", markdown),
        None => println!("No README available for {} {}", entry.name, entry.version),
    }
    Ok(())
}
