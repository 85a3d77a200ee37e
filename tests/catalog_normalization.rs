//! Catalog normalization tests
//!
//! Exercises every built-in source through the public aggregation entry point
//! with realistic cluster objects.

use devcatalog::catalog::{self, CatalogSources};
use devcatalog::models::{
    CatalogKind, DEFAULT_ICON_CLASS, HelmChartEntries, HelmChartEntry, HelmIndex, Item,
    PLACEHOLDER_IMAGE_URL,
};
use devcatalog::plugins::PluginRegistry;
use serde_json::{Value, json};

fn service_class(name: &str, display: &str, image_url: Option<&str>, icon: Option<&str>) -> Value {
    let mut external = json!({
        "displayName": display,
        "providerDisplayName": "Red Hat",
        "documentationUrl": "https://docs.example.com",
        "urlDescription": "https://about.example.com"
    });
    if let Some(url) = image_url {
        external["imageUrl"] = json!(url);
    }
    if let Some(icon) = icon {
        external["console.openshift.io/iconClass"] = json!(icon);
    }
    json!({
        "metadata": {"name": name, "uid": format!("uid-{}", name)},
        "spec": {
            "externalName": name,
            "description": format!("{} service", display),
            "tags": ["database"],
            "externalMetadata": external
        }
    })
}

fn template(name: &str, display: &str, tags: &str) -> Value {
    json!({
        "metadata": {
            "name": name,
            "namespace": "openshift",
            "annotations": {
                "openshift.io/display-name": display,
                "iconClass": "icon-ruby",
                "tags": tags,
                "description": "An example application"
            }
        }
    })
}

fn builder_stream(name: &str, tags: &[&str], imported: &[&str]) -> Value {
    let spec_tags: Vec<Value> = tags
        .iter()
        .map(|tag| {
            json!({
                "name": tag,
                "annotations": {
                    "tags": "builder,ruby",
                    "iconClass": "icon-ruby",
                    "description": format!("Ruby {}", tag),
                    "sampleRepo": "https://github.com/sclorg/ruby-ex.git"
                }
            })
        })
        .collect();
    let status_tags: Vec<Value> = imported.iter().map(|tag| json!({"tag": tag})).collect();
    json!({
        "metadata": {"name": name, "namespace": "openshift"},
        "spec": {"tags": spec_tags},
        "status": {"tags": status_tags}
    })
}

fn nginx_charts() -> HelmChartEntries {
    let entry = |version: &str| HelmChartEntry {
        name: "nginx".to_string(),
        version: version.to_string(),
        description: Some("Web server".to_string()),
        keywords: vec!["web".to_string()],
        urls: vec![format!("https://charts.example.com/nginx-{}.tgz", version)],
        ..Default::default()
    };
    let mut entries = HelmChartEntries::new();
    entries.insert("nginx".to_string(), vec![entry("1.0"), entry("2.0")]);
    entries
}

fn loaded(namespace: Option<&str>) -> CatalogSources {
    CatalogSources {
        loaded: true,
        namespace: namespace.map(str::to_string),
        ..Default::default()
    }
}

fn find<'a>(items: &'a [Item], name: &str) -> &'a Item {
    items
        .iter()
        .find(|item| item.tile_name == name)
        .unwrap_or_else(|| panic!("no tile named {}", name))
}

#[test]
fn test_every_item_has_exactly_one_visual() {
    let mut sources = loaded(Some("dev"));
    sources.service_classes = Some(vec![service_class(
        "mysql",
        "MySQL",
        Some(PLACEHOLDER_IMAGE_URL),
        None,
    )]);
    sources.cluster_service_classes = Some(vec![service_class("redis", "Redis", None, None)]);
    sources.template_metadata = Some(vec![template("rails", "Rails", "ruby")]);
    sources.image_streams = Some(vec![builder_stream("ruby", &["2.5"], &["2.5"])]);
    sources.helm_charts = Some(nginx_charts());

    let items = catalog::aggregate(&sources, &PluginRegistry::new());
    assert_eq!(items.len(), 6);

    for item in &items {
        let value = serde_json::to_value(item).unwrap();
        let has_img = value.get("tileImgUrl").is_some();
        let has_icon = value.get("tileIconClass").is_some();
        assert!(
            has_img ^ has_icon,
            "{} should carry exactly one visual",
            item.tile_name
        );
        assert_ne!(item.tile_img_url(), Some(PLACEHOLDER_IMAGE_URL));
    }
}

#[test]
fn test_placeholder_image_falls_back_to_icon() {
    let items = catalog::normalize_service_classes(
        &[
            service_class(
                "mysql",
                "MySQL",
                Some(PLACEHOLDER_IMAGE_URL),
                Some("fa fa-database"),
            ),
            service_class("plain", "Plain", Some(PLACEHOLDER_IMAGE_URL), None),
        ],
        Some("dev"),
    );

    assert_eq!(items[0].tile_img_url(), None);
    assert_eq!(items[0].tile_icon_class(), Some("fa fa-database"));
    assert_eq!(items[1].tile_icon_class(), Some(DEFAULT_ICON_CLASS));
}

#[test]
fn test_service_class_links() {
    let raw = [service_class("mysql", "MySQL", None, None)];

    let namespaced = catalog::normalize_service_classes(&raw, Some("dev"));
    assert_eq!(namespaced[0].href, "/k8s/ns/dev/serviceinstances/~new");
    assert_eq!(
        namespaced[0].documentation_url.as_deref(),
        Some("https://about.example.com")
    );
    assert_eq!(namespaced[0].tile_provider.as_deref(), Some("Red Hat"));

    let all_namespaces = catalog::normalize_service_classes(&raw, None);
    assert_eq!(all_namespaces[0].href, "/k8s/ns/default/serviceinstances/~new");

    let cluster = catalog::normalize_cluster_service_classes(&raw);
    assert_eq!(cluster[0].href, "/k8s/ns/default/serviceinstances/~new");
    assert_eq!(cluster[0].kind, CatalogKind::ClusterServiceClass);
    assert_eq!(
        cluster[0].documentation_url.as_deref(),
        Some("https://docs.example.com")
    );
}

#[test]
fn test_hidden_templates_are_excluded() {
    let items = catalog::normalize_templates(
        &[
            template("rails", "Rails", "ruby, rails"),
            template("internal", "Internal", "ruby,hidden"),
        ],
        Some("dev"),
    );

    assert_eq!(items.len(), 1);
    let rails = &items[0];
    assert_eq!(rails.tile_name, "Rails");
    assert_eq!(rails.tags, vec!["ruby", "rails"]);
    assert_eq!(
        rails.href,
        "/catalog/instantiate-template?template=rails&template-ns=openshift&preselected-ns=dev"
    );
}

#[test]
fn test_template_without_tags_has_no_empty_tag() {
    let raw = json!({"metadata": {"name": "bare", "namespace": "openshift"}});
    let items = catalog::normalize_templates(&[raw], None);
    assert_eq!(items[0].tile_name, "bare");
    assert!(items[0].tags.is_empty());
    assert!(items[0].href.ends_with("&preselected-ns="));
}

#[test]
fn test_image_streams_need_an_imported_builder_tag() {
    let items = catalog::normalize_image_streams(
        &[
            builder_stream("ruby", &["2.4", "2.5", "latest"], &["2.4", "2.5", "latest"]),
            builder_stream("not-imported", &["1.0"], &[]),
        ],
        Some("dev"),
    );

    assert_eq!(items.len(), 1);
    let ruby = &items[0];
    assert_eq!(ruby.tile_name, "ruby");
    assert_eq!(ruby.tile_description.as_deref(), Some("Ruby 2.5"));
    assert_eq!(ruby.tags, vec!["builder", "ruby"]);
    assert_eq!(
        ruby.sample_repo.as_deref(),
        Some("https://github.com/sclorg/ruby-ex.git")
    );
    assert_eq!(
        ruby.href,
        "/catalog/source-to-image?imagestream=ruby&imagestream-ns=openshift&preselected-ns=dev"
    );
}

#[test]
fn test_helm_chart_versions_become_tiles() {
    let items = catalog::normalize_helm_charts(&nginx_charts(), Some("dev"));
    let names: Vec<&str> = items.iter().map(|item| item.tile_name.as_str()).collect();
    assert_eq!(names, vec!["Nginx v1.0", "Nginx v2.0"]);

    let first = &items[0];
    assert_eq!(first.kind, CatalogKind::HelmChart);
    assert_eq!(
        first.href,
        "/catalog/helm-install?chartName=nginx&chartURL=https%3A%2F%2Fcharts.example.com%2Fnginx-1.0.tgz&preselected-ns=dev"
    );
    assert_eq!(
        first
            .markdown_description
            .as_ref()
            .and_then(|readme| readme.chart_url.as_deref()),
        Some("https://charts.example.com/nginx-1.0.tgz")
    );
    assert_eq!(first.custom_properties[0].label, "Chart Version");
    assert_eq!(first.custom_properties[0].value, "1.0");
}

#[test]
fn test_aggregate_is_sorted_and_stable() {
    let mut sources = loaded(Some("dev"));
    sources.service_classes = Some(vec![service_class("a", "Zeta", None, None)]);
    sources.template_metadata = Some(vec![
        template("shared", "Duplicate", "shared"),
        template("alpha", "Alpha", ""),
    ]);
    sources.project_template_metadata = Some(vec![template("project", "Duplicate", "project")]);

    let items = catalog::aggregate(&sources, &PluginRegistry::new());
    let names: Vec<&str> = items.iter().map(|item| item.tile_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Duplicate", "Duplicate", "Zeta"]);

    // Equal names keep source order: shared templates before project ones
    assert!(items[1].has_tag("shared"));
    assert!(items[2].has_tag("project"));
}

#[test]
fn test_sort_is_byte_wise() {
    let mut sources = loaded(None);
    sources.template_metadata = Some(vec![
        template("lower", "apache", ""),
        template("upper", "Zend", ""),
    ]);

    let items = catalog::aggregate(&sources, &PluginRegistry::new());
    assert_eq!(items[0].tile_name, "Zend");
    assert_eq!(items[1].tile_name, "apache");
}

#[test]
fn test_not_loaded_snapshot_is_empty() {
    let mut sources = loaded(Some("dev"));
    sources.loaded = false;
    sources.helm_charts = Some(nginx_charts());
    assert!(catalog::aggregate(&sources, &PluginRegistry::new()).is_empty());
}

#[test]
fn test_helm_tiles_sort_with_the_rest() {
    let mut sources = loaded(Some("dev"));
    sources.template_metadata = Some(vec![template("mysql", "MySQL", "database")]);
    sources.helm_charts = Some(nginx_charts());

    let items = catalog::aggregate(&sources, &PluginRegistry::new());
    let mysql = find(&items, "MySQL");
    assert_eq!(mysql.kind, CatalogKind::Template);
    assert_eq!(items.last().map(|i| i.tile_name.as_str()), Some("Nginx v2.0"));
}

#[test]
fn test_malformed_chart_does_not_hide_the_others() {
    let index: HelmIndex = serde_yaml::from_str(
        r#"
entries:
  broken: [just-a-string]
  nginx:
    - name: nginx
      version: 1.0
      urls: [https://charts.example.com/nginx-1.0.tgz]
"#,
    )
    .unwrap();

    let mut sources = loaded(Some("dev"));
    sources.helm_charts = Some(index.entries);
    let items = catalog::aggregate(&sources, &PluginRegistry::new());
    let names: Vec<&str> = items.iter().map(|item| item.tile_name.as_str()).collect();
    assert_eq!(names, vec!["Nginx v1.0"]);
}
