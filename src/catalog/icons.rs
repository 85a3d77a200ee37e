//! Tile icon and image resolution
//!
//! Sources name icons by font class (`icon-java`, `fa fa-database`). Classes
//! with a bundled logo are shown as images instead.

use crate::models::resources::{ExternalMetadata, ICON_CLASS_ANNOTATION, ResourceMeta, SpecTag};
use crate::models::TileVisual;

/// Icon class of the Helm logo
pub const HELM_ICON_CLASS: &str = "icon-helm";

/// Bundled logos keyed by icon class
const LOGOS: &[(&str, &str)] = &[
    ("icon-3scale", "static/assets/3scale.svg"),
    ("icon-aerogear", "static/assets/aerogear.svg"),
    ("icon-amq", "static/assets/amq.svg"),
    ("icon-angularjs", "static/assets/angularjs.svg"),
    ("icon-ansible", "static/assets/ansible.svg"),
    ("icon-apache", "static/assets/apache.svg"),
    ("icon-beaker", "static/assets/beaker.svg"),
    ("icon-capedwarf", "static/assets/capedwarf.svg"),
    ("icon-cassandra", "static/assets/cassandra.svg"),
    ("icon-clojure", "static/assets/clojure.svg"),
    ("icon-codeigniter", "static/assets/codeigniter.svg"),
    ("icon-cordova", "static/assets/cordova.png"),
    ("icon-datagrid", "static/assets/datagrid.svg"),
    ("icon-datavirt", "static/assets/datavirt.svg"),
    ("icon-django", "static/assets/django.svg"),
    ("icon-dotnet", "static/assets/dotnet.svg"),
    ("icon-drupal", "static/assets/drupal.svg"),
    ("icon-eap", "static/assets/eap.svg"),
    ("icon-elastic", "static/assets/elastic.svg"),
    ("icon-erlang", "static/assets/erlang.svg"),
    ("icon-go-gopher", "static/assets/go-gopher.svg"),
    ("icon-golang", "static/assets/golang.svg"),
    ("icon-grails", "static/assets/grails.svg"),
    ("icon-helm", "static/assets/helm.svg"),
    ("icon-jboss", "static/assets/jboss.svg"),
    ("icon-jenkins", "static/assets/jenkins.svg"),
    ("icon-jruby", "static/assets/jruby.svg"),
    ("icon-js", "static/assets/js.svg"),
    ("icon-laravel", "static/assets/laravel.svg"),
    ("icon-mariadb", "static/assets/mariadb.svg"),
    ("icon-mongodb", "static/assets/mongodb.svg"),
    ("icon-mysql-database", "static/assets/mysql-database.svg"),
    ("icon-nginx", "static/assets/nginx.svg"),
    ("icon-nodejs", "static/assets/nodejs.svg"),
    ("icon-openjdk", "static/assets/openjdk.svg"),
    ("icon-openshift", "static/assets/openshift.svg"),
    ("icon-perl", "static/assets/perl.svg"),
    ("icon-php", "static/assets/php.svg"),
    ("icon-postgresql", "static/assets/postgresql.svg"),
    ("icon-python", "static/assets/python.svg"),
    ("icon-rails", "static/assets/rails.svg"),
    ("icon-redis", "static/assets/redis.svg"),
    ("icon-rh-integration", "static/assets/rh-integration.svg"),
    ("icon-rh-tomcat", "static/assets/rh-tomcat.svg"),
    ("icon-ruby", "static/assets/ruby.svg"),
    ("icon-scala", "static/assets/scala.svg"),
    ("icon-spring", "static/assets/spring.svg"),
    ("icon-sso", "static/assets/sso.svg"),
    ("icon-tomcat", "static/assets/tomcat.svg"),
    ("icon-wildfly", "static/assets/wildfly.svg"),
];

/// Bundled logo for an icon class, if any
pub fn image_for_icon_class(icon_class: &str) -> Option<&'static str> {
    LOGOS
        .iter()
        .find(|(class, _)| *class == icon_class)
        .map(|(_, path)| *path)
}

/// Font classes declared as `icon-*` live in the `font-icon` family
pub fn normalize_icon_class(icon_class: &str) -> String {
    if icon_class.starts_with("icon-") {
        format!("font-icon {}", icon_class)
    } else {
        icon_class.to_string()
    }
}

/// Resolve a raw icon class: bundled logo first, then the normalized class
pub fn visual_for_icon_class(icon_class: Option<&str>) -> TileVisual {
    let image = icon_class.and_then(image_for_icon_class).map(str::to_string);
    TileVisual::resolve(image, icon_class.map(normalize_icon_class))
}

/// Raw icon class declared in service class external metadata
pub fn service_class_icon(metadata: &ExternalMetadata) -> Option<&str> {
    metadata.icon_class.as_deref().filter(|s| !s.is_empty())
}

/// Image for a service class: explicit image URL, else the icon class logo
pub fn service_class_image(metadata: &ExternalMetadata) -> Option<String> {
    metadata
        .image_url
        .clone()
        .filter(|url| !url.is_empty())
        .or_else(|| {
            service_class_icon(metadata)
                .and_then(image_for_icon_class)
                .map(str::to_string)
        })
}

/// Service class visual
///
/// A placeholder image falls back to the class-derived icon, never to nothing.
pub fn service_class_visual(metadata: &ExternalMetadata) -> TileVisual {
    TileVisual::resolve(
        service_class_image(metadata),
        service_class_icon(metadata).map(normalize_icon_class),
    )
}

pub fn template_icon(metadata: &ResourceMeta) -> Option<&str> {
    metadata.annotation(ICON_CLASS_ANNOTATION)
}

pub fn image_stream_icon(tag: Option<&SpecTag>) -> Option<&str> {
    tag.and_then(|t| t.annotation(ICON_CLASS_ANNOTATION))
}
