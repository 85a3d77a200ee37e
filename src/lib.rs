//! Developer catalog library
//!
//! Normalizes service classes, templates, image streams, Helm charts and
//! plugin-contributed resources into one sorted list of catalog tiles, and
//! computes resource quota usage. Used by the `devcatalog` binary and by the
//! integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod flags;
pub mod kube;
pub mod models;
pub mod plugins;
pub mod quota;

// Re-export commonly used types for convenience
pub use catalog::{CatalogError, CatalogSources, CatalogState, aggregate};
pub use flags::FeatureFlags;
pub use models::{CatalogKind, Item, Quota, TileVisual};
pub use plugins::{CatalogNormalizer, DevCatalogModel, PluginRegistry};
