//! Catalog model layer
//!
//! Structure:
//! - `catalog_kind.rs` - Tile source kinds
//! - `item.rs` - The normalized tile view model
//! - `resources.rs` - Typed views over raw cluster resources
//! - `helm.rs` - Chart repository index and chart bundle types
//! - `quota.rs` - ResourceQuota / ClusterResourceQuota views
//! - `lenient.rs` - Tolerant field deserializers shared by the views

pub mod catalog_kind;
pub mod helm;
pub mod item;
pub mod lenient;
pub mod quota;
pub mod resources;

pub use catalog_kind::CatalogKind;
pub use helm::{ChartBundle, ChartFile, ChartReadme, HelmChartEntries, HelmChartEntry, HelmIndex};
pub use item::{DEFAULT_ICON_CLASS, Item, PLACEHOLDER_IMAGE_URL, PropertyItem, TileVisual};
pub use quota::Quota;
