//! Catalog tile view model
//!
//! `Item` is the single shape every catalog source is normalized into.

use super::catalog_kind::CatalogKind;
use super::helm::ChartReadme;
use serde::Serialize;
use serde_json::Value;

/// Image URL that brokers ship as a placeholder; never displayed
pub const PLACEHOLDER_IMAGE_URL: &str = "example.com/example.gif";

/// Icon class used when a source declares neither an image nor an icon
pub const DEFAULT_ICON_CLASS: &str = "fa fa-clone";

/// Visual identifier of a tile: an image, or an icon font class
///
/// Serializes as exactly one of `tileImgUrl` / `tileIconClass`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TileVisual {
    #[serde(rename = "tileImgUrl")]
    ImageUrl(String),
    #[serde(rename = "tileIconClass")]
    IconClass(String),
}

impl TileVisual {
    /// Resolve an image/icon pair; a usable image URL wins
    ///
    /// Empty strings and the placeholder image count as absent. Without either
    /// input the default catalog icon is used.
    pub fn resolve(image_url: Option<String>, icon_class: Option<String>) -> Self {
        match image_url.filter(|url| is_displayable_image(url)) {
            Some(url) => TileVisual::ImageUrl(url),
            None => TileVisual::IconClass(
                icon_class
                    .filter(|class| !class.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ICON_CLASS.to_string()),
            ),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            TileVisual::ImageUrl(url) => Some(url),
            TileVisual::IconClass(_) => None,
        }
    }

    pub fn icon_class(&self) -> Option<&str> {
        match self {
            TileVisual::IconClass(class) => Some(class),
            TileVisual::ImageUrl(_) => None,
        }
    }
}

fn is_displayable_image(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && url != PLACEHOLDER_IMAGE_URL
}

/// Labeled value shown in a tile's details pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyItem {
    pub label: String,
    pub value: String,
}

impl PropertyItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Normalized catalog tile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub kind: CatalogKind,
    pub tile_name: String,
    #[serde(flatten)]
    pub visual: TileVisual,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_provider: Option<String>,
    pub tags: Vec<String>,
    pub create_label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_description: Option<ChartReadme>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_properties: Vec<PropertyItem>,
    /// Source resource (or synthesized wrapper)
    pub obj: Value,
}

impl Item {
    /// Create an item with all optional fields unset
    pub fn new(
        kind: CatalogKind,
        tile_name: impl Into<String>,
        visual: TileVisual,
        create_label: impl Into<String>,
        href: impl Into<String>,
        obj: Value,
    ) -> Self {
        Self {
            kind,
            tile_name: tile_name.into(),
            visual,
            tile_description: None,
            tile_provider: None,
            tags: Vec::new(),
            create_label: create_label.into(),
            href: href.into(),
            support_url: None,
            documentation_url: None,
            long_description: None,
            sample_repo: None,
            markdown_description: None,
            custom_properties: Vec::new(),
            obj,
        }
    }

    pub fn tile_img_url(&self) -> Option<&str> {
        self.visual.image_url()
    }

    pub fn tile_icon_class(&self) -> Option<&str> {
        self.visual.icon_class()
    }

    /// Case-insensitive tag membership, as used by catalog filters
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Uid of the source object, used as a stable list key
    pub fn uid(&self) -> Option<&str> {
        self.obj
            .get("metadata")
            .and_then(|m| m.get("uid"))
            .and_then(Value::as_str)
    }
}
