//! Plugin manifest validation
//!
//! Validates plugin YAML files and provides helpful error messages for common issues.

use super::field_path;
use super::manifest::{CatalogPluginManifest, FieldMapping, ModelRef};
use super::{PluginError, PluginResult};

/// Placeholders recognized in plugin href templates
pub const HREF_PLACEHOLDERS: &[&str] = &["{name}", "{namespace}", "{preselectedNamespace}"];

/// Plugin manifest validator
pub struct PluginValidator;

impl PluginValidator {
    /// Validate a plugin manifest
    pub fn validate(manifest: &CatalogPluginManifest) -> PluginResult<()> {
        Self::validate_name(&manifest.name)?;
        Self::validate_version(&manifest.version)?;
        Self::validate_model(&manifest.model)?;
        Self::validate_href(&manifest.href)?;
        Self::validate_fields(&manifest.fields)?;

        if manifest.create_label.trim().is_empty() {
            return Err(PluginError::ValidationError(
                "create_label cannot be empty".to_string(),
            ));
        }
        if let Some(flag) = &manifest.flag {
            Self::validate_flag(flag)?;
        }
        Ok(())
    }

    /// Validate plugin name
    fn validate_name(name: &str) -> PluginResult<()> {
        if name.is_empty() {
            return Err(PluginError::ValidationError(
                "Plugin name cannot be empty".to_string(),
            ));
        }

        // Name should be alphanumeric with hyphens/underscores
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PluginError::ValidationError(format!(
                "Plugin name '{}' contains invalid characters. Use only alphanumeric, hyphens, and underscores",
                name
            )));
        }

        Ok(())
    }

    fn validate_version(version: &str) -> PluginResult<()> {
        if version.is_empty() {
            return Err(PluginError::ValidationError(
                "Plugin version cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The group may be empty (core API); everything else is required
    fn validate_model(model: &ModelRef) -> PluginResult<()> {
        Self::require_field(&model.version, "model.version")?;
        Self::require_field(&model.kind, "model.kind")?;
        Self::require_field(&model.plural, "model.plural")?;

        if model.reference().contains(char::is_whitespace) {
            return Err(PluginError::ValidationError(format!(
                "Model reference '{}' cannot contain whitespace",
                model.reference()
            )));
        }
        if model.plural.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PluginError::ValidationError(format!(
                "model.plural '{}' must be lowercase",
                model.plural
            )));
        }
        Ok(())
    }

    /// Hrefs are console paths; unknown placeholders are rejected
    fn validate_href(href: &str) -> PluginResult<()> {
        if !href.starts_with('/') {
            return Err(PluginError::ValidationError(format!(
                "href '{}' must be a console path starting with '/'",
                href
            )));
        }

        let mut rest = href;
        while let Some(start) = rest.find('{') {
            let end = rest[start..].find('}').ok_or_else(|| {
                PluginError::ValidationError(format!("Unclosed placeholder in href '{}'", href))
            })?;
            let placeholder = &rest[start..start + end + 1];
            if !HREF_PLACEHOLDERS.contains(&placeholder) {
                return Err(PluginError::ValidationError(format!(
                    "Unknown placeholder {} in href. Supported: {}",
                    placeholder,
                    HREF_PLACEHOLDERS.join(", ")
                )));
            }
            rest = &rest[start + end + 1..];
        }
        Ok(())
    }

    fn validate_fields(fields: &FieldMapping) -> PluginResult<()> {
        for (field, path) in fields.paths() {
            if path.trim().is_empty() || field_path::parse_path(path).is_none() {
                return Err(PluginError::ValidationError(format!(
                    "Invalid path '{}' for field '{}'. Expected format: '.spec.field[0]'",
                    path, field
                )));
            }
        }
        Ok(())
    }

    fn validate_flag(flag: &str) -> PluginResult<()> {
        if flag.is_empty() || !flag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PluginError::ValidationError(format!(
                "Invalid flag '{}'. Use uppercase letters, digits and underscores",
                flag
            )));
        }
        Ok(())
    }

    fn require_field(value: &str, field_name: &str) -> PluginResult<()> {
        if value.trim().is_empty() {
            return Err(PluginError::ValidationError(format!(
                "Field '{}' is required",
                field_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> CatalogPluginManifest {
        CatalogPluginManifest {
            name: "operators".to_string(),
            version: "1.0.0".to_string(),
            enabled: true,
            description: None,
            model: ModelRef {
                group: "operators.coreos.com".to_string(),
                version: "v1alpha1".to_string(),
                kind: "ClusterServiceVersion".to_string(),
                plural: "clusterserviceversions".to_string(),
                namespaced: true,
            },
            flag: None,
            create_label: "Create".to_string(),
            href: "/k8s/ns/{preselectedNamespace}/csv/{name}".to_string(),
            fields: FieldMapping::default(),
        }
    }

    #[test]
    fn test_valid_manifest() {
        assert!(PluginValidator::validate(&manifest()).is_ok());
    }

    #[test]
    fn test_invalid_name() {
        let mut m = manifest();
        m.name = "bad name!".to_string();
        assert!(PluginValidator::validate(&m).is_err());
    }

    #[test]
    fn test_missing_kind() {
        let mut m = manifest();
        m.model.kind = String::new();
        let err = PluginValidator::validate(&m).unwrap_err();
        assert!(err.to_string().contains("model.kind"));
    }

    #[test]
    fn test_core_group_allowed() {
        let mut m = manifest();
        m.model.group = String::new();
        assert!(PluginValidator::validate(&m).is_ok());
    }

    #[test]
    fn test_href_must_be_path() {
        let mut m = manifest();
        m.href = "https://elsewhere/".to_string();
        assert!(PluginValidator::validate(&m).is_err());
    }

    #[test]
    fn test_unknown_placeholder() {
        let mut m = manifest();
        m.href = "/k8s/{cluster}/x".to_string();
        let err = PluginValidator::validate(&m).unwrap_err();
        assert!(err.to_string().contains("{cluster}"));
    }

    #[test]
    fn test_bad_field_path() {
        let mut m = manifest();
        m.fields.tile_name = Some(".spec[name".to_string());
        assert!(PluginValidator::validate(&m).is_err());
    }

    #[test]
    fn test_bad_flag() {
        let mut m = manifest();
        m.flag = Some("not a flag".to_string());
        assert!(PluginValidator::validate(&m).is_err());
    }
}
