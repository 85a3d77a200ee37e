//! Default configuration values

use super::schema::Config;

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert!(config.helm.enabled);
        assert_eq!(config.default_namespace, None);
        assert_eq!(config.catalog.shared_namespace, "openshift");
    }
}
