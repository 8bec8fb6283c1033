// File: src/config.rs
// Purpose: Router configuration parsing from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RouterError;

/// Router configuration
///
/// ```toml
/// case_sensitive = false
/// max_redirects = 8
///
/// [[redirects]]
/// from = "/"
/// to = "/home"
///
/// [[redirects]]
/// from = "/old/{id}"
/// to = "/items/{id}"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Default case sensitivity of routes registered with `handle`
    #[serde(default = "default_false")]
    pub case_sensitive: bool,

    /// Redirect routes followed within a single navigation event
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Declarative redirect routes, registered in order
    #[serde(default)]
    pub redirects: Vec<RedirectRule>,
}

/// One redirect route
///
/// `to` may reference placeholders captured by `from` as `{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,

    /// Overrides the router default
    #[serde(default)]
    pub case_sensitive: Option<bool>,
}

fn default_false() -> bool {
    false
}

fn default_max_redirects() -> usize {
    8
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            case_sensitive: default_false(),
            max_redirects: default_max_redirects(),
            redirects: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), redirects = config.redirects.len(), "Loaded router config");
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, RouterError> {
        toml::from_str(content).map_err(|e| RouterError::Config(e.to_string()))
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert!(!config.case_sensitive);
        assert_eq!(config.max_redirects, 8);
        assert!(config.redirects.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let config = RouterConfig::from_toml_str(
            r#"
            case_sensitive = true

            [[redirects]]
            from = "/"
            to = "/home"

            [[redirects]]
            from = "/old/{id}"
            to = "/items/{id}"
            case_sensitive = false
            "#,
        )
        .unwrap();

        assert!(config.case_sensitive);
        assert_eq!(config.max_redirects, 8);
        assert_eq!(
            config.redirects,
            vec![
                RedirectRule {
                    from: "/".to_string(),
                    to: "/home".to_string(),
                    case_sensitive: None,
                },
                RedirectRule {
                    from: "/old/{id}".to_string(),
                    to: "/items/{id}".to_string(),
                    case_sensitive: Some(false),
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(RouterConfig::from_toml_str("").unwrap(), RouterConfig::default());
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = RouterConfig::from_toml_str("max_redirects = \"many\"").unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = RouterConfig::load_or_default("/nonexistent/hashmux.toml").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_missing_file_errors() {
        let err = RouterConfig::from_file("/nonexistent/hashmux.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
