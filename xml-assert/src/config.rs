use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Settings shared by every assertion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssertConfig {
    /// Wrapper element used by partial-document assertions.
    pub default_partial_tag: String,
    /// Prefix the default namespace is exposed under in XPath expressions.
    pub default_ns_prefix: String,
    /// Colorize terminal output.
    pub color: bool,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            default_partial_tag: "partialTest".to_string(),
            default_ns_prefix: "ns".to_string(),
            color: true,
        }
    }
}

/// Errors returned when loading config files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load assertion settings from a TOML file. Missing keys keep their
/// defaults.
pub fn load_config(path: &Path) -> Result<AssertConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_config(&raw, path.display().to_string())
}

/// Settings shipped with the crate.
pub fn embedded_config() -> AssertConfig {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));
    parse_config(embedded, "embedded config".to_string()).unwrap_or_default()
}

fn parse_config(raw: &str, path: String) -> Result<AssertConfig, ConfigLoadError> {
    toml::from_str(raw).map_err(|source| ConfigLoadError::Parse { path, source })
}
