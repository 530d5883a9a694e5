//! Configuration I/O (YAML loading)

use super::error::{ConfigError, ConfigResult};
use super::namespace_config::NamespaceConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Schema versions this crate can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// namespaces:
///   - name: scores
///     capacity_bytes: 1024
///   - name: thumbnails
///     capacity_bytes: 67108864
///     ttl_secs: 600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(default)]
    pub namespaces: Vec<NamespaceConfig>,
}

/// Raw form used to report a missing `version` distinctly from other errors
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigFile {
    version: Option<u32>,
    #[serde(default)]
    namespaces: Vec<NamespaceConfig>,
}

impl CacheConfigFileV1 {
    pub fn new(namespaces: Vec<NamespaceConfig>) -> Self {
        Self {
            version: 1,
            namespaces,
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let raw: RawConfigFile = serde_yaml::from_str(yaml)?;
        let version = raw.version.ok_or(ConfigError::MissingVersion)?;

        let file = Self {
            version,
            namespaces: raw.namespaces,
        };
        file.validate()?;
        Ok(file)
    }

    /// Read, parse and validate a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut seen = HashSet::new();
        for ns in &self.namespaces {
            ns.validate()?;
            if !seen.insert(ns.name.as_str()) {
                return Err(ConfigError::DuplicateNamespace(ns.name.clone()));
            }
        }

        Ok(())
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceConfig> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }
}
