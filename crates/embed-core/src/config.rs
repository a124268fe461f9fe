//! Embed tool configuration
//!
//! The `services` map mixes two kinds of entries:
//!
//! * `"youtube": true` keeps a built-in service enabled. As soon as one entry
//!   is `true`, built-ins that are not listed as `true` are dropped.
//! * `"my-service": { "regex": ..., "embedUrl": ..., "html": ... }` adds a
//!   service, or overrides fields of the service with the same key.
//!
//! Entries are kept in the order they were written. Malformed entries are kept
//! as [`ServiceEntry::Invalid`] and skipped when the configuration is applied,
//! so a single bad custom service never prevents the rest from loading.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::service::ServiceDefinition;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// One entry of the `services` map
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEntry {
    /// Enable (`true`) or mention (`false`) a built-in service
    Enabled(bool),
    /// Custom service or override
    Definition(ServiceDefinition),
    /// Entry that could not be read as a definition
    Invalid(String),
}

/// Embed tool configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedConfig {
    /// Service entries, in configuration order
    pub services: Vec<(String, ServiceEntry)>,
}

impl EmbedConfig {
    /// Empty configuration: every built-in service, no custom ones
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_json_str(&contents)?;

        tracing::debug!(
            "Loaded embed config from {} with {} service entries",
            path.as_ref().display(),
            config.services.len()
        );

        Ok(config)
    }

    /// Add an enable entry for a built-in service
    pub fn enable(self, key: impl Into<String>) -> Self {
        self.entry(key, ServiceEntry::Enabled(true))
    }

    /// Add a `false` entry for a built-in service
    ///
    /// This has no effect unless some other service is enabled, in which case
    /// the service is filtered out either way.
    pub fn disable(self, key: impl Into<String>) -> Self {
        self.entry(key, ServiceEntry::Enabled(false))
    }

    /// Add a custom service or override
    pub fn service(self, key: impl Into<String>, definition: ServiceDefinition) -> Self {
        self.entry(key, ServiceEntry::Definition(definition))
    }

    /// Set an entry, replacing an earlier one with the same key in place
    pub fn entry(mut self, key: impl Into<String>, entry: ServiceEntry) -> Self {
        let key = key.into();
        match self.services.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => *existing = entry,
            None => self.services.push((key, entry)),
        }
        self
    }

    /// Keys of the `true` entries
    pub fn enabled_keys(&self) -> impl Iterator<Item = &str> {
        self.services.iter().filter_map(|(key, entry)| match entry {
            ServiceEntry::Enabled(true) => Some(key.as_str()),
            _ => None,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct RawConfig {
    #[serde(default)]
    services: serde_json::Map<String, serde_json::Value>,
}

impl From<serde_json::Value> for ServiceEntry {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(enabled) => ServiceEntry::Enabled(enabled),
            value @ serde_json::Value::Object(_) => {
                match serde_json::from_value::<ServiceDefinition>(value) {
                    Ok(definition) => ServiceEntry::Definition(definition),
                    Err(e) => ServiceEntry::Invalid(e.to_string()),
                }
            }
            other => ServiceEntry::Invalid(format!("expected boolean or object, got {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for EmbedConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;
        Ok(Self {
            services: raw
                .services
                .into_iter()
                .map(|(key, value)| (key, ServiceEntry::from(value)))
                .collect(),
        })
    }
}

impl Serialize for EmbedConfig {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut services = serde_json::Map::new();
        for (key, entry) in &self.services {
            let value = match entry {
                ServiceEntry::Enabled(enabled) => serde_json::Value::Bool(*enabled),
                ServiceEntry::Definition(definition) => {
                    serde_json::to_value(definition).map_err(serde::ser::Error::custom)?
                }
                ServiceEntry::Invalid(_) => continue,
            };
            services.insert(key.clone(), value);
        }
        RawConfig { services }.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::IdStrategy;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config() {
        let config = EmbedConfig::from_json_str("{}").unwrap();
        assert!(config.services.is_empty());
        assert_eq!(config, EmbedConfig::new());
    }

    #[test]
    fn test_entries_keep_order() {
        let config = EmbedConfig::from_json_str(
            r#"{"services":{"youtube":true,"coub":false,"vimeo":true}}"#,
        )
        .unwrap();

        let keys: Vec<_> = config.services.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["youtube", "coub", "vimeo"]);
        assert_eq!(config.enabled_keys().collect::<Vec<_>>(), ["youtube", "vimeo"]);
    }

    #[test]
    fn test_definition_entries() {
        let config = EmbedConfig::from_json_str(
            r#"{"services":{
                "custom":{"regex":"https://c\\.io/(\\w+)","embedUrl":"https://c.io/e/<%= remote_id %>","html":"<iframe>","id":"first"},
                "broken":{"regex":"x","width":"wide"},
                "odd":42
            }}"#,
        )
        .unwrap();

        assert_eq!(config.services.len(), 3);
        match &config.services[0].1 {
            ServiceEntry::Definition(definition) => {
                assert_eq!(definition.id, Some(IdStrategy::First));
            }
            other => panic!("unexpected entry {other:?}"),
        }
        assert!(matches!(config.services[1].1, ServiceEntry::Invalid(_)));
        assert!(matches!(config.services[2].1, ServiceEntry::Invalid(_)));
    }

    #[test]
    fn test_builder_replaces_in_place() {
        let config = EmbedConfig::new().enable("youtube").enable("vimeo").disable("youtube");
        assert_eq!(config.services[0], ("youtube".to_string(), ServiceEntry::Enabled(false)));
        assert_eq!(config.enabled_keys().collect::<Vec<_>>(), ["vimeo"]);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = EmbedConfig::new().enable("coub").service(
            "custom",
            ServiceDefinition::new("https://c\\.io/(\\w+)", "<%= remote_id %>", "<iframe>")
                .with_size(300, 200),
        );

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EmbedConfig::from_json_str(&json).unwrap(), config);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("embed.json");
        tokio::fs::write(&path, r#"{"services":{"codepen":true}}"#).await.unwrap();

        let config = EmbedConfig::load(&path).await.unwrap();
        assert_eq!(config.enabled_keys().collect::<Vec<_>>(), ["codepen"]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = EmbedConfig::load(temp_dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_rejects_non_object_config() {
        assert!(matches!(
            EmbedConfig::from_json_str("[1, 2]"),
            Err(ConfigError::Serialization(_))
        ));
    }
}
