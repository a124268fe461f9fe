//! Active service set
//!
//! [`prepare`] folds an [`EmbedConfig`] into the built-in catalog and produces
//! the [`ActiveServices`] every embed block resolves URLs against.

use std::collections::HashSet;

use crate::config::{EmbedConfig, ServiceEntry};
use crate::embed::{render_embed_url, EmbedData};
use crate::error::{EmbedError, Result};
use crate::extract::ExtractId;
use crate::matcher::PatternIndex;
use crate::service::ServiceConfig;
use crate::services::builtin_services;

/// Build the active service set for `config`
///
/// 1. If any entry is `true`, only the built-ins listed as `true` are kept.
/// 2. Definition entries are validated; invalid ones are dropped with a
///    warning.
/// 3. Valid definitions are appended. A definition whose key is already
///    active overwrites that service's fields in place.
///
/// # Example
///
/// ```
/// use embed_core::config::EmbedConfig;
/// use embed_core::resolver::prepare;
///
/// let services = prepare(&EmbedConfig::new().enable("vimeo"));
/// let data = services.resolve("vimeo", "https://vimeo.com/289836809").unwrap();
/// assert_eq!(data.embed, "https://player.vimeo.com/video/289836809?title=0&byline=0");
/// ```
pub fn prepare(config: &EmbedConfig) -> ActiveServices {
    let enabled: HashSet<&str> = config.enabled_keys().collect();

    let mut services: Vec<(String, ServiceConfig)> = builtin_services()
        .iter()
        .filter(|(key, _)| enabled.is_empty() || enabled.contains(key))
        .map(|(key, service)| (key.to_string(), service.clone()))
        .collect();

    if !enabled.is_empty() {
        tracing::debug!("Enable filter kept {} built-in services", services.len());
    }

    for (key, entry) in &config.services {
        let definition = match entry {
            ServiceEntry::Enabled(_) => continue,
            ServiceEntry::Invalid(reason) => {
                tracing::warn!("Dropping service `{}`: {}", key, reason);
                continue;
            }
            ServiceEntry::Definition(definition) => definition,
        };

        let service = match definition.validate(key) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!("Dropping service: {}", e);
                continue;
            }
        };

        match services.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, existing)) => {
                tracing::debug!("Overriding service `{}`", key);
                existing.merge(service);
            }
            None => {
                tracing::debug!("Adding service `{}`", key);
                services.push((key.clone(), service));
            }
        }
    }

    ActiveServices::new(services)
}

/// Services available to embed blocks, with their pattern index
///
/// Only [`prepare`] builds one, so an instance always reflects a
/// configuration.
///
/// ```compile_fail
/// let services = embed_core::ActiveServices::default();
/// ```
#[derive(Debug, Clone)]
pub struct ActiveServices {
    services: Vec<(String, ServiceConfig)>,
    patterns: PatternIndex,
}

impl ActiveServices {
    fn new(services: Vec<(String, ServiceConfig)>) -> Self {
        let patterns = PatternIndex::new(
            services
                .iter()
                .map(|(key, service)| (key.clone(), service.regex.clone()))
                .collect(),
        );

        Self { services, patterns }
    }

    /// Service registered under `key`
    pub fn get(&self, key: &str) -> Option<&ServiceConfig> {
        self.services
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, service)| service)
    }

    /// Whether `key` is active
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over services in precedence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceConfig)> {
        self.services.iter().map(|(key, service)| (key.as_str(), service))
    }

    /// Active service keys in precedence order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|(key, _)| key.as_str())
    }

    /// Number of active services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no service is active
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Pattern index for the host's paste routing
    pub fn patterns(&self) -> &PatternIndex {
        &self.patterns
    }

    /// Resolve `url` through the service registered as `key`
    ///
    /// The pattern is checked again even if the caller already matched it, so
    /// a stale pattern index yields [`EmbedError::NoMatch`] rather than an
    /// embed URL built from an empty identifier.
    pub fn resolve(&self, key: &str, url: &str) -> Result<EmbedData> {
        let service = self
            .get(key)
            .ok_or_else(|| EmbedError::UnknownService(key.to_string()))?;

        let groups = service.captures(url).ok_or_else(|| EmbedError::NoMatch {
            service: key.to_string(),
            url: url.to_string(),
        })?;

        let id = service.strategy().extract(&groups);
        let embed = render_embed_url(&service.embed_url, &id);

        tracing::debug!("Resolved {} via `{}` to {}", url, key, embed);

        Ok(EmbedData {
            service: key.to_string(),
            source: url.to_string(),
            embed,
            width: service.width.clone(),
            height: service.height.clone(),
            caption: String::new(),
        })
    }

    /// Find the service for `url` and resolve it
    ///
    /// Returns `None` when no active pattern matches.
    pub fn resolve_url(&self, url: &str) -> Option<Result<EmbedData>> {
        let key = self.patterns.find_service(url)?;
        Some(self.resolve(key, url))
    }
}
