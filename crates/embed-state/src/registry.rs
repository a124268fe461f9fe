//! Shared service registry
//!
//! One registry is created per editor instance and handed to every embed
//! block. `prepare` builds the new service set completely before swapping it
//! in, so readers see either the previous set or the new one, never a
//! half-merged state.

use embed_core::{prepare, ActiveServices, EmbedConfig, EmbedData, PatternIndex};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{EmbedToolError, Result};

/// Paste handling configuration exported to the host editor
#[derive(Debug, Clone)]
pub struct PasteConfig {
    /// Patterns the host matches pasted URLs against
    pub patterns: PatternIndex,
}

/// Summary of a prepared registry, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStatus {
    /// Whether `prepare` has run
    pub configured: bool,
    /// Active service keys in precedence order
    pub services: Vec<String>,
}

/// Handle to the active service set
///
/// Cloning the handle shares the underlying state.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    active: Arc<RwLock<Option<Arc<ActiveServices>>>>,
}

impl ServiceRegistry {
    /// Create an unconfigured registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and prepare it with `config`
    pub fn with_config(config: &EmbedConfig) -> Self {
        let registry = Self::new();
        registry.prepare(config);
        registry
    }

    /// Replace the active service set with one built from `config`
    pub fn prepare(&self, config: &EmbedConfig) -> Arc<ActiveServices> {
        let services = Arc::new(prepare(config));
        *self.active.write() = Some(Arc::clone(&services));

        tracing::debug!("Prepared {} embed services", services.len());

        services
    }

    /// Whether `prepare` has run
    pub fn is_configured(&self) -> bool {
        self.active.read().is_some()
    }

    /// Current service set
    pub fn services(&self) -> Result<Arc<ActiveServices>> {
        self.active.read().clone().ok_or(EmbedToolError::NotConfigured)
    }

    /// Current pattern index
    pub fn patterns(&self) -> Result<PatternIndex> {
        Ok(self.services()?.patterns().clone())
    }

    /// Paste configuration for the host editor
    pub fn paste_config(&self) -> Result<PasteConfig> {
        Ok(PasteConfig { patterns: self.patterns()? })
    }

    /// Resolve `url` through the service registered as `key`
    pub fn resolve(&self, key: &str, url: &str) -> Result<EmbedData> {
        Ok(self.services()?.resolve(key, url)?)
    }

    /// Current state summary
    pub fn status(&self) -> RegistryStatus {
        match self.active.read().as_ref() {
            Some(services) => RegistryStatus {
                configured: true,
                services: services.keys().map(str::to_string).collect(),
            },
            None => RegistryStatus { configured: false, services: Vec::new() },
        }
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("configured", &self.is_configured())
            .finish()
    }
}
