//! Embed block instance

use embed_core::{EmbedData, EmbedDataUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EmbedToolError, Result};
use crate::registry::ServiceRegistry;

/// Paste notification routed to a block by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteEvent {
    /// Key of the service whose pattern matched
    pub key: String,
    /// Pasted URL
    pub data: String,
}

impl PasteEvent {
    /// Create a paste event
    pub fn new(key: impl Into<String>, data: impl Into<String>) -> Self {
        Self { key: key.into(), data: data.into() }
    }
}

/// One embed block
#[derive(Debug, Clone)]
pub struct EmbedBlock {
    registry: ServiceRegistry,
    data: EmbedData,
    read_only: bool,
}

impl EmbedBlock {
    /// Create an empty block
    pub fn new(registry: ServiceRegistry, read_only: bool) -> Self {
        Self { registry, data: EmbedData::default(), read_only }
    }

    /// Create a block from persisted data
    pub fn with_data(registry: ServiceRegistry, data: Value, read_only: bool) -> Result<Self> {
        let mut block = Self::new(registry, read_only);
        block.set_data(data)?;
        Ok(block)
    }

    /// Whether blocks can be rendered read-only
    pub const fn is_read_only_supported() -> bool {
        true
    }

    /// Whether this block is read-only
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Current state
    pub fn data(&self) -> &EmbedData {
        &self.data
    }

    /// Fold host-provided data into the block
    ///
    /// `data` must be a JSON object; non-empty fields replace the current
    /// ones.
    pub fn set_data(&mut self, data: Value) -> Result<()> {
        if !data.is_object() {
            return Err(EmbedToolError::MalformedData(format!("got {data}")));
        }

        let update: EmbedDataUpdate = serde_json::from_value(data)
            .map_err(|e| EmbedToolError::MalformedData(e.to_string()))?;
        self.data.merge(update);

        Ok(())
    }

    /// Replace the caption
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.data.caption = caption.into();
    }

    /// Resolve a pasted URL and bind the block to it
    ///
    /// Width and height already set on the block are kept over the service
    /// defaults, and the caption is untouched. On error the block is left
    /// unchanged.
    pub fn on_paste(&mut self, event: PasteEvent) -> Result<&EmbedData> {
        let resolved = self.registry.resolve(&event.key, &event.data)?;

        self.data.service = resolved.service;
        self.data.source = resolved.source;
        self.data.embed = resolved.embed;
        self.data.width = self.data.width.take().or(resolved.width);
        self.data.height = self.data.height.take().or(resolved.height);

        Ok(&self.data)
    }

    /// Frame markup of the block's service
    ///
    /// `None` while the block is empty.
    pub fn frame_html(&self) -> Result<Option<String>> {
        if self.data.is_empty() {
            return Ok(None);
        }

        let services = self.registry.services()?;
        let service = services.get(&self.data.service).ok_or_else(|| {
            EmbedToolError::Embed(embed_core::EmbedError::UnknownService(self.data.service.clone()))
        })?;

        Ok(Some(service.html.clone()))
    }

    /// State to persist
    pub fn save(&self) -> EmbedData {
        self.data.clone()
    }
}
