//! Embed block state
//!
//! The [`ServiceRegistry`] holds the service set prepared from the editor's
//! configuration; every [`EmbedBlock`] resolves pasted URLs through it and
//! owns its own [`EmbedData`](embed_core::EmbedData).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod error;
pub mod registry;

pub use block::{EmbedBlock, PasteEvent};
pub use error::{EmbedToolError, Result};
pub use registry::{PasteConfig, RegistryStatus, ServiceRegistry};
