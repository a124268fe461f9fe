//! Service resolution for embed blocks
//!
//! This crate recognizes which media service a pasted URL belongs to, extracts
//! the resource identifier and renders the embed URL. It never fetches the
//! URL; every service is declared ahead of time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod resolver;
pub mod service;
pub mod services;

pub use config::{ConfigError, EmbedConfig, ServiceEntry};
pub use embed::{render_embed_url, Dimension, EmbedData, EmbedDataUpdate, REMOTE_ID_PLACEHOLDER};
pub use error::{EmbedError, Result};
pub use extract::{ExtractId, IdStrategy};
pub use matcher::PatternIndex;
pub use resolver::{prepare, ActiveServices};
pub use service::{ServiceConfig, ServiceDefinition};
pub use services::{builtin_keys, builtin_services};
pub use regex::Regex;
