//! Embed tool errors

use embed_core::EmbedError;

/// Errors surfaced to the host editor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedToolError {
    /// Resolution error
    #[error("Embed error: {0}")]
    Embed(#[from] EmbedError),

    /// The registry was used before `prepare`
    #[error("Embed services are not configured")]
    NotConfigured,

    /// Block data is not an embed payload
    #[error("Embed Tool data should be object: {0}")]
    MalformedData(String),
}

/// Result type for embed tool operations
pub type Result<T> = std::result::Result<T, EmbedToolError>;
