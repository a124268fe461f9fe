//! Errors produced while resolving embeds

use thiserror::Error;

/// Errors that can occur during embed resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// A service definition failed validation
    #[error("Invalid service definition `{key}`: {reason}")]
    InvalidService {
        /// Service key the definition was registered under
        key: String,
        /// Why the definition was rejected
        reason: String,
    },

    /// The requested service is not active
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// The service pattern does not match the URL
    #[error("URL {url} does not match service `{service}`")]
    NoMatch {
        /// Service key
        service: String,
        /// Rejected URL
        url: String,
    },
}

impl EmbedError {
    pub(crate) fn invalid_service(key: &str, reason: impl Into<String>) -> Self {
        EmbedError::InvalidService { key: key.to_string(), reason: reason.into() }
    }
}

/// Result type for embed operations
pub type Result<T> = std::result::Result<T, EmbedError>;
