//! Service definitions
//!
//! [`ServiceDefinition`] is the shape integrators write in configuration;
//! every field is optional so malformed entries can be reported instead of
//! failing the whole configuration. [`ServiceConfig`] is the validated form
//! used for matching and extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::embed::{render_embed_url, Dimension, REMOTE_ID_PLACEHOLDER};
use crate::error::{EmbedError, Result};
use crate::extract::{ExtractId, IdStrategy};

static DEFAULT_STRATEGY: IdStrategy = IdStrategy::First;

/// User-supplied service definition, before validation
///
/// # Example
///
/// ```
/// use embed_core::service::ServiceDefinition;
///
/// let definition = ServiceDefinition::new(
///     r"https://example\.com/v/(\w+)",
///     "https://example.com/embed/<%= remote_id %>",
///     "<iframe></iframe>",
/// )
/// .with_size(640, 360);
///
/// let service = definition.validate("example").unwrap();
/// assert_eq!(service.width.map(|width| width.as_f64()), Some(640.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    /// Pattern of source URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Embed URL template, with `<%= remote_id %>` marking the identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    /// Frame markup for the embedded content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Embedded content width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    /// Embedded content height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    /// Identifier extraction strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdStrategy>,
}

impl ServiceDefinition {
    /// Create a definition with the required fields set
    pub fn new(
        regex: impl Into<String>,
        embed_url: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            regex: Some(regex.into()),
            embed_url: Some(embed_url.into()),
            html: Some(html.into()),
            ..Default::default()
        }
    }

    /// Set the default display size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(Number::from(width));
        self.height = Some(Number::from(height));
        self
    }

    /// Set the identifier extraction strategy
    pub fn with_id(mut self, id: IdStrategy) -> Self {
        self.id = Some(id);
        self
    }

    /// Validate into a [`ServiceConfig`]
    ///
    /// Fails when the pattern is missing or does not compile, when the
    /// template or markup is missing or empty, or when a dimension is not a
    /// positive finite number.
    pub fn validate(&self, key: &str) -> Result<ServiceConfig> {
        let pattern = self
            .regex
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
            .ok_or_else(|| EmbedError::invalid_service(key, "missing regex"))?;
        let regex = Regex::new(pattern)
            .map_err(|e| EmbedError::invalid_service(key, format!("bad regex: {e}")))?;

        let embed_url = non_empty(key, "embedUrl", self.embed_url.as_deref())?;
        let html = non_empty(key, "html", self.html.as_deref())?;

        if !embed_url.contains(REMOTE_ID_PLACEHOLDER) {
            tracing::warn!(
                "Service `{}` embed URL has no {} placeholder",
                key,
                REMOTE_ID_PLACEHOLDER
            );
        }

        Ok(ServiceConfig {
            regex,
            embed_url,
            html,
            width: dimension(key, "width", self.width.as_ref())?,
            height: dimension(key, "height", self.height.as_ref())?,
            id: self.id.clone(),
        })
    }
}

fn non_empty(key: &str, field: &str, value: Option<&str>) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(EmbedError::invalid_service(key, format!("missing {field}"))),
    }
}

fn dimension(key: &str, field: &str, value: Option<&Number>) -> Result<Option<Dimension>> {
    value
        .map(|value| {
            Dimension::try_from(value.clone())
                .map_err(|reason| EmbedError::invalid_service(key, format!("{field}: {reason}")))
        })
        .transpose()
}

/// Validated service, ready for matching
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Pattern of source URLs
    pub regex: Regex,
    /// Embed URL template
    pub embed_url: String,
    /// Frame markup, passed through to the renderer untouched
    pub html: String,
    /// Default width
    pub width: Option<Dimension>,
    /// Default height
    pub height: Option<Dimension>,
    /// Identifier extraction strategy, first group when unset
    pub id: Option<IdStrategy>,
}

impl ServiceConfig {
    /// Strategy used for identifier extraction
    pub fn strategy(&self) -> &IdStrategy {
        self.id.as_ref().unwrap_or(&DEFAULT_STRATEGY)
    }

    /// Whether the service pattern matches `url`
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Capture groups for `url`, without the full match
    pub fn captures<'u>(&self, url: &'u str) -> Option<Vec<Option<&'u str>>> {
        let captures = self.regex.captures(url)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str()))
                .collect(),
        )
    }

    /// Resource identifier for `url`, `None` if the pattern does not match
    pub fn extract_id(&self, url: &str) -> Option<String> {
        let groups = self.captures(url)?;
        Some(self.strategy().extract(&groups))
    }

    /// Rendered embed URL for `url`, `None` if the pattern does not match
    pub fn embed_url_for(&self, url: &str) -> Option<String> {
        self.extract_id(url).map(|id| render_embed_url(&self.embed_url, &id))
    }

    /// Overwrite fields with the ones defined in `other`
    ///
    /// Required fields always come from `other`; optional fields only when
    /// `other` sets them.
    pub(crate) fn merge(&mut self, other: ServiceConfig) {
        self.regex = other.regex;
        self.embed_url = other.embed_url;
        self.html = other.html;

        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.id.is_some() {
            self.id = other.id;
        }
    }
}

impl PartialEq for ServiceConfig {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
            && self.embed_url == other.embed_url
            && self.html == other.html
            && self.width == other.width
            && self.height == other.height
            && self.id == other.id
    }
}
