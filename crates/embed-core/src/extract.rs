//! Identifier extraction strategies
//!
//! A service pattern yields an ordered list of capture groups. The strategy
//! attached to a service turns those groups into the single identifier that
//! gets substituted into the embed URL template.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Turns regex capture groups into a resource identifier
///
/// `groups` excludes the full match. Groups that did not participate in the
/// match are `None`.
pub trait ExtractId: Send + Sync {
    /// Extract the identifier from capture groups
    fn extract(&self, groups: &[Option<&str>]) -> String;
}

impl<F> ExtractId for F
where
    F: Fn(&[Option<&str>]) -> String + Send + Sync,
{
    fn extract(&self, groups: &[Option<&str>]) -> String {
        self(groups)
    }
}

/// Query parameters kept by the YouTube strategy, with their canonical name
const YOUTUBE_PARAMS: &[(&str, &str)] = &[
    ("start", "start"),
    ("end", "end"),
    ("t", "start"),
    ("time_continue", "start"),
    ("list", "list"),
];

/// Identifier extraction strategy attached to a service
///
/// Serialized form, as used in service definitions:
///
/// * `"first"`
/// * `"youtube"`
/// * `{"join": "/embed/"}`
///
/// `Custom` is only available programmatically.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdStrategy {
    /// First capture group
    #[default]
    First,
    /// All capture groups joined with a separator
    Join(String),
    /// Video id plus remapped time and playlist parameters
    #[serde(rename = "youtube")]
    YouTube,
    /// Caller-supplied extractor
    #[serde(skip)]
    Custom(CustomExtractor),
}

impl IdStrategy {
    /// Join all groups with `separator`
    pub fn join(separator: impl Into<String>) -> Self {
        IdStrategy::Join(separator.into())
    }

    /// Wrap a closure as a strategy
    pub fn custom<F>(extractor: F) -> Self
    where
        F: Fn(&[Option<&str>]) -> String + Send + Sync + 'static,
    {
        IdStrategy::Custom(CustomExtractor(Arc::new(extractor)))
    }

    /// Strategy name, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            IdStrategy::First => "first",
            IdStrategy::Join(_) => "join",
            IdStrategy::YouTube => "youtube",
            IdStrategy::Custom(_) => "custom",
        }
    }
}

impl ExtractId for IdStrategy {
    fn extract(&self, groups: &[Option<&str>]) -> String {
        match self {
            IdStrategy::First => first_group(groups),
            IdStrategy::Join(separator) => groups
                .iter()
                .map(|group| group.unwrap_or_default())
                .collect::<Vec<_>>()
                .join(separator),
            IdStrategy::YouTube => youtube_id(groups),
            IdStrategy::Custom(custom) => custom.0.extract(groups),
        }
    }
}

impl fmt::Debug for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Join(separator) => f.debug_tuple("Join").field(separator).finish(),
            IdStrategy::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.name()),
        }
    }
}

impl PartialEq for IdStrategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IdStrategy::First, IdStrategy::First) => true,
            (IdStrategy::YouTube, IdStrategy::YouTube) => true,
            (IdStrategy::Join(a), IdStrategy::Join(b)) => a == b,
            (IdStrategy::Custom(a), IdStrategy::Custom(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

/// Shared handle to a caller-supplied extractor
#[derive(Clone)]
pub struct CustomExtractor(Arc<dyn ExtractId>);

fn first_group(groups: &[Option<&str>]) -> String {
    groups.first().copied().flatten().unwrap_or_default().to_string()
}

/// YouTube URLs carry the video id in the first group and the raw query
/// string (`?a=1&b=2`) in the second.
fn youtube_id(groups: &[Option<&str>]) -> String {
    let mut id = first_group(groups);
    let params = groups.get(1).copied().flatten().unwrap_or_default();

    if params.is_empty() && !id.is_empty() {
        return id;
    }

    let query = params.strip_prefix(&['?', '&'][..]).unwrap_or(params);
    let mut kept = Vec::new();

    for pair in query.split('&') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));

        if id.is_empty() && name == "v" {
            id = value.to_string();
            continue;
        }

        if let Some((_, canonical)) = YOUTUBE_PARAMS.iter().find(|(param, _)| *param == name) {
            kept.push(format!("{canonical}={value}"));
        }
    }

    format!("{id}?{}", kept.join("&"))
}
