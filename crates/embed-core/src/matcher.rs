//! Pattern index used to route pasted URLs to a service

use regex::Regex;

/// Ordered `service key -> pattern` mapping
///
/// Iteration order is the precedence order: built-ins in catalog order, then
/// custom services in configuration order. When several patterns match the
/// same URL the first one wins.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    patterns: Vec<(String, Regex)>,
}

impl PatternIndex {
    pub(crate) fn new(patterns: Vec<(String, Regex)>) -> Self {
        Self { patterns }
    }

    /// Pattern registered for `key`
    pub fn get(&self, key: &str) -> Option<&Regex> {
        self.patterns
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, regex)| regex)
    }

    /// Iterate over `(key, pattern)` pairs in precedence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.patterns.iter().map(|(key, regex)| (key.as_str(), regex))
    }

    /// Service keys in precedence order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(key, _)| key.as_str())
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every service whose pattern matches `url`, in precedence order
    pub fn matching_services(&self, url: &str) -> Vec<&str> {
        self.iter()
            .filter(|(_, regex)| regex.is_match(url))
            .map(|(key, _)| key)
            .collect()
    }

    /// First service whose pattern matches `url`
    ///
    /// Logs a warning when the URL is claimed by more than one service, since
    /// the outcome then depends only on registration order.
    pub fn find_service(&self, url: &str) -> Option<&str> {
        let matching = self.matching_services(url);

        if matching.len() > 1 {
            tracing::warn!(
                "URL {} matches several services ({}), using `{}`",
                url,
                matching.join(", "),
                matching[0]
            );
        }

        matching.first().copied()
    }
}
