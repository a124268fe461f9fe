//! Embed block payload and embed URL rendering

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Token replaced by the resource identifier in embed URL templates
pub const REMOTE_ID_PLACEHOLDER: &str = "<%= remote_id %>";

/// Substitute `id` for every placeholder occurrence in `template`
///
/// # Example
///
/// ```
/// use embed_core::embed::render_embed_url;
///
/// let url = render_embed_url("https://coub.com/embed/<%= remote_id %>", "1efrxs");
/// assert_eq!(url, "https://coub.com/embed/1efrxs");
/// ```
pub fn render_embed_url(template: &str, id: &str) -> String {
    template.replace(REMOTE_ID_PLACEHOLDER, id)
}

/// Display dimension of embedded content
///
/// Any positive finite JSON number. The number is kept in the form it was
/// written in, so `580` and `580.5` both save back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Number", into = "Number")]
pub struct Dimension(Number);

impl Dimension {
    /// Value as a float
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }
}

impl TryFrom<Number> for Dimension {
    type Error = String;

    fn try_from(number: Number) -> std::result::Result<Self, Self::Error> {
        match number.as_f64() {
            Some(value) if value.is_finite() && value > 0.0 => Ok(Self(number)),
            _ => Err(format!("dimension must be a positive number, got {number}")),
        }
    }
}

impl TryFrom<u32> for Dimension {
    type Error = String;

    fn try_from(pixels: u32) -> std::result::Result<Self, Self::Error> {
        Self::try_from(Number::from(pixels))
    }
}

impl TryFrom<f64> for Dimension {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        let number =
            Number::from_f64(value).ok_or_else(|| format!("dimension must be finite, got {value}"))?;
        Self::try_from(number)
    }
}

impl From<Dimension> for Number {
    fn from(dimension: Dimension) -> Self {
        dimension.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Persisted state of one embed block
///
/// Field order matches the saved JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedData {
    /// Service key
    #[serde(default)]
    pub service: String,
    /// Original URL of the embedded content
    #[serde(default)]
    pub source: String,
    /// Rendered embed URL
    #[serde(default)]
    pub embed: String,
    /// Embedded content width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    /// Embedded content height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    /// Content caption
    #[serde(default)]
    pub caption: String,
}

impl EmbedData {
    /// Whether the block has not been bound to a service yet
    pub fn is_empty(&self) -> bool {
        self.service.is_empty()
    }

    /// Fold `update` into this state
    ///
    /// Non-empty string fields and present dimensions of `update` replace the
    /// current ones; empty or absent fields keep the current value.
    pub fn merge(&mut self, update: EmbedDataUpdate) {
        fn take(current: &mut String, update: Option<String>) {
            if let Some(value) = update.filter(|value| !value.is_empty()) {
                *current = value;
            }
        }

        take(&mut self.service, update.service);
        take(&mut self.source, update.source);
        take(&mut self.embed, update.embed);
        take(&mut self.caption, update.caption);

        if update.width.is_some() {
            self.width = update.width;
        }
        if update.height.is_some() {
            self.height = update.height;
        }
    }
}

/// Partial embed state handed to a block by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedDataUpdate {
    /// Service key
    pub service: Option<String>,
    /// Original URL
    pub source: Option<String>,
    /// Rendered embed URL
    pub embed: Option<String>,
    /// Width
    pub width: Option<Dimension>,
    /// Height
    pub height: Option<Dimension>,
    /// Caption
    pub caption: Option<String>,
}

impl From<EmbedData> for EmbedDataUpdate {
    fn from(data: EmbedData) -> Self {
        Self {
            service: Some(data.service),
            source: Some(data.source),
            embed: Some(data.embed),
            width: data.width,
            height: data.height,
            caption: Some(data.caption),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(value: u32) -> Option<Dimension> {
        Dimension::try_from(value).ok()
    }

    fn sample() -> EmbedData {
        EmbedData {
            service: "vimeo".to_string(),
            source: "https://vimeo.com/289836809".to_string(),
            embed: "https://player.vimeo.com/video/289836809?title=0&byline=0".to_string(),
            width: px(580),
            height: px(320),
            caption: "A video".to_string(),
        }
    }

    #[test]
    fn test_render_replaces_every_placeholder() {
        let url = render_embed_url("a/<%= remote_id %>/b/<%= remote_id %>", "x");
        assert_eq!(url, "a/x/b/x");
    }

    #[test]
    fn test_render_is_literal() {
        // Only the exact token is recognized
        let url = render_embed_url("a/<%=remote_id%>/$1", "x");
        assert_eq!(url, "a/<%=remote_id%>/$1");

        let url = render_embed_url("a/<%= remote_id %>", "$0");
        assert_eq!(url, "a/$0");
    }

    #[test]
    fn test_payload_roundtrip_is_stable() {
        let json = r#"{"service":"vimeo","source":"https://vimeo.com/289836809","embed":"https://player.vimeo.com/video/289836809?title=0&byline=0","width":580,"height":320,"caption":"A video"}"#;
        let data: EmbedData = serde_json::from_str(json).unwrap();
        assert_eq!(data, sample());
        assert_eq!(serde_json::to_string(&data).unwrap(), json);
    }

    #[test]
    fn test_payload_without_dimensions() {
        let data: EmbedData =
            serde_json::from_str(r#"{"service":"coub","source":"s","embed":"e"}"#).unwrap();
        assert_eq!(data.width, None);
        assert_eq!(data.caption, "");

        let json = serde_json::to_string(&data).unwrap();
        assert!(!json.contains("width"));
        assert!(json.contains(r#""caption":"""#));
    }

    #[test]
    fn test_merge_prefers_non_empty_update() {
        let mut data = sample();
        data.merge(EmbedDataUpdate {
            caption: Some("New caption".to_string()),
            source: Some(String::new()),
            height: px(400),
            ..Default::default()
        });

        assert_eq!(data.caption, "New caption");
        assert_eq!(data.source, "https://vimeo.com/289836809");
        assert_eq!(data.width, px(580));
        assert_eq!(data.height, px(400));
    }

    #[test]
    fn test_fractional_dimensions_roundtrip() {
        let json = r#"{"service":"x","source":"s","embed":"e","width":580.5,"height":320,"caption":""}"#;
        let data: EmbedData = serde_json::from_str(json).unwrap();
        assert_eq!(data.width.as_ref().map(Dimension::as_f64), Some(580.5));
        assert_eq!(serde_json::to_string(&data).unwrap(), json);
    }

    #[test]
    fn test_dimension_must_be_positive() {
        assert!(Dimension::try_from(0u32).is_err());
        assert!(Dimension::try_from(-1.5_f64).is_err());
        assert!(Dimension::try_from(f64::NAN).is_err());
        assert_eq!(Dimension::try_from(333.4_f64).unwrap().to_string(), "333.4");

        let result = serde_json::from_str::<EmbedData>(r#"{"width":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_into_empty() {
        let mut data = EmbedData::default();
        assert!(data.is_empty());

        data.merge(sample().into());
        assert_eq!(data, sample());
        assert!(!data.is_empty());
    }
}
