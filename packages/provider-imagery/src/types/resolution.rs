//! Resolution outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Existing,
    WebsiteOg,
    WebsiteTwitter,
    Placeholder,
    None,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Existing => "existing",
            ImageSource::WebsiteOg => "website_og",
            ImageSource::WebsiteTwitter => "website_twitter",
            ImageSource::Placeholder => "placeholder",
            ImageSource::None => "none",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's answer for one provider card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub image_url: Option<String>,
    pub source: ImageSource,
}

impl ResolutionResult {
    pub fn existing(url: impl Into<String>) -> Self {
        Self::found(url, ImageSource::Existing)
    }

    pub fn placeholder(url: impl Into<String>) -> Self {
        Self::found(url, ImageSource::Placeholder)
    }

    pub fn none() -> Self {
        Self {
            image_url: None,
            source: ImageSource::None,
        }
    }

    fn found(url: impl Into<String>, source: ImageSource) -> Self {
        Self {
            image_url: Some(url.into()),
            source,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Social-preview image discovered on a provider's website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewImage {
    /// `<meta property="og:image">`
    OpenGraph(String),
    /// `<meta name="twitter:image">`
    TwitterCard(String),
    NotFound,
}

impl PreviewImage {
    pub fn url(&self) -> Option<&str> {
        match self {
            PreviewImage::OpenGraph(url) | PreviewImage::TwitterCard(url) => Some(url),
            PreviewImage::NotFound => None,
        }
    }

    pub fn source(&self) -> ImageSource {
        match self {
            PreviewImage::OpenGraph(_) => ImageSource::WebsiteOg,
            PreviewImage::TwitterCard(_) => ImageSource::WebsiteTwitter,
            PreviewImage::NotFound => ImageSource::None,
        }
    }

    /// `None` when nothing was found, so callers can fall through.
    pub fn into_resolution(self) -> Option<ResolutionResult> {
        let source = self.source();
        match self {
            PreviewImage::OpenGraph(url) | PreviewImage::TwitterCard(url) => {
                Some(ResolutionResult::found(url, source))
            }
            PreviewImage::NotFound => None,
        }
    }
}

impl From<PreviewImage> for ResolutionResult {
    fn from(preview: PreviewImage) -> Self {
        preview.into_resolution().unwrap_or_else(ResolutionResult::none)
    }
}
