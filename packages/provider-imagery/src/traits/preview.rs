//! Website preview-image lookup.

use async_trait::async_trait;

use crate::types::resolution::PreviewImage;

/// Finds a social-preview image for a website.
///
/// Infallible by signature: every failure mode is an expected outcome of
/// probing someone else's site and comes back as [`PreviewImage::NotFound`].
#[async_trait]
pub trait PreviewImageSource: Send + Sync {
    async fn extract(&self, url: &str) -> PreviewImage;

    /// Source name (for logging).
    fn name(&self) -> &str {
        "unknown"
    }
}
