//! Testing utilities including mock implementations.
//!
//! These let applications exercise the resolver without network access or a
//! database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::error::{CacheError, CacheResult};
use crate::traits::{cache::ImageCache, preview::PreviewImageSource};
use crate::types::descriptor::DurableId;
use crate::types::resolution::PreviewImage;

/// Mock preview source with canned responses per URL.
///
/// Unknown URLs yield [`PreviewImage::NotFound`]. Clones share state, so a
/// test can keep a handle after moving one into the resolver.
///
/// # Example
///
/// ```rust
/// use provider_imagery::testing::MockPreviewSource;
/// use provider_imagery::PreviewImage;
///
/// let source = MockPreviewSource::new()
///     .with_preview("https://studio.example", PreviewImage::OpenGraph("https://x/og.png".into()));
/// assert_eq!(source.call_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockPreviewSource {
    previews: Arc<RwLock<HashMap<String, PreviewImage>>>,
    calls: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockPreviewSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned response for a URL (builder pattern).
    pub fn with_preview(self, url: impl Into<String>, preview: PreviewImage) -> Self {
        self.add_preview(url, preview);
        self
    }

    /// Sleep before answering, to simulate a slow site.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn add_preview(&self, url: impl Into<String>, preview: PreviewImage) {
        self.previews
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), preview);
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// URLs requested, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reset_calls(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl PreviewImageSource for MockPreviewSource {
    async fn extract(&self, url: &str) -> PreviewImage {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.previews
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .unwrap_or(PreviewImage::NotFound)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Cache whose every operation fails, counting attempts.
#[derive(Clone, Default)]
pub struct FailingCache {
    gets: Arc<RwLock<usize>>,
    puts: Arc<RwLock<usize>>,
}

impl FailingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_attempts(&self) -> usize {
        *self.gets.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put_attempts(&self) -> usize {
        *self.puts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn unavailable() -> CacheError {
        CacheError::Storage("cache unavailable".into())
    }
}

#[async_trait]
impl ImageCache for FailingCache {
    async fn get(&self, _id: &DurableId) -> CacheResult<Option<String>> {
        *self.gets.write().unwrap_or_else(PoisonError::into_inner) += 1;
        Err(Self::unavailable())
    }

    async fn put(&self, _id: &DurableId, _image_url: &str) -> CacheResult<()> {
        *self.puts.write().unwrap_or_else(PoisonError::into_inner) += 1;
        Err(Self::unavailable())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
