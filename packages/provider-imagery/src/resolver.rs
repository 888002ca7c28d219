//! The resolution orchestrator.
//!
//! One `resolve` call walks a fixed ladder and stops at the first rung that
//! yields an image:
//!
//! ```text
//! existing image ──> cached image (durable only) ──> website preview ──> placeholder
//!                                                         │                  │
//!                                                         └──── persist ─────┘ (durable only)
//! ```
//!
//! The placeholder rung cannot fail, so every call returns an image URL.
//! Persisting is detached: the result is returned before the cache write
//! completes, and a failed write is only logged.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, instrument, warn};

use crate::config::{ImageryTables, ResolverConfig, DEFAULT_FETCH_TIMEOUT};
use crate::error::ConfigResult;
use crate::icons::{IconAssigner, IconAssignment};
use crate::placeholder::PlaceholderCategorizer;
use crate::traits::{cache::ImageCache, preview::PreviewImageSource};
use crate::types::{
    descriptor::{DurableId, ProviderDescriptor},
    resolution::ResolutionResult,
    search_text::SearchText,
};
use crate::website::HttpPreviewExtractor;

/// Resolves one visual identity per provider card.
///
/// # Example
///
/// ```rust,ignore
/// use provider_imagery::{ImageResolver, MemoryCache, ProviderDescriptor, ResolverConfig};
///
/// let resolver = ImageResolver::from_config(ResolverConfig::from_env()?, MemoryCache::new())?;
///
/// let descriptor = ProviderDescriptor::durable(provider.id.to_string(), &provider.name)
///     .with_specialties(provider.specialties.clone())
///     .with_website(provider.website_url.clone().unwrap_or_default());
///
/// let result = resolver.resolve(&descriptor).await;
/// ```
pub struct ImageResolver<P, C> {
    source: P,
    cache: Arc<C>,
    icons: IconAssigner,
    placeholders: PlaceholderCategorizer,
    cache_timeout: Duration,
    writes: TaskTracker,
}

impl<C: ImageCache + 'static> ImageResolver<HttpPreviewExtractor, C> {
    /// Resolver backed by the live HTTP extractor.
    pub fn from_config(config: ResolverConfig, cache: C) -> ConfigResult<Self> {
        let source = HttpPreviewExtractor::from_config(&config)?;
        info!(
            source = source.name(),
            cache = cache.name(),
            timeout_ms = config.fetch_timeout.as_millis() as u64,
            max_concurrent_fetches = config.max_concurrent_fetches,
            "Image resolver ready"
        );
        Ok(Self::new(source, cache, config.tables).with_cache_timeout(config.fetch_timeout))
    }
}

impl<P, C> ImageResolver<P, C>
where
    P: PreviewImageSource,
    C: ImageCache + 'static,
{
    pub fn new(source: P, cache: C, tables: ImageryTables) -> Self {
        Self {
            source,
            cache: Arc::new(cache),
            icons: IconAssigner::new(tables.icons),
            placeholders: PlaceholderCategorizer::new(tables.placeholders),
            cache_timeout: DEFAULT_FETCH_TIMEOUT,
            writes: TaskTracker::new(),
        }
    }

    /// Bound on one cache read. A read that runs past it counts as a miss.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn icons(&self) -> &IconAssigner {
        &self.icons
    }

    pub fn placeholders(&self) -> &PlaceholderCategorizer {
        &self.placeholders
    }

    /// Resolve the image for one provider card. Never fails.
    #[instrument(skip_all, fields(provider = %descriptor.identity))]
    pub async fn resolve(&self, descriptor: &ProviderDescriptor) -> ResolutionResult {
        if let Some(url) = descriptor.existing_image() {
            debug!("Using existing image");
            return ResolutionResult::existing(url);
        }

        if let Some(id) = descriptor.durable_id() {
            match tokio::time::timeout(self.cache_timeout, self.cache.get(id)).await {
                Ok(Ok(Some(url))) => {
                    debug!("Using cached image");
                    return ResolutionResult::existing(url);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => warn!(error = %e, "Cache read failed, resolving from scratch"),
                Err(_) => warn!(
                    timeout_ms = self.cache_timeout.as_millis() as u64,
                    "Cache read timed out, resolving from scratch"
                ),
            }
        }

        self.resolve_fresh(descriptor).await
    }

    /// Resolve many cards concurrently, preserving input order.
    ///
    /// Website fetches are still capped by the extractor.
    pub async fn resolve_many(&self, descriptors: &[ProviderDescriptor]) -> Vec<ResolutionResult> {
        join_all(descriptors.iter().map(|d| self.resolve(d))).await
    }

    /// Recompute ignoring the existing image and the cache, then overwrite
    /// the cache entry. The only path that replaces a stored image.
    #[instrument(skip_all, fields(provider = %descriptor.identity))]
    pub async fn refresh(&self, descriptor: &ProviderDescriptor) -> ResolutionResult {
        info!("Refreshing provider image");
        self.resolve_fresh(descriptor).await
    }

    /// Icon and tile color for the card, from the resolver's tables.
    pub fn assign_icon(&self, descriptor: &ProviderDescriptor) -> IconAssignment {
        let assignment = self.icons.assign(
            descriptor.identity.as_str(),
            &descriptor.specialties_text(),
        );
        debug!(
            provider = %descriptor.identity,
            icon = %assignment.icon,
            color_class = %assignment.color_class,
            "Assigned icon"
        );
        assignment
    }

    /// The placeholder rung on its own.
    pub fn placeholder_for(&self, descriptor: &ProviderDescriptor) -> ResolutionResult {
        let text = SearchText::from_descriptor(descriptor);
        ResolutionResult::placeholder(self.placeholders.categorize(&text))
    }

    /// Wait for detached cache writes started so far.
    pub async fn flush_writes(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }

    async fn resolve_fresh(&self, descriptor: &ProviderDescriptor) -> ResolutionResult {
        let result = match self.try_website(descriptor).await {
            Some(result) => result,
            None => self.placeholder_for(descriptor),
        };

        if let (Some(id), Some(url)) = (descriptor.durable_id(), result.image_url.as_deref()) {
            self.persist(id, url);
        }

        info!(
            source = %result.source,
            image_url = result.image_url.as_deref().unwrap_or_default(),
            "Resolved provider image"
        );
        result
    }

    async fn try_website(&self, descriptor: &ProviderDescriptor) -> Option<ResolutionResult> {
        let website = descriptor.website()?;
        debug!(website = %website, source = self.source.name(), "Trying website preview");
        self.source.extract(website).await.into_resolution()
    }

    fn persist(&self, id: &DurableId, image_url: &str) {
        let cache = Arc::clone(&self.cache);
        let id = id.clone();
        let image_url = image_url.to_string();

        self.writes.spawn(async move {
            match cache.put(&id, &image_url).await {
                Ok(()) => debug!(provider = %id, "Cached resolved image"),
                Err(e) => warn!(provider = %id, error = %e, "Failed to cache resolved image"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CacheError, CacheResult};
    use crate::testing::MockPreviewSource;
    use crate::traits::cache::MockImageCache;
    use crate::types::resolution::{ImageSource, PreviewImage};

    fn resolver(
        source: MockPreviewSource,
        cache: MockImageCache,
    ) -> ImageResolver<MockPreviewSource, MockImageCache> {
        ImageResolver::new(source, cache, ImageryTables::default())
    }

    #[tokio::test]
    async fn test_existing_image_skips_everything() {
        let source = MockPreviewSource::new();
        // No expectations: any cache call would panic.
        let resolver = resolver(source.clone(), MockImageCache::new());

        let d = ProviderDescriptor::durable("p-1", "Rainbow Art Studio")
            .with_website("https://rainbow.example")
            .with_existing_image("https://cdn/curated.jpg");

        let result = resolver.resolve(&d).await;
        assert_eq!(result, ResolutionResult::existing("https://cdn/curated.jpg"));
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_read_failure_is_a_miss() {
        let source = MockPreviewSource::new().with_preview(
            "https://rainbow.example",
            PreviewImage::OpenGraph("https://x/og.png".to_string()),
        );

        let mut cache = MockImageCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::Storage("connection reset".into())));
        cache
            .expect_put()
            .withf(|id, url| id.as_str() == "p-1" && url == "https://x/og.png")
            .times(1)
            .returning(|_, _| Ok(()));

        let resolver = resolver(source.clone(), cache);
        let d = ProviderDescriptor::durable("p-1", "Rainbow Art Studio")
            .with_website("https://rainbow.example");

        let result = resolver.resolve(&d).await;
        resolver.flush_writes().await;

        assert_eq!(result.source, ImageSource::WebsiteOg);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_write_failure_does_not_affect_result() {
        let mut cache = MockImageCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_put()
            .times(1)
            .returning(|_, _| Err(CacheError::Storage("read-only replica".into())));

        let resolver = resolver(MockPreviewSource::new(), cache);
        let d = ProviderDescriptor::durable("p-2", "Lakeside Soccer Academy")
            .with_specialties(["soccer"]);

        let result = resolver.resolve(&d).await;
        resolver.flush_writes().await;

        assert_eq!(result.source, ImageSource::Placeholder);
        assert!(result.image_url.unwrap().contains("soccer"));
    }

    #[tokio::test]
    async fn test_ephemeral_never_touches_cache() {
        let resolver = resolver(MockPreviewSource::new(), MockImageCache::new());
        let d = ProviderDescriptor::ephemeral("places/ChIJ123", "Chess Kids");

        let result = resolver.resolve(&d).await;
        resolver.flush_writes().await;

        assert_eq!(result.source, ImageSource::Placeholder);
    }

    struct StalledCache;

    #[async_trait::async_trait]
    impl ImageCache for StalledCache {
        async fn get(&self, _id: &DurableId) -> CacheResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Some("https://cdn/too-late.jpg".to_string()))
        }

        async fn put(&self, _id: &DurableId, _image_url: &str) -> CacheResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_cache_read_is_a_miss() {
        let resolver = ImageResolver::new(
            MockPreviewSource::new(),
            StalledCache,
            ImageryTables::default(),
        )
        .with_cache_timeout(Duration::from_millis(100));
        let d = ProviderDescriptor::durable("p-3", "Lakeside Soccer Academy");

        let started = std::time::Instant::now();
        let result = resolver.resolve(&d).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(result.source, ImageSource::Placeholder);
        assert!(result.image_url.unwrap().contains("soccer"));
    }

    #[tokio::test]
    async fn test_assign_icon_uses_identity_and_specialties() {
        let resolver = resolver(MockPreviewSource::new(), MockImageCache::new());
        let d = ProviderDescriptor::ephemeral("abc-123", "Whatever").with_specialties(["chess"]);

        let assignment = resolver.assign_icon(&d);
        assert_eq!(assignment, resolver.icons().assign("abc-123", "chess"));
        assert_eq!(assignment.icon, crate::icons::Icon::Chess);
    }
}
