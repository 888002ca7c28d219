//! Write-through store for resolved images, keyed by durable provider id.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CacheResult;
use crate::types::descriptor::DurableId;

/// Persistence adapter for resolved image URLs.
///
/// Keys are [`DurableId`]s, so an ephemeral search result can never be
/// written. `put` overwrites unconditionally and concurrent writers race
/// last-write-wins. Entries never expire.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageCache: Send + Sync {
    /// Previously resolved image for a provider, if any.
    async fn get(&self, id: &DurableId) -> CacheResult<Option<String>>;

    /// Record the resolved image for a provider.
    async fn put(&self, id: &DurableId, image_url: &str) -> CacheResult<()>;

    /// Backend name (for logging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: ImageCache + ?Sized> ImageCache for Arc<T> {
    async fn get(&self, id: &DurableId) -> CacheResult<Option<String>> {
        (**self).get(id).await
    }

    async fn put(&self, id: &DurableId, image_url: &str) -> CacheResult<()> {
        (**self).put(id, image_url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
