//! In-memory resolution cache for testing and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::CacheResult;
use crate::traits::cache::ImageCache;
use crate::types::descriptor::DurableId;

/// Process-local cache. Entries are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<DurableId, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronous read, for assertions.
    pub fn peek(&self, id: &DurableId) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl ImageCache for MemoryCache {
    async fn get(&self, id: &DurableId) -> CacheResult<Option<String>> {
        Ok(self.peek(id))
    }

    async fn put(&self, id: &DurableId, image_url: &str) -> CacheResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), image_url.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
