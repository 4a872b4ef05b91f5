// * Process-scoped result cache
// * Keyed by sector slug; entries live until the caller invalidates them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::engine::error::FetchResult;
use crate::engine::normalization::sector_slug;

pub struct ResultCache<T> {
    entries: Arc<RwLock<HashMap<String, FetchResult<T>>>>,
    // * One fetch in flight per key; concurrent misses wait on it
    in_flight: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl<T: Clone> ResultCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // * Raw names are slugged so spelling variants share one entry
    pub fn key(name: &str) -> String {
        sector_slug(name)
    }

    pub async fn get(&self, name: &str) -> Option<FetchResult<T>> {
        self.entries.read().await.get(&Self::key(name)).cloned()
    }

    pub async fn insert(&self, name: &str, result: FetchResult<T>) {
        self.entries.write().await.insert(Self::key(name), result);
    }

    /// Returns the cached result for `name`, computing and storing it on a miss.
    /// Errors are cached too; invalidate to retry.
    pub async fn get_or_fetch<F, Fut>(&self, name: &str, fetch: F) -> FetchResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        if let Some(hit) = self.get(name).await {
            debug!("Cache hit for '{}'", Self::key(name));
            return hit;
        }

        let key = Self::key(name);
        let slot = self
            .in_flight
            .lock()
            .await
            .entry(key.clone())
            .or_default()
            .clone();
        let _guard = slot.lock().await;

        // * Another caller may have filled the entry while this one waited
        if let Some(hit) = self.get(name).await {
            debug!("Cache hit for '{}' after wait", key);
            return hit;
        }

        let result = fetch().await;
        self.insert(name, result.clone()).await;
        self.in_flight.lock().await.remove(&key);
        result
    }

    pub async fn invalidate(&self, name: &str) -> bool {
        self.entries.write().await.remove(&Self::key(name)).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ResultCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}
