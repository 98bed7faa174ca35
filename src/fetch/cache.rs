//! Short-lived page text cache.
//!
//! Wraps any `PageSource` and reuses successful fetches for a fixed TTL,
//! keyed by URL. Failures are never cached. The extraction core is
//! unaware of it.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::PageSource;
use crate::types::FetchError;

/// Default reuse window for fetched pages.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15;

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

struct PageCache {
    entries: HashMap<String, CacheEntry>,
}

struct CacheEntry {
    text: String,
    inserted_at: DateTime<Utc>,
}

impl PageCache {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn get(&self, url: &str, ttl: ChronoDuration) -> Option<&str> {
        self.entries.get(url).and_then(|entry| {
            if Utc::now() - entry.inserted_at < ttl {
                Some(entry.text.as_str())
            } else {
                None
            }
        })
    }

    fn insert(&mut self, url: String, text: String) {
        self.entries.insert(
            url,
            CacheEntry {
                text,
                inserted_at: Utc::now(),
            },
        );
    }

    fn evict_expired(&mut self, ttl: ChronoDuration) {
        let now = Utc::now();
        self.entries.retain(|_, entry| now - entry.inserted_at < ttl);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Cached source
// ---------------------------------------------------------------------------

/// A `PageSource` that serves recent successful fetches from memory.
pub struct CachedPageSource<S> {
    inner: S,
    ttl: ChronoDuration,
    cache: Mutex<PageCache>,
    cache_hits: AtomicU64,
}

impl<S: PageSource> CachedPageSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::zero()),
            cache: Mutex::new(PageCache::new()),
            cache_hits: AtomicU64::new(0),
        }
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cached_pages(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<S: PageSource> PageSource for CachedPageSource<S> {
    async fn fetch_text(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError> {
        let cached = self.lock().get(url, self.ttl).map(str::to_owned);
        if let Some(text) = cached {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(url, "Page cache hit");
            return Ok(text);
        }

        let text = self.inner.fetch_text(url, timeout).await?;

        let mut cache = self.lock();
        cache.evict_expired(self.ttl);
        cache.insert(url.to_string(), text.clone());
        Ok(text)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
