/*!
 * In-memory page cache for the fetch layer.
 *
 * A refresh walks the same index pages more than once (listing, detail,
 * script), so fetched bodies are kept per request path for the life of
 * the run. The cache is shared between clones and safe to hit from
 * concurrent fetch tasks.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared cache of fetched page bodies, keyed by request path
pub struct PageCache {
    /// Internal cache storage
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl PageCache {
    /// Create a new page cache
    pub fn new(enabled: bool) -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get a page body from the cache
    pub fn get(&self, path: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let pages = self.pages.read();
        match pages.get(path) {
            Some(body) => {
                let mut hits = self.hits.write();
                *hits += 1;
                debug!("Page cache hit for '{}'", path);
                Some(body.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;
                debug!("Page cache miss for '{}'", path);
                None
            }
        }
    }

    /// Store a page body in the cache
    pub fn store(&self, path: &str, body: &str) {
        if !self.enabled {
            return;
        }

        let mut pages = self.pages.write();
        pages.insert(path.to_string(), body.to_string());
        debug!("Cached page '{}' ({} bytes)", path, body.len());
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache and reset the counters
    pub fn clear(&self) {
        self.pages.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;
        debug!("Page cache cleared");
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for PageCache {
    fn clone(&self) -> Self {
        Self {
            pages: self.pages.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}
