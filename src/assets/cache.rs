use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use crate::assets::{decode::DecodedImage, source::ImageSource};

/// Decides which cache entries to drop.
///
/// The cache reports every insert and hit; after each insert it asks for victims and removes
/// whatever keys are returned.
pub trait EvictionPolicy: Send {
    /// A new entry was inserted.
    fn record_insert(&mut self, key: &ImageSource);

    /// An existing entry was served.
    fn record_hit(&mut self, key: &ImageSource);

    /// Keys to evict now that the cache holds `len` entries.
    fn select_victims(&mut self, len: usize) -> Vec<ImageSource>;

    /// The cache was cleared.
    fn reset(&mut self) {}
}

/// Keeps every entry for the lifetime of the cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverEvict;

impl EvictionPolicy for NeverEvict {
    fn record_insert(&mut self, _key: &ImageSource) {}

    fn record_hit(&mut self, _key: &ImageSource) {}

    fn select_victims(&mut self, _len: usize) -> Vec<ImageSource> {
        Vec::new()
    }
}

/// Least-recently-used eviction bounded by entry count.
#[derive(Clone, Debug)]
pub struct LruEviction {
    capacity: usize,
    lru: VecDeque<ImageSource>,
}

impl LruEviction {
    /// Keep at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lru: VecDeque::new(),
        }
    }

    fn touch(&mut self, key: &ImageSource) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.clone());
    }
}

impl EvictionPolicy for LruEviction {
    fn record_insert(&mut self, key: &ImageSource) {
        self.touch(key);
    }

    fn record_hit(&mut self, key: &ImageSource) {
        self.touch(key);
    }

    fn select_victims(&mut self, len: usize) -> Vec<ImageSource> {
        let mut out = Vec::new();
        let mut len = len;
        while len > self.capacity {
            let Some(old) = self.lru.pop_front() else {
                break;
            };
            out.push(old);
            len -= 1;
        }
        out
    }

    fn reset(&mut self) {
        self.lru.clear();
    }
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Successful decodes stored.
    pub inserts: u64,
    /// Entries dropped by the eviction policy.
    pub evictions: u64,
}

/// Decoded images keyed by source identifier.
///
/// Only successful decodes are ever inserted; failures leave no trace, so the next lookup for
/// the same source misses and the loader fetches again.
pub struct ImageCache {
    entries: HashMap<ImageSource, Arc<DecodedImage>>,
    policy: Box<dyn EvictionPolicy>,
    stats: CacheStats,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl ImageCache {
    /// Unbounded cache that never evicts.
    pub fn new() -> Self {
        Self::with_policy(NeverEvict)
    }

    /// Cache governed by `policy`.
    pub fn with_policy(policy: impl EvictionPolicy + 'static) -> Self {
        Self {
            entries: HashMap::new(),
            policy: Box::new(policy),
            stats: CacheStats::default(),
        }
    }

    /// Look up a decoded image, counting the hit or miss.
    pub fn get(&mut self, key: &ImageSource) -> Option<Arc<DecodedImage>> {
        match self.entries.get(key) {
            Some(img) => {
                self.stats.hits += 1;
                self.policy.record_hit(key);
                Some(img.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a fully decoded image and apply the eviction policy.
    pub fn insert(&mut self, key: ImageSource, image: Arc<DecodedImage>) {
        self.policy.record_insert(&key);
        self.entries.insert(key, image);
        self.stats.inserts += 1;

        for victim in self.policy.select_victims(self.entries.len()) {
            if self.entries.remove(&victim).is_some() {
                self.stats.evictions += 1;
                tracing::debug!(source = %victim, "evicted cached image");
            }
        }
    }

    /// `true` if `key` is cached. Does not count as a hit.
    pub fn contains(&self, key: &ImageSource) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries; counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.policy.reset();
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
