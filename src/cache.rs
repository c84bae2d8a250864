//! Bounded in-memory cache for resolved class contents.
//!
//! Keyed by a locator's canonical string, holding the resolved text and the
//! extension it was resolved under. Strictly least-recently-used: a `get`
//! promotes the entry, a `put` over capacity evicts exactly one victim.
//! There is no TTL and no invalidation when an archive changes on disk; the
//! cache lives for one session and is rebuilt on the next.
//!
//! Not internally synchronized. The resolver wraps it in a mutex and holds
//! that lock only for `get`/`put`, never across decompilation.

use crate::locator::FileExtension;

pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedContent {
    pub text: String,
    pub extension: FileExtension,
}

#[derive(Debug)]
pub struct ContentCache {
    capacity: usize,
    // Recency order, least recently used first. Capacity is small (5 by
    // default), a linear scan beats any fancier structure here.
    entries: Vec<(String, CachedContent)>,
}

impl ContentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<CachedContent> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(idx);
        let content = entry.1.clone();
        self.entries.push(entry);
        Some(content)
    }

    pub fn put(&mut self, key: String, content: CachedContent) {
        if let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(idx);
        }
        self.entries.push((key, content));
        if self.entries.len() > self.capacity {
            let (evicted, _) = self.entries.remove(0);
            tracing::debug!(key = %evicted, "evicting least recently used cache entry");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> CachedContent {
        CachedContent {
            text: text.to_string(),
            extension: FileExtension::Java,
        }
    }

    #[test]
    fn put_over_capacity_evicts_the_least_recently_used() {
        let mut cache = ContentCache::new(2);
        cache.put("a".into(), entry("a"));
        cache.put("b".into(), entry("b"));
        cache.put("c".into(), entry("c"));

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn get_promotes_recency() {
        let mut cache = ContentCache::new(2);
        cache.put("a".into(), entry("a"));
        cache.put("b".into(), entry("b"));

        // "a" becomes most recent, so "b" is the victim.
        assert!(cache.get("a").is_some());
        cache.put("c".into(), entry("c"));

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn put_overwrites_without_growing() {
        let mut cache = ContentCache::new(2);
        cache.put("a".into(), entry("one"));
        cache.put("a".into(), entry("two"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().text, "two");
    }

    #[test]
    fn get_misses_return_none() {
        let mut cache = ContentCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        assert!(cache.get("nope").is_none());
    }
}
