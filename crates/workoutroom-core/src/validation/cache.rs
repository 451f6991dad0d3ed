use lru::LruCache;
use std::num::NonZeroUsize;

use super::Finding;

/// Bounded memo of validation findings keyed by a content hash.
#[derive(Debug)]
pub struct ValidationCache {
    entries: LruCache<String, Vec<Finding>>,
    hits: u64,
    misses: u64,
}

impl ValidationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Vec<Finding>> {
        match self.entries.get(key) {
            Some(findings) => {
                self.hits += 1;
                Some(findings.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: String, findings: Vec<Finding>) {
        self.entries.put(key, findings);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
