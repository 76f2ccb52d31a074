//! In-memory embedding cache using moka.
//!
//! Keys are blake3 hashes of the embedded text.

use std::time::Duration;

use moka::sync::Cache;

use crate::engine::Embedded;

pub struct EmbeddingCache {
    cache: Cache<String, Embedded>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    pub fn key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Embedded> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedded: Embedded) {
        self.cache.insert(key, embedded);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100);
        let key = EmbeddingCache::key("section 17");
        let value = Embedded {
            vector: vec![1.0, 0.0],
            provider: "p".into(),
        };
        cache.insert(key.clone(), value.clone());
        assert_eq!(cache.get(&key), Some(value));
        assert_eq!(cache.get(&EmbeddingCache::key("section 18")), None);
    }
}
