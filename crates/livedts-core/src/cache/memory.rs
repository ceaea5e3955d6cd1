//! In-memory source cache.

use super::SourceCache;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local cache backed by a hash map.
#[derive(Debug, Default)]
pub struct MemorySourceCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySourceCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl SourceCache for MemorySourceCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, content: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), content.to_string());
    }

    fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
