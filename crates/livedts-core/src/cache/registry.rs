//! Shared cache registry.

use super::SourceCache;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Get-or-create registry for caches shared across sessions.
///
/// An application that runs several editing surfaces holds one registry and
/// hands each session the cache registered under an agreed name, so all
/// sessions memoize into the same store. Owned explicitly by the caller;
/// there is no process-global instance.
#[derive(Default)]
pub struct CacheRegistry {
    entries: Mutex<HashMap<String, Arc<dyn SourceCache>>>,
}

impl CacheRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cache registered under `name`, creating it with `create`
    /// on first use.
    pub fn get_or_create<F>(&self, name: &str, create: F) -> Arc<dyn SourceCache>
    where
        F: FnOnce() -> Arc<dyn SourceCache>,
    {
        let mut entries = self.entries.lock().unwrap();
        Arc::clone(entries.entry(name.to_string()).or_insert_with(create))
    }

    /// Names of all registered caches.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}
