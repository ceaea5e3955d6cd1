//! Cache that never stores anything.

use super::SourceCache;

/// Caches nothing: every lookup misses and every store is dropped.
///
/// The default cache, for embedders that prefer refetching over memory use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSourceCache;

impl NoopSourceCache {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SourceCache for NoopSourceCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _content: &str) {}

    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_stores() {
        let cache = NoopSourceCache::new();
        cache.set("k", "v");
        assert_eq!(cache.get("k"), None);
    }
}
