//! Persistent source cache, one file per key.

use super::SourceCache;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Cache that persists declaration content across processes.
///
/// Each canonical key maps to one file under the root directory; `/` in
/// keys is percent-encoded so scoped package keys stay flat.
#[derive(Debug, Clone)]
pub struct DiskSourceCache {
    root: PathBuf,
}

impl DiskSourceCache {
    /// Create a cache rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a cache under the platform cache directory.
    ///
    /// - Linux: `$XDG_CACHE_HOME/livedts/declarations` or
    ///   `~/.cache/livedts/declarations`
    /// - macOS: `~/Library/Caches/livedts/declarations`
    /// - Windows: `%LOCALAPPDATA%\livedts\cache\declarations`
    #[must_use]
    pub fn in_default_location() -> Self {
        let base = dirs_next::cache_dir().map_or_else(
            || {
                dirs_next::home_dir().map_or_else(
                    || PathBuf::from(".livedts-cache"),
                    |p| p.join(".cache").join("livedts"),
                )
            },
            |p| p.join("livedts"),
        );
        Self::new(base.join("declarations"))
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(Self::encode_key(key))
    }

    /// Encode a canonical key as a flat filename.
    fn encode_key(key: &str) -> String {
        key.replace('/', "%2F")
    }
}

impl SourceCache for DiskSourceCache {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, content: &str) {
        if let Err(e) = fs::create_dir_all(&self.root)
            .and_then(|()| fs::write(self.entry_path(key), content))
        {
            warn!(key, error = %e, "Failed to persist cache entry");
        }
    }

    fn clear(&self) {
        if self.root.exists() {
            if let Err(e) = fs::remove_dir_all(&self.root) {
                warn!(error = %e, "Failed to clear disk cache");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let cache = DiskSourceCache::new(dir.path());

        assert_eq!(cache.get("react/index.d.ts"), None);
        cache.set("react/index.d.ts", "export = React;");
        assert_eq!(
            cache.get("react/index.d.ts").as_deref(),
            Some("export = React;")
        );
    }

    #[test]
    fn test_scoped_keys_are_flat_files() {
        let dir = tempdir().unwrap();
        let cache = DiskSourceCache::new(dir.path());

        cache.set("@types/node/fs.d.ts", "declare module 'fs';");
        assert_eq!(
            cache.get("@types/node/fs.d.ts").as_deref(),
            Some("declare module 'fs';")
        );
        assert!(dir.path().join("@types%2Fnode%2Ffs.d.ts").exists());
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = tempdir().unwrap();
        let cache = DiskSourceCache::new(dir.path().join("cache"));

        cache.set("k", "v");
        cache.clear();
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempdir().unwrap();
        DiskSourceCache::new(dir.path()).set("k", "v");

        let reopened = DiskSourceCache::new(dir.path());
        assert_eq!(reopened.get("k").as_deref(), Some("v"));
    }
}
