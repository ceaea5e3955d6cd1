//! Type-checking host contract.

use std::collections::HashMap;
use std::sync::RwLock;

/// Receives resolved declaration content as virtual source files.
///
/// The host is the type checker behind the editing surface; injected files
/// are keyed by canonical virtual path and never touch the real filesystem.
pub trait TypingsHost: Send + Sync {
    /// Accept or replace a virtual declaration file.
    ///
    /// Returns true when the call changed the host's file set (new path, or
    /// new content for an existing path), so callers can tell whether a
    /// resolution pass actually added anything.
    fn upsert_virtual_file(&self, path: &str, content: &str) -> bool;
}

/// Host that collects virtual files in memory.
///
/// Suitable as a staging area for embedders that flush files into their
/// type checker themselves, and as a recording double in tests.
#[derive(Debug, Default)]
pub struct MemoryTypingsHost {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryTypingsHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content stored under a virtual path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// All stored virtual paths.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.read().unwrap().keys().cloned().collect()
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    /// True when no file has been injected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().unwrap().is_empty()
    }
}

impl TypingsHost for MemoryTypingsHost {
    fn upsert_virtual_file(&self, path: &str, content: &str) -> bool {
        let mut files = self.files.write().unwrap();
        match files.get(path) {
            Some(existing) if existing == content => false,
            _ => {
                files.insert(path.to_string(), content.to_string());
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_reports_new_content() {
        let host = MemoryTypingsHost::new();
        assert!(host.upsert_virtual_file("a.d.ts", "one"));
        assert!(!host.upsert_virtual_file("a.d.ts", "one"));
        assert!(host.upsert_virtual_file("a.d.ts", "two"));
        assert_eq!(host.file("a.d.ts").as_deref(), Some("two"));
    }
}
