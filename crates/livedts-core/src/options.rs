//! Resolution options.

use crate::cache::{NoopSourceCache, SourceCache};
use crate::fetch::{SourceResolver, UnpkgSourceResolver};
use crate::progress::Update;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked with a pass failure message when configured; makes
/// fetch failures non-fatal to the session.
pub type ErrorHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback observing resolution progress.
pub type UpdateHandler = Arc<dyn Fn(&Update) + Send + Sync>;

/// Configuration for import resolution and the session binding.
#[derive(Clone)]
pub struct Options {
    /// Root the virtual file tree is anchored under. Virtual paths are
    /// `<file_root_path>node_modules/<package>/<file>`.
    pub file_root_path: String,

    /// Resolve only packages present in the versions map; others are
    /// skipped, not errors.
    pub only_specified_packages: bool,

    /// Eagerly resolve a package's entry declaration surface in addition to
    /// the specifically imported sub-path.
    pub preload_packages: bool,

    /// Quiet window between an edit and the pass it triggers. Zero resolves
    /// immediately.
    pub debounce_duration: Duration,

    /// Same-package recursion bound.
    pub file_recursion_depth: u32,

    /// Cross-package recursion bound.
    pub package_recursion_depth: u32,

    /// Pinned package versions, package name to version ref.
    pub versions: HashMap<String, String>,

    /// Memoizes fetched content across passes (and sessions, when shared).
    pub source_cache: Arc<dyn SourceCache>,

    /// Performs registry lookups.
    pub source_resolver: Arc<dyn SourceResolver>,

    /// Receives pass failure messages; absent means failures surface to the
    /// caller of the pass.
    pub on_error: Option<ErrorHandler>,

    /// Observes resolution progress.
    pub on_update: Option<UpdateHandler>,
}

impl Options {
    /// Options with the stock unpkg resolver and no cache.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, crate::error::Error> {
        Ok(Self::with_resolver(Arc::new(UnpkgSourceResolver::from_env()?)))
    }

    /// Options around a specific resolver, with defaults for the rest.
    #[must_use]
    pub fn with_resolver(source_resolver: Arc<dyn SourceResolver>) -> Self {
        Self {
            file_root_path: "inmemory://model/".to_string(),
            only_specified_packages: false,
            preload_packages: false,
            debounce_duration: Duration::from_secs(4),
            file_recursion_depth: 10,
            package_recursion_depth: 3,
            versions: HashMap::new(),
            source_cache: Arc::new(NoopSourceCache::new()),
            source_resolver,
            on_error: None,
            on_update: None,
        }
    }

    /// Set the virtual file root.
    #[must_use]
    pub fn with_file_root_path(mut self, file_root_path: impl Into<String>) -> Self {
        self.file_root_path = file_root_path.into();
        self
    }

    /// Restrict resolution to packages with pinned versions.
    #[must_use]
    pub fn with_only_specified_packages(mut self, only: bool) -> Self {
        self.only_specified_packages = only;
        self
    }

    /// Eagerly resolve package entry surfaces.
    #[must_use]
    pub fn with_preload_packages(mut self, preload: bool) -> Self {
        self.preload_packages = preload;
        self
    }

    /// Set the edit-coalescing window.
    #[must_use]
    pub fn with_debounce_duration(mut self, duration: Duration) -> Self {
        self.debounce_duration = duration;
        self
    }

    /// Set the same-package recursion bound.
    #[must_use]
    pub fn with_file_recursion_depth(mut self, depth: u32) -> Self {
        self.file_recursion_depth = depth;
        self
    }

    /// Set the cross-package recursion bound.
    #[must_use]
    pub fn with_package_recursion_depth(mut self, depth: u32) -> Self {
        self.package_recursion_depth = depth;
        self
    }

    /// Pin package versions.
    #[must_use]
    pub fn with_versions(mut self, versions: HashMap<String, String>) -> Self {
        self.versions = versions;
        self
    }

    /// Set the source cache.
    #[must_use]
    pub fn with_source_cache(mut self, cache: Arc<dyn SourceCache>) -> Self {
        self.source_cache = cache;
        self
    }

    /// Set the error callback.
    #[must_use]
    pub fn with_on_error(mut self, on_error: ErrorHandler) -> Self {
        self.on_error = Some(on_error);
        self
    }

    /// Set the progress observer.
    #[must_use]
    pub fn with_on_update(mut self, on_update: UpdateHandler) -> Self {
        self.on_update = Some(on_update);
        self
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("file_root_path", &self.file_root_path)
            .field("only_specified_packages", &self.only_specified_packages)
            .field("preload_packages", &self.preload_packages)
            .field("debounce_duration", &self.debounce_duration)
            .field("file_recursion_depth", &self.file_recursion_depth)
            .field("package_recursion_depth", &self.package_recursion_depth)
            .field("versions", &self.versions)
            .field("on_error", &self.on_error.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::new().unwrap();
        assert_eq!(options.file_root_path, "inmemory://model/");
        assert!(!options.only_specified_packages);
        assert!(!options.preload_packages);
        assert_eq!(options.debounce_duration, Duration::from_secs(4));
        assert_eq!(options.file_recursion_depth, 10);
        assert_eq!(options.package_recursion_depth, 3);
        assert!(options.versions.is_empty());
        assert!(options.on_error.is_none());
    }

    #[test]
    fn test_builder() {
        let options = Options::new()
            .unwrap()
            .with_only_specified_packages(true)
            .with_preload_packages(true)
            .with_file_recursion_depth(4)
            .with_package_recursion_depth(2)
            .with_debounce_duration(Duration::ZERO);

        assert!(options.only_specified_packages);
        assert!(options.preload_packages);
        assert_eq!(options.file_recursion_depth, 4);
        assert_eq!(options.package_recursion_depth, 2);
        assert_eq!(options.debounce_duration, Duration::ZERO);
    }
}
