//! The import resolution engine.

use super::budget::RecursionBudget;
use crate::error::Error;
use crate::host::TypingsHost;
use crate::imports::{DependencyContext, DependencyParser, ImportResourcePath};
use crate::options::Options;
use crate::paths;
use crate::progress::{self, Update};
use futures::future::BoxFuture;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace};

/// The package.json fields that locate a package's entry declaration file.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
}

/// Walks a file's dependency graph and feeds resolved declaration content
/// into the type-checking host.
///
/// One resolution pass is a single call to [`resolve_imports_in_file`];
/// within a pass, every canonical key is resolved at most once. Fetches are
/// awaited strictly sequentially: a dependency's whole subtree resolves
/// before the next sibling begins.
///
/// [`resolve_imports_in_file`]: ImportResolver::resolve_imports_in_file
pub struct ImportResolver {
    options: Arc<Options>,
    host: Arc<dyn TypingsHost>,
    parser: DependencyParser,
    versions: RwLock<HashMap<String, String>>,
    resolved_keys: Mutex<HashSet<String>>,
    new_imports_resolved: AtomicBool,
}

impl ImportResolver {
    #[must_use]
    pub fn new(options: Arc<Options>, host: Arc<dyn TypingsHost>) -> Self {
        let versions = RwLock::new(options.versions.clone());
        Self {
            options,
            host,
            parser: DependencyParser::new(),
            versions,
            resolved_keys: Mutex::new(HashSet::new()),
            new_imports_resolved: AtomicBool::new(false),
        }
    }

    /// Replace the pinned-version map.
    ///
    /// Pins are passed to the registry as-is; tags and ranges are allowed,
    /// non-semver pins are only noted at debug level.
    pub fn set_versions(&self, versions: HashMap<String, String>) {
        for (package_name, version) in &versions {
            if semver::Version::parse(version).is_err() {
                debug!(
                    package = %package_name,
                    version = %version,
                    "Version pin is not plain semver; passing through to the registry"
                );
            }
        }
        *self.versions.write().unwrap() = versions;
    }

    /// Whether the latest pass added content to the host.
    #[must_use]
    pub fn were_new_imports_resolved(&self) -> bool {
        self.new_imports_resolved.load(Ordering::Relaxed)
    }

    /// Clear the new-content flag.
    pub fn reset_new_imports_resolved(&self) {
        self.new_imports_resolved.store(false, Ordering::Relaxed);
    }

    /// Run one resolution pass over `source`.
    ///
    /// Resolves every extracted dependency depth-first through
    /// cache-or-fetch, injects declaration content into the host, and
    /// recurses into fetched content while `budget` lasts. Fetch failures
    /// propagate to the caller; budget exhaustion and lookup misses end
    /// branches silently.
    pub async fn resolve_imports_in_file(
        &self,
        source: &str,
        parent: &DependencyContext,
        budget: RecursionBudget,
    ) -> Result<(), Error> {
        // Pass-scoped state starts fresh: the dedup set and the new-content
        // flag both describe this pass only.
        self.resolved_keys.lock().unwrap().clear();
        self.new_imports_resolved.store(false, Ordering::Relaxed);
        self.resolve_file(source, parent, budget).await
    }

    /// Resolve every dependency of one file, in parser output order.
    async fn resolve_file(
        &self,
        source: &str,
        parent: &DependencyContext,
        budget: RecursionBudget,
    ) -> Result<(), Error> {
        if budget.is_exhausted() {
            trace!("Recursion budget exhausted; not expanding this branch");
            return Ok(());
        }

        let dependencies = self.parser.parse_dependencies(source, parent)?;
        for dependency in dependencies {
            self.resolve_import(dependency, budget).await?;
        }
        Ok(())
    }

    /// Resolve one dependency. Returns whether it yielded declaration
    /// content (previously or now); a miss on every lookup is `false`.
    fn resolve_import(
        &self,
        resource: ImportResourcePath,
        budget: RecursionBudget,
    ) -> BoxFuture<'_, Result<bool, Error>> {
        Box::pin(async move {
            let key = self.canonical_key(&resource);
            if !self.resolved_keys.lock().unwrap().insert(key) {
                trace!(kind = resource.kind(), "Already resolved in this pass");
                return Ok(true);
            }

            match resource {
                ImportResourcePath::Package {
                    package_name,
                    import_path,
                } => self.resolve_package(&package_name, &import_path, budget).await,
                ImportResourcePath::Relative { import_path, .. } => {
                    // Root-relative files live in the editing surface itself;
                    // there is nothing to fetch from a registry.
                    debug!(import = %import_path, "Skipping root-relative import");
                    Ok(false)
                }
                ImportResourcePath::RelativeInPackage {
                    package_name,
                    source_path,
                    import_path,
                } => {
                    self.resolve_in_package(&package_name, &source_path, &import_path, budget)
                        .await
                }
            }
        })
    }

    /// Resolve a package dependency: fetch its manifest, locate the entry
    /// declaration, and descend across the package boundary.
    async fn resolve_package(
        &self,
        package_name: &str,
        import_path: &str,
        budget: RecursionBudget,
    ) -> Result<bool, Error> {
        let version = self.version_for(package_name);
        if self.options.only_specified_packages && version.is_none() {
            debug!(package = %package_name, "Skipping package without a pinned version");
            return Ok(false);
        }

        let definitely_typed = package_name.starts_with("@types/");

        let Some(manifest_source) = self
            .load_file(package_name, version.as_deref(), "package.json")
            .await?
        else {
            progress::emit(
                &self.options,
                Update::PackageLookedUp {
                    package_name: package_name.to_string(),
                    definitely_typed,
                    success: false,
                },
            );
            if definitely_typed {
                return Ok(false);
            }
            // The package may still be typed through the DefinitelyTyped
            // mirror.
            return self
                .resolve_import(
                    ImportResourcePath::Package {
                        package_name: definitely_typed_name(package_name),
                        import_path: import_path.to_string(),
                    },
                    budget,
                )
                .await;
        };

        self.inject(package_name, "package.json", &manifest_source);
        let manifest: PackageManifest =
            serde_json::from_str(&manifest_source).map_err(|source| Error::Manifest {
                package_name: package_name.to_string(),
                source,
            })?;
        progress::emit(
            &self.options,
            Update::PackageLookedUp {
                package_name: package_name.to_string(),
                definitely_typed,
                success: true,
            },
        );

        let entry = manifest
            .types
            .or(manifest.typings)
            .map(|entry| paths::normalize(&entry));
        let crossed = budget.step_package();

        if import_path.is_empty() {
            if let Some(entry) = entry {
                return self
                    .resolve_import(package_relative(package_name, entry), crossed)
                    .await;
            }
            let found = self
                .resolve_import(
                    package_relative(package_name, "index.d.ts".to_string()),
                    crossed,
                )
                .await?;
            if found || definitely_typed {
                return Ok(found);
            }
            // No declared entry and no index.d.ts; last resort is the
            // DefinitelyTyped mirror.
            return self
                .resolve_import(
                    ImportResourcePath::Package {
                        package_name: definitely_typed_name(package_name),
                        import_path: String::new(),
                    },
                    budget,
                )
                .await;
        }

        if self.options.preload_packages {
            let entry = entry.unwrap_or_else(|| "index.d.ts".to_string());
            self.resolve_import(package_relative(package_name, entry), crossed)
                .await?;
        }
        self.resolve_import(
            package_relative(package_name, import_path.to_string()),
            crossed,
        )
        .await
    }

    /// Resolve a file inside a package's declaration tree, probing the
    /// exact path, then `.d.ts`, then `/index.d.ts`. The first hit is
    /// injected and expanded.
    async fn resolve_in_package(
        &self,
        package_name: &str,
        source_path: &str,
        import_path: &str,
        budget: RecursionBudget,
    ) -> Result<bool, Error> {
        let version = self.version_for(package_name);
        let base = lookup_base(source_path, import_path);

        for candidate in candidate_paths(&base) {
            let Some(content) = self
                .load_file(package_name, version.as_deref(), &candidate)
                .await?
            else {
                continue;
            };

            progress::emit(
                &self.options,
                Update::FileLookedUp {
                    path: format!("{package_name}/{candidate}"),
                    success: true,
                },
            );
            self.inject(package_name, &candidate, &content);

            // The fetched file becomes the parent of its own imports; its
            // full in-package path seeds the next round of classification.
            let parent = DependencyContext::Resolved(ImportResourcePath::RelativeInPackage {
                package_name: package_name.to_string(),
                source_path: String::new(),
                import_path: candidate,
            });
            self.resolve_file(&content, &parent, budget.step_file()).await?;
            return Ok(true);
        }

        debug!(package = %package_name, path = %base, "No declaration file found");
        progress::emit(
            &self.options,
            Update::FileLookedUp {
                path: format!("{package_name}/{base}"),
                success: false,
            },
        );
        Ok(false)
    }

    /// Cache-or-fetch one package file.
    async fn load_file(
        &self,
        package_name: &str,
        version: Option<&str>,
        file_path: &str,
    ) -> Result<Option<String>, Error> {
        let key = cache_key(package_name, version, file_path);

        if let Some(content) = self.options.source_cache.get(&key) {
            trace!(key = %key, "Serving from source cache");
            progress::emit(&self.options, Update::LoadedFromCache { key });
            return Ok(Some(content));
        }

        match self
            .options
            .source_resolver
            .resolve_source_file(package_name, version, file_path)
            .await?
        {
            Some(content) => {
                self.options.source_cache.set(&key, &content);
                progress::emit(&self.options, Update::StoredToCache { key });
                Ok(Some(content))
            }
            None => Ok(None),
        }
    }

    /// Inject declaration content into the host under its virtual path.
    fn inject(&self, package_name: &str, file_path: &str, content: &str) {
        let mount = paths::join(&format!("node_modules/{package_name}"), file_path);
        let virtual_path = format!("{}{mount}", self.options.file_root_path);
        if self.host.upsert_virtual_file(&virtual_path, content) {
            debug!(path = %virtual_path, "Injected declaration file");
            self.new_imports_resolved.store(true, Ordering::Relaxed);
        }
    }

    /// Canonical dedup key for a dependency.
    fn canonical_key(&self, resource: &ImportResourcePath) -> String {
        match resource {
            ImportResourcePath::Package {
                package_name,
                import_path,
            } => cache_key(
                package_name,
                self.version_for(package_name).as_deref(),
                import_path,
            ),
            ImportResourcePath::Relative {
                source_path,
                import_path,
            } => paths::join(source_path, import_path),
            ImportResourcePath::RelativeInPackage {
                package_name,
                source_path,
                import_path,
            } => format!("{package_name}/{}", lookup_base(source_path, import_path)),
        }
    }

    fn version_for(&self, package_name: &str) -> Option<String> {
        self.versions.read().unwrap().get(package_name).cloned()
    }
}

/// Cache key: `<name>/<file>[@<version>]`.
fn cache_key(package_name: &str, version: Option<&str>, file_path: &str) -> String {
    match version {
        Some(version) => format!("{package_name}/{file_path}@{version}"),
        None => format!("{package_name}/{file_path}"),
    }
}

/// The package-relative path a resource actually refers to: the specifier
/// resolved against the directory of the file that contained it.
fn lookup_base(source_path: &str, import_path: &str) -> String {
    if source_path.is_empty() {
        paths::normalize(import_path)
    } else {
        paths::join(source_path, &format!("../{import_path}"))
    }
}

/// Probe candidates for a package-relative path. Paths that already carry a
/// declaration-ish extension are looked up verbatim.
fn candidate_paths(base: &str) -> Vec<String> {
    if base.ends_with(".d.ts") || base.ends_with(".ts") || base.ends_with(".json") {
        vec![base.to_string()]
    } else {
        vec![
            base.to_string(),
            format!("{base}.d.ts"),
            format!("{base}/index.d.ts"),
        ]
    }
}

fn package_relative(package_name: &str, import_path: String) -> ImportResourcePath {
    ImportResourcePath::RelativeInPackage {
        package_name: package_name.to_string(),
        source_path: String::new(),
        import_path,
    }
}

/// DefinitelyTyped mirror name: `foo` → `@types/foo`, `@scope/name` →
/// `@types/scope__name`.
fn definitely_typed_name(package_name: &str) -> String {
    match package_name.strip_prefix('@') {
        Some(scoped) => format!("@types/{}", scoped.replace('/', "__")),
        None => format!("@types/{package_name}"),
    }
}
