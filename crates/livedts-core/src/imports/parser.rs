//! Specifier classification.

use super::resource::{DependencyContext, ImportResourcePath};
use super::scan::scan_specifiers;
use crate::error::Error;
use crate::paths;

/// Prefix marking a Node.js builtin module specifier.
const NODE_BUILTIN_PREFIX: &str = "node:";

/// Extracts import specifiers from source text and classifies each one
/// against its resolution context.
///
/// Pure: classification depends only on the specifier and the context.
#[derive(Debug, Default)]
pub struct DependencyParser;

impl DependencyParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract and classify every import-like specifier in `source`.
    ///
    /// Classification fails only for the internal-defect combination of a
    /// fully resolved `package` or `relative` parent; see
    /// [`Error::InvalidParentContext`].
    pub fn parse_dependencies(
        &self,
        source: &str,
        parent: &DependencyContext,
    ) -> Result<Vec<ImportResourcePath>, Error> {
        scan_specifiers(source)
            .iter()
            .map(|specifier| Self::resolve_path(specifier, parent))
            .collect()
    }

    /// Classify one specifier against its resolution context.
    fn resolve_path(
        specifier: &str,
        parent: &DependencyContext,
    ) -> Result<ImportResourcePath, Error> {
        // Builtins bypass package/relative logic entirely: their declarations
        // live as flat files inside @types/node.
        if let Some(builtin) = specifier.strip_prefix(NODE_BUILTIN_PREFIX) {
            return Ok(ImportResourcePath::RelativeInPackage {
                package_name: "@types/node".to_string(),
                source_path: String::new(),
                import_path: format!("{builtin}.d.ts"),
            });
        }

        match parent {
            DependencyContext::Root(directory) => {
                if specifier.starts_with('.') {
                    Ok(ImportResourcePath::Relative {
                        import_path: specifier.to_string(),
                        source_path: directory.clone(),
                    })
                } else {
                    Ok(Self::classify_package(specifier))
                }
            }
            DependencyContext::Resolved(ImportResourcePath::RelativeInPackage {
                package_name,
                source_path,
                import_path,
            }) => {
                if specifier.starts_with('.') {
                    // The new source path advances to the full prior file
                    // path: the parent's directory-plus-file composition.
                    Ok(ImportResourcePath::RelativeInPackage {
                        package_name: package_name.clone(),
                        source_path: paths::join(source_path, import_path),
                        import_path: specifier.to_string(),
                    })
                } else {
                    // A bare import found inside a package's declarations
                    // always starts a fresh top-level package resolution.
                    Ok(Self::classify_package(specifier))
                }
            }
            DependencyContext::Resolved(other) => Err(Error::InvalidParentContext {
                specifier: specifier.to_string(),
                parent_kind: other.kind(),
            }),
        }
    }

    /// Split a bare or scoped specifier into package name and sub-path.
    fn classify_package(specifier: &str) -> ImportResourcePath {
        let segments: Vec<&str> = specifier.split('/').collect();
        let name_segments = if specifier.starts_with('@') {
            2.min(segments.len())
        } else {
            1
        };
        ImportResourcePath::Package {
            package_name: segments[..name_segments].join("/"),
            import_path: segments[name_segments..].join("/"),
        }
    }
}
