//! The resource path model: how to find one imported module's declarations.

/// How the declaration content for one import specifier is looked up.
///
/// A closed set of variants; exactly one applies to any specifier. Values
/// are immutable, created per parse and consumed once by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportResourcePath {
    /// A bare or scoped specifier naming an installable package.
    ///
    /// `package_name` is never empty; a scoped name always carries its
    /// `@scope/` prefix joined with the first path segment. `import_path`
    /// is the sub-path requested within the package, possibly empty.
    Package {
        package_name: String,
        import_path: String,
    },

    /// A `.`-relative specifier resolved against a known directory, outside
    /// any package context.
    Relative {
        import_path: String,
        source_path: String,
    },

    /// A relative specifier encountered inside a resolved package's
    /// declaration tree. `source_path` is the path of the file that
    /// contained the specifier, `import_path` the specifier itself.
    RelativeInPackage {
        package_name: String,
        source_path: String,
        import_path: String,
    },
}

impl ImportResourcePath {
    /// Short name of the active variant, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Package { .. } => "package",
            Self::Relative { .. } => "relative",
            Self::RelativeInPackage { .. } => "relative-in-package",
        }
    }
}

/// The resolution context a specifier is classified against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyContext {
    /// A top-level file, identified only by its directory. No package
    /// context exists yet.
    Root(String),

    /// A resolved resource whose fetched content is being expanded.
    Resolved(ImportResourcePath),
}
