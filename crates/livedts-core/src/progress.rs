//! Resolution progress reporting.

use crate::options::Options;

/// Progress event delivered through [`Options::on_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// The surface reported an edit; a pass may be scheduled.
    CodeChanged,
    /// A resolution pass started.
    ResolvingImports,
    /// A package lookup finished. `definitely_typed` marks lookups that
    /// went through the `@types/` mirror.
    PackageLookedUp {
        package_name: String,
        definitely_typed: bool,
        success: bool,
    },
    /// A declaration file lookup finished.
    FileLookedUp { path: String, success: bool },
    /// Content was served from the source cache instead of the network.
    LoadedFromCache { key: String },
    /// Fetched content was stored into the source cache.
    StoredToCache { key: String },
}

/// Deliver an update to the configured observer, if any.
pub fn emit(options: &Options, update: Update) {
    if let Some(ref on_update) = options.on_update {
        on_update(&update);
    }
}
