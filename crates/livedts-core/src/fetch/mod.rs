//! Declaration content lookup.

mod unpkg;

pub use unpkg::{UnpkgSourceResolver, UNPKG_BASE_URL, UNPKG_ENV};

use crate::error::Error;
use futures::future::BoxFuture;

/// Performs the actual registry lookup for declaration files.
///
/// "Not found" is a first-class miss (`Ok(None)`), never an error; only
/// genuine transport or lookup failures surface as `Err`. Every call is a
/// suspension point and callers await them strictly sequentially.
pub trait SourceResolver: Send + Sync {
    /// Fetch one file of a package, optionally pinned to a version.
    fn resolve_source_file<'a>(
        &'a self,
        package_name: &'a str,
        version: Option<&'a str>,
        file_path: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, Error>>;
}
