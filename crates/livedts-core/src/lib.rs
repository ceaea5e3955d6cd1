#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod cache;
pub mod error;
pub mod fetch;
pub mod host;
pub mod imports;
pub mod options;
pub mod paths;
pub mod progress;
pub mod resolver;
pub mod version;

pub use cache::{
    CacheRegistry, DiskSourceCache, MemorySourceCache, NoopSourceCache, SourceCache,
};
pub use error::Error;
pub use fetch::{SourceResolver, UnpkgSourceResolver, UNPKG_BASE_URL, UNPKG_ENV};
pub use host::{MemoryTypingsHost, TypingsHost};
pub use imports::{DependencyContext, DependencyParser, ImportResourcePath};
pub use options::{ErrorHandler, Options, UpdateHandler};
pub use progress::Update;
pub use resolver::{ImportResolver, RecursionBudget};
pub use version::VERSION;
