//! Import discovery for JavaScript/TypeScript source text.
//!
//! Extracts import-like specifiers and classifies each into an
//! [`ImportResourcePath`] describing how its declaration content is found.

mod parser;
mod resource;
mod scan;

pub use parser::DependencyParser;
pub use resource::{DependencyContext, ImportResourcePath};
