//! Specifier extraction.
//!
//! Three independent textual scans over the whole source, one per syntactic
//! shape: static `import … from`, dynamic `await import(…)`, and CommonJS
//! `require(…)`. Results are concatenated scan by scan, so output order
//! reflects scan order, not source order, when shapes are mixed. That
//! ordering is a documented property of the scanner, relied on by callers
//! that resolve dependencies in list order.

use regex_lite::Regex;

const STATIC_IMPORT: &str = r#"import .+ from ?['"](.+?)['"]"#;
const DYNAMIC_IMPORT: &str = r#"await import ?\(['"](.+?)['"]\)"#;
const CJS_REQUIRE: &str = r#"require ?\(['"](.+?)['"]\)"#;

/// Extract raw import specifiers from source text.
///
/// Source with no recognizable specifier yields an empty list.
#[must_use]
pub(crate) fn scan_specifiers(source: &str) -> Vec<String> {
    let mut specifiers = Vec::new();
    for pattern in [STATIC_IMPORT, DYNAMIC_IMPORT, CJS_REQUIRE] {
        if let Ok(shape) = Regex::new(pattern) {
            for captures in shape.captures_iter(source) {
                if let Some(specifier) = captures.get(1) {
                    specifiers.push(specifier.as_str().to_string());
                }
            }
        }
    }
    specifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_import() {
        let source = r#"import { foo } from "./dep";"#;
        assert_eq!(scan_specifiers(source), vec!["./dep"]);
    }

    #[test]
    fn test_static_import_single_quotes() {
        let source = "import foo from './single-quoted';";
        assert_eq!(scan_specifiers(source), vec!["./single-quoted"]);
    }

    #[test]
    fn test_dynamic_import() {
        let source = r#"const mod = await import("./dynamic");"#;
        assert_eq!(scan_specifiers(source), vec!["./dynamic"]);
    }

    #[test]
    fn test_cjs_require() {
        let source = r#"const dep = require("./dep");"#;
        assert_eq!(scan_specifiers(source), vec!["./dep"]);
    }

    #[test]
    fn test_scan_order_not_source_order() {
        // require appears first in the source but last in the output: each
        // shape is scanned independently and results are concatenated.
        let source = r#"
const a = require("./required");
import b from "./imported";
const c = await import("./deferred");
"#;
        assert_eq!(
            scan_specifiers(source),
            vec!["./imported", "./deferred", "./required"]
        );
    }

    #[test]
    fn test_multiple_static_imports_keep_source_order() {
        let source = r#"
import a from "./a";
import b from "./b";
import c from "./c";
"#;
        assert_eq!(scan_specifiers(source), vec!["./a", "./b", "./c"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        // Dedup happens downstream via canonical keys, not here.
        let source = r#"
import a from "./dep";
import b from "./dep";
"#;
        assert_eq!(scan_specifiers(source), vec!["./dep", "./dep"]);
    }

    #[test]
    fn test_bare_and_scoped_specifiers() {
        let source = r#"
import React from "react";
import test from "@scope/package/sub";
"#;
        assert_eq!(scan_specifiers(source), vec!["react", "@scope/package/sub"]);
    }

    #[test]
    fn test_empty_source() {
        assert!(scan_specifiers("").is_empty());
    }

    #[test]
    fn test_no_imports() {
        assert!(scan_specifiers("console.log('hello');").is_empty());
    }
}
