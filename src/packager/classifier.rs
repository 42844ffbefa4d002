//! Inclusion rules for files found in a module source tree.
//!
//! Two kinds of path are left out of a package:
//!
//! - `.../custom/application/Ext/...`
//! - `.../custom/modules/<anything>/Ext/...`
//!
//! These hold extension files the target instance rebuilds on install.
//! Matching is unanchored and case-sensitive; either slash style is accepted.

use regex::Regex;
use std::sync::LazyLock;

static APPLICATION_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"custom/application/Ext/").expect("static regex"));

static MODULE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"custom/modules/.+/Ext/").expect("static regex"));

/// Decides per root-relative path whether a file belongs in the package.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathClassifier;

impl PathClassifier {
    /// Creates a classifier with the built-in exclusion rules.
    pub fn new() -> Self {
        Self
    }

    /// Returns `false` for paths under an `Ext` customization directory.
    pub fn should_include(&self, relative_path: &str) -> bool {
        let path = normalize_separators(relative_path);
        !(APPLICATION_EXT.is_match(&path) || MODULE_EXT.is_match(&path))
    }
}

/// Rewrites backslashes to forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
