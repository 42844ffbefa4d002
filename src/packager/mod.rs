//! Module Loadable Package assembly.
//!
//! Turns a module source tree into `releases/sugarcrm-{id}-{version}.zip`
//! holding every included file plus a generated `manifest.php`.
//!
//! # Module Organization
//!
//! - [`classifier`] - Which paths belong in a package
//! - [`scanner`] - Source tree traversal and classification
//! - [`archive`] - Release archive lifecycle
//! - [`manifest`] - `$manifest` / `$installdefs` generation and loading
//! - [`builder`] - [`Packager`] orchestrator
//! - [`settings`] - [`PackagerSettings`] and its builder
//! - [`progress`] - Build event reporting

pub mod archive;
pub mod builder;
pub mod classifier;
pub mod error;
pub mod manifest;
pub mod progress;
pub mod scanner;
pub mod settings;
pub mod utils;

pub use archive::{MANIFEST_ENTRY_NAME, PackageArchive};
pub use builder::{PackageArtifact, PackageRequest, Packager, calculate_sha256};
pub use classifier::PathClassifier;
pub use error::{Error, Result};
pub use manifest::{
    CopyInstruction, DescriptorMap, DescriptorValue, InstallDescriptor, ManifestBuilder,
    ManifestDocument,
};
pub use progress::{LogProgress, PackageProgress};
pub use scanner::{ClassificationResult, FileEntry, TreeScanner};
pub use settings::{Compression, PackagerSettings, SettingsBuilder};
