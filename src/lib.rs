//! SugarCRM Module Loadable Package builder
//!
//! Zips a module source tree into `releases/sugarcrm-{id}-{version}.zip`,
//! skipping `Ext/` build output, and generates the `manifest.php` installer
//! descriptor with one copy instruction per packaged file.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod packager;

// Re-export commonly used types
pub use config::PackageConfig;
pub use error::{CliError, PackagerError, Result};
pub use packager::{PackageArtifact, PackageRequest, Packager, SettingsBuilder};
