//! Package definition file loading.
//!
//! A package definition names the package, its source directory and the two
//! descriptor arrays that end up in `manifest.php`:
//!
//! ```toml
//! package_id = "professorm"
//! source_directory = "src"
//!
//! [manifest]
//! name = "Professor M School"
//! author = "Professor M"
//! type = "module"
//! is_uninstallable = true
//! acceptable_sugar_versions = { regex_matches = ["^8\\..*$"] }
//!
//! [installdefs]
//! id = "ProfessorM"
//! ```
//!
//! Files ending in `.json` are read as JSON with the same layout.

use crate::error::{CliError, Result};
use crate::packager::{DescriptorMap, PackageRequest};
use anyhow::Context as _;
use serde::Deserialize;
use std::path::Path;

/// Package definition read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pack.toml";

/// Contents of a package definition file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Package identifier used in the artifact name
    pub package_id: Option<String>,

    /// Source directory relative to the working directory
    pub source_directory: Option<String>,

    /// `$manifest` metadata
    #[serde(default)]
    pub manifest: DescriptorMap,

    /// `$installdefs` base
    #[serde(default)]
    pub installdefs: DescriptorMap,
}

impl PackageConfig {
    /// Loads a TOML or JSON package definition, picked by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read package definition {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Loads `path` if it exists, otherwise returns an empty definition.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No package definition at {}", path.display());
            Ok(Self::default())
        }
    }

    /// Parses a TOML package definition.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parses a JSON package definition.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Combines the definition with command line values into a request.
    ///
    /// Command line values win over the file.
    pub fn into_request(
        self,
        version: Option<String>,
        package_id: Option<String>,
        source_directory: Option<String>,
    ) -> Result<PackageRequest> {
        let package_id = package_id.or(self.package_id).ok_or_else(|| {
            CliError::MissingArgument {
                argument: "package id (--package-id or package_id)".to_string(),
            }
        })?;
        let source_directory = source_directory.or(self.source_directory).ok_or_else(|| {
            CliError::MissingArgument {
                argument: "source directory (--source-dir or source_directory)".to_string(),
            }
        })?;

        Ok(PackageRequest {
            version: version.unwrap_or_default(),
            package_id,
            source_directory,
            manifest: self.manifest,
            installdefs: self.installdefs,
        })
    }
}
