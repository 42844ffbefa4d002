//! Core settings struct.

use std::path::{Path, PathBuf};

/// Default directory (under the working directory) that receives artifacts.
pub const DEFAULT_RELEASES_DIR: &str = "releases";

/// Default name of the file holding the package version.
pub const DEFAULT_VERSION_FILE: &str = "version";

/// Compression applied to archive entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Deflate, readable by every zip implementation.
    #[default]
    Deflated,
    /// No compression.
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Settings shared by every stage of a packaging run.
///
/// # Examples
///
/// ```no_run
/// use sugar_mlp_packager::packager::SettingsBuilder;
///
/// # fn example() -> sugar_mlp_packager::packager::Result<()> {
/// let settings = SettingsBuilder::new()
///     .work_dir("/srv/build/professorm")
///     .command_name("pack")
///     .build()?;
/// assert!(settings.releases_dir().ends_with("releases"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PackagerSettings {
    pub(super) work_dir: PathBuf,
    pub(super) releases_dir: String,
    pub(super) version_file: String,
    pub(super) command_name: String,
    pub(super) compression: Compression,
}

impl PackagerSettings {
    /// Directory that source directories and the version file are resolved against.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Absolute directory artifacts are written to.
    pub fn releases_dir(&self) -> PathBuf {
        self.work_dir.join(&self.releases_dir)
    }

    /// Absolute path of the version file.
    pub fn version_file(&self) -> PathBuf {
        self.work_dir.join(&self.version_file)
    }

    /// Command name used in user-facing hints.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Entry compression.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// `sugarcrm-{package_id}-{version}.zip`
    pub fn artifact_file_name(package_id: &str, version: &str) -> String {
        format!("sugarcrm-{package_id}-{version}.zip")
    }

    /// Full path of the artifact for a package id and version.
    pub fn artifact_path(&self, package_id: &str, version: &str) -> PathBuf {
        self.releases_dir()
            .join(Self::artifact_file_name(package_id, version))
    }
}
