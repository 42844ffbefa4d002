//! Builder for constructing PackagerSettings.

use super::core::{Compression, DEFAULT_RELEASES_DIR, DEFAULT_VERSION_FILE, PackagerSettings};
use crate::packager::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Builder for [`PackagerSettings`].
///
/// Every field is optional. The working directory falls back to the process
/// current directory, read once when [`build`](Self::build) runs.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    work_dir: Option<PathBuf>,
    releases_dir: Option<String>,
    version_file: Option<String>,
    command_name: Option<String>,
    compression: Compression,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the working directory.
    ///
    /// Default: the process current directory
    pub fn work_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.work_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory name artifacts are written to, relative to the working directory.
    ///
    /// Default: `releases`
    pub fn releases_dir(mut self, name: impl Into<String>) -> Self {
        self.releases_dir = Some(name.into());
        self
    }

    /// Sets the version file name, relative to the working directory.
    ///
    /// Default: `version`
    pub fn version_file(mut self, name: impl Into<String>) -> Self {
        self.version_file = Some(name.into());
        self
    }

    /// Sets the command name shown in the missing-version hint.
    ///
    /// Default: the package name
    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    /// Sets entry compression.
    ///
    /// Default: [`Compression::Deflated`]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Fails only when no working directory was set and the current
    /// directory cannot be read.
    pub fn build(self) -> Result<PackagerSettings> {
        let work_dir = match self.work_dir {
            Some(dir) => dir,
            None => std::env::current_dir().fs_context("reading current directory", ".")?,
        };

        Ok(PackagerSettings {
            work_dir,
            releases_dir: self
                .releases_dir
                .unwrap_or_else(|| DEFAULT_RELEASES_DIR.to_string()),
            version_file: self
                .version_file
                .unwrap_or_else(|| DEFAULT_VERSION_FILE.to_string()),
            command_name: self
                .command_name
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            compression: self.compression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let settings = SettingsBuilder::new().work_dir("/w").build().unwrap();
        assert_eq!(settings.work_dir(), Path::new("/w"));
        assert_eq!(settings.releases_dir(), PathBuf::from("/w/releases"));
        assert_eq!(settings.command_name(), "sugar_mlp_packager");
        assert_eq!(settings.compression(), Compression::Deflated);
    }

    #[test]
    fn overrides_apply() {
        let settings = SettingsBuilder::new()
            .work_dir("/w")
            .releases_dir("dist")
            .version_file("VERSION.txt")
            .command_name("pack")
            .compression(Compression::Stored)
            .build()
            .unwrap();
        assert_eq!(settings.releases_dir(), PathBuf::from("/w/dist"));
        assert_eq!(settings.version_file(), PathBuf::from("/w/VERSION.txt"));
        assert_eq!(settings.command_name(), "pack");
        assert_eq!(settings.compression(), Compression::Stored);
    }

    #[test]
    fn work_dir_defaults_to_current_dir() {
        let settings = SettingsBuilder::new().build().unwrap();
        assert_eq!(settings.work_dir(), std::env::current_dir().unwrap());
    }
}
