//! Progress reporting for package builds.
//!
//! The pipeline announces what it does through [`PackageProgress`]; the CLI
//! prints those events, library callers can collect or ignore them.

use super::scanner::FileEntry;
use std::path::Path;

/// Receives events from a package build.
///
/// Every method has an empty default so implementors pick what they need.
pub trait PackageProgress: Send + Sync {
    /// The archive file was created.
    fn archive_created(&self, _path: &Path) {}

    /// An included file is about to be written.
    fn file_added(&self, _entry: &FileEntry) {}

    /// The archive was sealed.
    fn archive_sealed(&self, _path: &Path) {}

    /// Files left out of the package, in discovery order. Not called when
    /// nothing was excluded.
    fn files_excluded(&self, _entries: &[FileEntry]) {}
}

/// Reports through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl PackageProgress for LogProgress {
    fn archive_created(&self, path: &Path) {
        log::info!("Creating {} ...", path.display());
    }

    fn file_added(&self, entry: &FileEntry) {
        log::info!(" [*] {}", entry.relative_path());
    }

    fn archive_sealed(&self, path: &Path) {
        let name = path.file_name().unwrap_or(path.as_os_str());
        log::info!("Done creating {}", name.to_string_lossy());
    }

    fn files_excluded(&self, entries: &[FileEntry]) {
        log::info!("The following files were excluded from the zip:");
        for entry in entries {
            log::info!(" [*] {}", entry.relative_path());
        }
    }
}
