//! Release archive lifecycle.
//!
//! A [`PackageArchive`] is created empty, receives file entries and the
//! generated manifest, and is sealed with [`PackageArchive::close`]. Sealing
//! consumes the handle, so nothing can be written afterwards.
//!
//! An archive dropped before it was sealed is deleted from disk. A failed
//! build therefore leaves no half-written zip behind to block the retry.

use super::{
    error::{Context, Error, ErrorExt, Result},
    scanner::FileEntry,
    settings::PackagerSettings,
    utils::fs,
};
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use zip::{ZipWriter, write::SimpleFileOptions};

/// Entry name of the generated installer descriptor.
pub const MANIFEST_ENTRY_NAME: &str = "manifest.php";

/// Handle to a release archive that is still being written.
pub struct PackageArchive {
    path: PathBuf,
    writer: Option<ZipWriter<File>>,
    compression: zip::CompressionMethod,
    entries: usize,
}

impl std::fmt::Debug for PackageArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageArchive")
            .field("path", &self.path)
            .field("sealed", &self.writer.is_none())
            .field("entries", &self.entries)
            .finish()
    }
}

impl PackageArchive {
    /// Creates `<releases>/sugarcrm-{package_id}-{version}.zip`.
    ///
    /// The releases directory is created when missing. The archive file is
    /// opened with `create_new`, so an existing artifact is never touched.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingVersion`] if `version` is blank; nothing is written
    /// - [`Error::InvalidArtifactName`] if the id or version is not a plain name
    /// - [`Error::AlreadyExists`] if the artifact is already on disk
    pub fn open(settings: &PackagerSettings, version: &str, package_id: &str) -> Result<Self> {
        if version.trim().is_empty() {
            return Err(Error::MissingVersion {
                command: settings.command_name().to_string(),
            });
        }
        validate_name("version", version)?;
        validate_name("package id", package_id)?;

        fs::create_dir_all(&settings.releases_dir())?;

        let path = settings.artifact_path(package_id, version);
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyExists { path });
            }
            Err(e) => return Err(e).fs_context("creating archive", &path),
        };

        log::info!("Creating {}", path.display());

        Ok(Self {
            path,
            writer: Some(ZipWriter::new(file)),
            compression: settings.compression().method(),
            entries: 0,
        })
    }

    /// Path of the archive on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Stores the file at `entry.absolute_path()` under `entry.relative_path()`.
    pub fn add_file(&mut self, entry: &FileEntry) -> Result<()> {
        let mut source =
            File::open(entry.absolute_path()).fs_context("opening", entry.absolute_path())?;

        #[allow(unused_mut)]
        let mut options = self.entry_options();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = source
                .metadata()
                .fs_context("reading metadata of", entry.absolute_path())?
                .permissions()
                .mode();
            options = options.unix_permissions(mode);
        }

        let writer = self.writer_mut()?;
        writer.start_file(entry.relative_path(), options)?;
        io::copy(&mut source, writer).fs_context("archiving", entry.absolute_path())?;

        self.entries += 1;
        log::debug!("Added {}", entry.relative_path());
        Ok(())
    }

    /// Stores in-memory `content` under `entry_name`.
    pub fn add_content(&mut self, entry_name: &str, content: &[u8]) -> Result<()> {
        let options = self.entry_options();
        let path = self.path.clone();
        let writer = self.writer_mut()?;
        writer.start_file(entry_name, options)?;
        writer
            .write_all(content)
            .fs_context("writing generated entry to", &path)?;

        self.entries += 1;
        log::debug!("Added generated entry {entry_name} ({} bytes)", content.len());
        Ok(())
    }

    /// Writes the central directory and seals the archive.
    ///
    /// Returns the artifact path. On failure the incomplete file is removed.
    pub fn close(mut self) -> Result<PathBuf> {
        let writer = self.writer.take().context("archive is already sealed")?;

        let sealed = writer
            .finish()
            .map_err(Error::from)
            .and_then(|file| file.sync_all().fs_context("flushing archive", &self.path));

        if let Err(e) = sealed {
            discard(&self.path);
            return Err(e);
        }

        log::info!(
            "Sealed {} with {} entries",
            self.path.display(),
            self.entries
        );
        Ok(self.path.clone())
    }

    fn entry_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(self.compression)
    }

    fn writer_mut(&mut self) -> Result<&mut ZipWriter<File>> {
        self.writer.as_mut().context("archive is already sealed")
    }
}

impl Drop for PackageArchive {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            drop(writer);
            log::warn!("Removing incomplete archive {}", self.path.display());
            discard(&self.path);
        }
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log::warn!("Could not remove incomplete archive: {e}");
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "it must not be empty"
    } else if value.contains(['/', '\\']) {
        "it must not contain path separators"
    } else if value == "." || value == ".." {
        "it must not be a relative directory name"
    } else {
        return Ok(());
    };
    Err(Error::InvalidArtifactName {
        field,
        value: value.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::settings::SettingsBuilder;
    use std::io::Read;

    fn settings(dir: &Path) -> PackagerSettings {
        SettingsBuilder::new()
            .work_dir(dir)
            .command_name("pack")
            .build()
            .unwrap()
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn writes_files_and_generated_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("m/sub")).unwrap();
        std::fs::write(dir.path().join("m/sub/a.php"), b"<?php echo 1;").unwrap();

        let settings = settings(dir.path());
        let mut archive = PackageArchive::open(&settings, "1.0", "test").unwrap();
        archive
            .add_file(&FileEntry::new(dir.path().join("m/sub/a.php"), "m/sub/a.php"))
            .unwrap();
        archive
            .add_content(MANIFEST_ENTRY_NAME, b"<?php\n$manifest = array (\n);\n")
            .unwrap();
        assert_eq!(archive.entry_count(), 2);
        let path = archive.close().unwrap();

        assert_eq!(path, dir.path().join("releases/sugarcrm-test-1.0.zip"));
        assert_eq!(entry_names(&path), vec!["m/sub/a.php", "manifest.php"]);

        let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut body = String::new();
        zip.by_name("m/sub/a.php")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "<?php echo 1;");
    }

    #[test]
    fn second_open_fails_and_leaves_first_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        let mut first = PackageArchive::open(&settings, "1.0", "test").unwrap();
        first.add_content(MANIFEST_ENTRY_NAME, b"first").unwrap();
        let path = first.close().unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = PackageArchive::open(&settings, "1.0", "test").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { path: ref p } if p == &path));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn blank_version_fails_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        for version in ["", "   "] {
            let err = PackageArchive::open(&settings, version, "test").unwrap_err();
            assert!(matches!(err, Error::MissingVersion { ref command } if command == "pack"));
        }
        assert!(!dir.path().join("releases").exists());
    }

    #[test]
    fn rejects_names_that_escape_releases_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        for (version, id) in [("1.0", "../x"), ("1/0", "test"), ("1.0", ""), ("1.0", "..")] {
            let err = PackageArchive::open(&settings, version, id).unwrap_err();
            assert!(matches!(err, Error::InvalidArtifactName { .. }), "{version} {id}");
        }
    }

    #[test]
    fn dropping_unsealed_archive_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        let mut archive = PackageArchive::open(&settings, "2.0", "test").unwrap();
        archive.add_content("partial.txt", b"x").unwrap();
        let path = archive.path().to_path_buf();
        assert!(path.exists());
        drop(archive);
        assert!(!path.exists());

        // The same version can be built again afterwards.
        let archive = PackageArchive::open(&settings, "2.0", "test").unwrap();
        archive.close().unwrap();
    }

    #[test]
    fn missing_source_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        let mut archive = PackageArchive::open(&settings, "1.0", "test").unwrap();
        let err = archive
            .add_file(&FileEntry::new(dir.path().join("gone.php"), "m/gone.php"))
            .unwrap_err();
        assert!(matches!(err, Error::Fs { action: "opening", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn keeps_unix_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("run.sh");
        std::fs::write(&script, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let settings = settings(dir.path());
        let mut archive = PackageArchive::open(&settings, "1.0", "perm").unwrap();
        archive.add_file(&FileEntry::new(&script, "m/run.sh")).unwrap();
        let path = archive.close().unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mode = zip.by_name("m/run.sh").unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o777, 0o755);
    }
}
