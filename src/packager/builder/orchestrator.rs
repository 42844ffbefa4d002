//! Main package orchestration.

use super::checksum::calculate_sha256;
use crate::packager::{
    archive::{MANIFEST_ENTRY_NAME, PackageArchive},
    error::{Error, ErrorExt, Result},
    manifest::{DescriptorMap, InstallDescriptor, ManifestBuilder},
    progress::{LogProgress, PackageProgress},
    scanner::{ClassificationResult, FileEntry, TreeScanner},
    settings::PackagerSettings,
    utils::fs,
};
use std::{path::PathBuf, sync::Arc};

/// What to package.
#[derive(Debug, Clone, Default)]
pub struct PackageRequest {
    /// Version; when blank the version file is consulted
    pub version: String,
    /// Package identifier used in the artifact name
    pub package_id: String,
    /// Source directory, relative to the working directory
    pub source_directory: String,
    /// `$manifest` metadata, passed through unmodified
    pub manifest: DescriptorMap,
    /// `$installdefs` base; copy instructions are appended to it
    pub installdefs: DescriptorMap,
}

/// A sealed package on disk.
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    /// Archive location
    pub path: PathBuf,
    /// `sugarcrm-{package_id}-{version}.zip`
    pub file_name: String,
    /// Package identifier
    pub package_id: String,
    /// Resolved version
    pub version: String,
    /// Archive size in bytes
    pub size: u64,
    /// Hex SHA-256 of the archive
    pub checksum: String,
    /// Files written to the archive, in archive order
    pub included: Vec<FileEntry>,
    /// Files left out by the exclusion rules
    pub excluded: Vec<FileEntry>,
}

/// Builds release archives.
///
/// Each [`assemble`](Self::assemble) call owns its archive and file lists;
/// nothing is shared between calls.
pub struct Packager {
    settings: PackagerSettings,
    progress: Arc<dyn PackageProgress>,
}

impl std::fmt::Debug for Packager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packager")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Packager {
    /// Creates a packager that reports progress through `log`.
    pub fn new(settings: PackagerSettings) -> Self {
        Self {
            settings,
            progress: Arc::new(LogProgress),
        }
    }

    /// Replaces the progress reporter.
    pub fn with_progress(mut self, progress: Arc<dyn PackageProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns a reference to the packager settings.
    pub fn settings(&self) -> &PackagerSettings {
        &self.settings
    }

    /// Picks the version to package.
    ///
    /// A non-blank `explicit` version is returned as given. Otherwise the
    /// trimmed contents of the version file are used, or an empty string
    /// when there is no version file (which [`PackageArchive::open`] rejects).
    pub async fn resolve_version(&self, explicit: &str) -> Result<String> {
        if !explicit.trim().is_empty() {
            return Ok(explicit.to_string());
        }

        let path = self.settings.version_file();
        match fs::read_optional_string(&path).await? {
            Some(content) => {
                let version = content.trim().to_string();
                log::debug!("Read version {version:?} from {}", path.display());
                Ok(version)
            }
            None => {
                log::debug!("No version given and {} does not exist", path.display());
                Ok(String::new())
            }
        }
    }

    /// Builds the package described by `request`.
    ///
    /// Any failure aborts the whole build. An archive that was created but
    /// not sealed is removed again; an artifact that already existed is left
    /// alone.
    pub async fn assemble(&self, request: PackageRequest) -> Result<PackageArtifact> {
        let version = self.resolve_version(&request.version).await?;

        let settings = self.settings.clone();
        let progress = Arc::clone(&self.progress);
        let package_id = request.package_id.clone();
        let build_version = version.clone();

        let (path, files) = tokio::task::spawn_blocking(move || {
            write_package(&settings, progress.as_ref(), &build_version, request)
        })
        .await
        .map_err(|e| Error::GenericError(format!("Packaging task panicked: {e}")))??;

        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;

        Ok(PackageArtifact {
            file_name: PackagerSettings::artifact_file_name(&package_id, &version),
            path,
            package_id,
            version,
            size,
            checksum,
            included: files.included,
            excluded: files.excluded,
        })
    }
}

/// Runs the synchronous pipeline: open, scan, write, describe, seal.
fn write_package(
    settings: &PackagerSettings,
    progress: &dyn PackageProgress,
    version: &str,
    request: PackageRequest,
) -> Result<(PathBuf, ClassificationResult)> {
    let mut archive = PackageArchive::open(settings, version, &request.package_id)?;
    progress.archive_created(archive.path());

    // The archive being written may sit inside the source tree.
    let files = TreeScanner::new(settings.work_dir())
        .skip_dir(settings.releases_dir())
        .scan(&request.source_directory)?;

    for entry in &files.included {
        progress.file_added(entry);
        archive.add_file(entry)?;
    }

    let manifest_php = ManifestBuilder::new(request.source_directory.as_str()).build_serialized(
        request.manifest,
        InstallDescriptor::from(request.installdefs),
        &files.included,
    )?;
    archive.add_content(MANIFEST_ENTRY_NAME, manifest_php.as_bytes())?;

    let path = archive.close()?;
    progress.archive_sealed(&path);

    if !files.excluded.is_empty() {
        progress.files_excluded(&files.excluded);
    }

    Ok((path, files))
}
