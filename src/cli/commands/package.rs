//! The package command: definition file + arguments in, artifact out.

use crate::cli::{Args, RuntimeConfig};
use crate::config::{DEFAULT_CONFIG_FILE, PackageConfig};
use crate::error::Result;
use crate::packager::{Compression, Packager, SettingsBuilder};
use std::sync::Arc;

/// Builds one package and prints a summary of the artifact.
///
/// An explicit `--config` file must exist; the default `pack.toml` in the
/// working directory is optional.
pub async fn execute_package(args: &Args, runtime: &RuntimeConfig) -> Result<i32> {
    let mut builder = SettingsBuilder::new().compression(if args.store {
        Compression::Stored
    } else {
        Compression::Deflated
    });
    if let Some(dir) = &args.work_dir {
        builder = builder.work_dir(dir);
    }
    let settings = builder.build()?;

    let config = match &args.config {
        Some(path) => PackageConfig::load(path)?,
        None => PackageConfig::load_or_default(&settings.work_dir().join(DEFAULT_CONFIG_FILE))?,
    };
    let request = config.into_request(
        args.release_version.clone(),
        args.package_id.clone(),
        args.source_dir.clone(),
    )?;

    log::debug!(
        "Packaging {} from {} in {}",
        request.package_id,
        request.source_directory,
        settings.work_dir().display()
    );

    let output = runtime.output();
    output.verbose(&format!("Working directory: {}", settings.work_dir().display()))?;
    output.verbose(&format!("Source directory:  {}", request.source_directory))?;
    output.verbose(&format!("Releases:          {}", settings.releases_dir().display()))?;
    output.verbose(&format!("Compression:       {:?}", settings.compression()))?;

    let packager = Packager::new(settings).with_progress(Arc::new(runtime.output().clone()));
    let artifact = packager.assemble(request).await?;

    runtime.success(&format!(
        "{} ({} files, {} excluded)",
        artifact.file_name,
        artifact.included.len(),
        artifact.excluded.len()
    ))?;
    runtime.indent(&format!("Path:    {}", artifact.path.display()))?;
    runtime.indent(&format!("Size:    {} bytes", artifact.size))?;
    runtime.indent(&format!("SHA-256: {}", artifact.checksum))?;

    Ok(0)
}
