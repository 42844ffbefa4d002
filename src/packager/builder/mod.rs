//! Package assembly.
//!
//! [`Packager`] ties the stages together:
//!
//! 1. Resolve the version (argument, else the version file)
//! 2. Open the release archive
//! 3. Scan and classify the source tree
//! 4. Write every included file
//! 5. Build `manifest.php` and write it
//! 6. Seal the archive and report excluded files
//!
//! # Example
//!
//! ```no_run
//! use sugar_mlp_packager::packager::{DescriptorMap, PackageRequest, Packager, SettingsBuilder};
//!
//! # async fn example() -> sugar_mlp_packager::packager::Result<()> {
//! let settings = SettingsBuilder::new().work_dir("/srv/professorm").build()?;
//! let artifact = Packager::new(settings)
//!     .assemble(PackageRequest {
//!         version: String::new(), // read from ./version
//!         package_id: "professorm".into(),
//!         source_directory: "src".into(),
//!         manifest: DescriptorMap::new().with("name", "Professor M"),
//!         installdefs: DescriptorMap::new().with("id", "professorM"),
//!     })
//!     .await?;
//! println!("{} ({} bytes)", artifact.path.display(), artifact.size);
//! # Ok(())
//! # }
//! ```

mod checksum;
mod orchestrator;

pub use checksum::calculate_sha256;
pub use orchestrator::{PackageArtifact, PackageRequest, Packager};
