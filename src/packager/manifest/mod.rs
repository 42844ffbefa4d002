//! Installer descriptor generation.
//!
//! The package's `manifest.php` carries two PHP arrays:
//!
//! - `$manifest`: caller metadata (name, author, accepted versions, ...),
//!   passed through untouched
//! - `$installdefs`: install actions; every packaged file gets one entry in
//!   its `copy` list telling the installer where to place it
//!
//! [`ManifestBuilder`] produces a [`ManifestDocument`] holding both, which
//! renders to the PHP source stored in the archive and can be parsed back.
//!
//! # Example
//!
//! ```
//! use sugar_mlp_packager::packager::{
//!     DescriptorMap, FileEntry, InstallDescriptor, ManifestBuilder,
//! };
//!
//! # fn main() -> sugar_mlp_packager::packager::Result<()> {
//! let manifest = DescriptorMap::new().with("name", "Professor M");
//! let install = InstallDescriptor::from(DescriptorMap::new().with("id", "professorM"));
//! let files = vec![FileEntry::new("/work/src/a.php", "src/a.php")];
//!
//! let document = ManifestBuilder::new("src").build(manifest, install, &files)?;
//! let copy = document.installdefs.copy_instructions();
//! assert_eq!(copy[0].from, "<basepath>/src/a.php");
//! assert_eq!(copy[0].to, "a.php");
//! # Ok(())
//! # }
//! ```

mod export;
mod load;
mod value;

pub use export::{export, export_map};
pub use load::parse_assignments;
pub use value::{DescriptorMap, DescriptorValue};

use super::{
    archive::MANIFEST_ENTRY_NAME,
    classifier::normalize_separators,
    error::{Error, ErrorExt, Result},
    scanner::FileEntry,
};
use std::{io::Read, path::Path};

/// Prefix the installer expands to the unpacked package root.
pub const BASEPATH_PREFIX: &str = "<basepath>/";

/// Key of the copy list inside the install descriptor.
pub const COPY_KEY: &str = "copy";

const MANIFEST_VAR: &str = "manifest";
const INSTALLDEFS_VAR: &str = "installdefs";

/// One file placement for the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyInstruction {
    /// `<basepath>/` followed by the archive path
    pub from: String,
    /// Destination relative to the instance root
    pub to: String,
}

impl CopyInstruction {
    /// Builds the instruction for a packaged file.
    ///
    /// `to` drops the leading `<source_directory>/` segment. When the path
    /// does not start with it, `to` is the relative path unchanged.
    pub fn for_entry(entry: &FileEntry, source_directory: &str) -> Self {
        let relative = entry.relative_path();
        Self {
            from: format!("{BASEPATH_PREFIX}{relative}"),
            to: strip_source_prefix(relative, source_directory).to_string(),
        }
    }

    fn to_value(&self) -> DescriptorValue {
        DescriptorValue::Map(
            DescriptorMap::new()
                .with("from", self.from.as_str())
                .with("to", self.to.as_str()),
        )
    }

    fn from_value(value: &DescriptorValue) -> Option<Self> {
        let map = value.as_map()?;
        Some(Self {
            from: map.get("from")?.as_str()?.to_string(),
            to: map.get("to")?.as_str()?.to_string(),
        })
    }
}

fn strip_source_prefix<'a>(relative: &'a str, source_directory: &str) -> &'a str {
    let prefix = normalize_separators(source_directory);
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return relative;
    }
    let normalized = normalize_separators(relative);
    match normalized.strip_prefix(prefix) {
        // Separator normalization is byte-for-byte, so offsets carry over.
        Some(rest) if rest.starts_with('/') => &relative[prefix.len() + 1..],
        _ => relative,
    }
}

/// The `$installdefs` array.
///
/// Starts from whatever the caller supplies (other install actions such as
/// `beans`, `language` or `post_execute` are kept as they are) and gains
/// copy instructions appended after any existing ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallDescriptor {
    defs: DescriptorMap,
}

impl InstallDescriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a descriptor with `instructions` appended to its copy list.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDescriptor`] if an existing `copy` value is not a list.
    pub fn with_copy_instructions(
        mut self,
        instructions: impl IntoIterator<Item = CopyInstruction>,
    ) -> Result<Self> {
        let new_items = instructions.into_iter().map(|i| i.to_value());

        match self.defs.get_mut(COPY_KEY) {
            Some(DescriptorValue::List(items)) => {
                items.extend(new_items);
                return Ok(self);
            }
            Some(DescriptorValue::Map(map)) if map.is_empty() => {}
            Some(other) => {
                return Err(Error::InvalidDescriptor(format!(
                    "'{COPY_KEY}' must be a list, found {}",
                    other.type_name()
                )));
            }
            None => {}
        }
        self.defs
            .insert(COPY_KEY, DescriptorValue::List(new_items.collect()));
        Ok(self)
    }

    /// Copy instructions currently in the descriptor, in order.
    ///
    /// Entries that are not `from`/`to` string pairs are skipped.
    pub fn copy_instructions(&self) -> Vec<CopyInstruction> {
        self.defs
            .get(COPY_KEY)
            .and_then(DescriptorValue::as_list)
            .map(|items| items.iter().filter_map(CopyInstruction::from_value).collect())
            .unwrap_or_default()
    }

    /// The underlying array.
    pub fn as_map(&self) -> &DescriptorMap {
        &self.defs
    }
}

impl From<DescriptorMap> for InstallDescriptor {
    fn from(defs: DescriptorMap) -> Self {
        Self { defs }
    }
}

/// Manifest metadata paired with its install descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestDocument {
    /// `$manifest`
    pub manifest: DescriptorMap,
    /// `$installdefs`
    pub installdefs: InstallDescriptor,
}

impl ManifestDocument {
    /// PHP source for `manifest.php`.
    pub fn render(&self) -> String {
        format!(
            "<?php\n${MANIFEST_VAR} = {};\n${INSTALLDEFS_VAR} = {};\n",
            export_map(&self.manifest),
            export_map(self.installdefs.as_map()),
        )
    }

    /// Loads a rendered `manifest.php`.
    ///
    /// Other assignments in the file are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::ManifestParse`] on malformed input or when either array is
    /// missing or not an array.
    pub fn parse(source: &str) -> Result<Self> {
        let mut manifest = None;
        let mut installdefs = None;

        for (name, value) in parse_assignments(source)? {
            let slot = match name.as_str() {
                MANIFEST_VAR => &mut manifest,
                INSTALLDEFS_VAR => &mut installdefs,
                _ => {
                    log::debug!("Ignoring ${name} in manifest");
                    continue;
                }
            };
            *slot = Some(into_array(&name, value)?);
        }

        Ok(Self {
            manifest: manifest.ok_or_else(|| missing(MANIFEST_VAR))?,
            installdefs: installdefs.ok_or_else(|| missing(INSTALLDEFS_VAR))?.into(),
        })
    }

    /// Reads and parses the descriptor stored in a package archive.
    pub fn from_archive(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).fs_context("opening", path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut entry = archive.by_name(MANIFEST_ENTRY_NAME)?;
        let mut source = String::new();
        entry
            .read_to_string(&mut source)
            .fs_context("reading manifest from", path)?;
        Self::parse(&source)
    }
}

fn into_array(name: &str, value: DescriptorValue) -> Result<DescriptorMap> {
    match value {
        DescriptorValue::Map(map) => Ok(map),
        DescriptorValue::List(items) if items.is_empty() => Ok(DescriptorMap::new()),
        // A list at the top level is kept under its indices.
        DescriptorValue::List(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect()),
        other => Err(Error::ManifestParse {
            line: 0,
            column: 0,
            message: format!("${name} must be an array, found {}", other.type_name()),
        }),
    }
}

fn missing(name: &str) -> Error {
    Error::ManifestParse {
        line: 0,
        column: 0,
        message: format!("${name} is not assigned"),
    }
}

/// Turns the included files and caller metadata into a [`ManifestDocument`].
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    source_directory: String,
}

impl ManifestBuilder {
    /// Creates a builder for files scanned from `source_directory`.
    pub fn new(source_directory: impl Into<String>) -> Self {
        Self {
            source_directory: source_directory.into(),
        }
    }

    /// Appends one copy instruction per included file, in order.
    pub fn build(
        &self,
        manifest: DescriptorMap,
        install: InstallDescriptor,
        included: &[FileEntry],
    ) -> Result<ManifestDocument> {
        let instructions = included
            .iter()
            .map(|entry| CopyInstruction::for_entry(entry, &self.source_directory));
        let installdefs = install.with_copy_instructions(instructions)?;

        log::debug!(
            "Install descriptor has {} copy instructions",
            installdefs.copy_instructions().len()
        );

        Ok(ManifestDocument {
            manifest,
            installdefs,
        })
    }

    /// Same as [`build`](Self::build), rendered to `manifest.php` source.
    pub fn build_serialized(
        &self,
        manifest: DescriptorMap,
        install: InstallDescriptor,
        included: &[FileEntry],
    ) -> Result<String> {
        Ok(self.build(manifest, install, included)?.render())
    }
}
