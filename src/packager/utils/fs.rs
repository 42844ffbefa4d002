//! File system utilities for packaging.
//!
//! Idempotent wrappers that attach the failing path to every error.

use crate::packager::error::{ErrorExt, Result};
use std::{fs, io, path::Path};

/// Creates all directories of `path`; succeeds if it already exists.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).fs_context("creating directory", path)
}

/// Removes a file, treating an already missing file as success.
pub fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Reads a UTF-8 file, returning `None` when it does not exist.
pub async fn read_optional_string(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).fs_context("reading", path),
    }
}
