//! Error types for the packaging pipeline.
//!
//! Every failure here is fatal to the package build in progress; nothing is
//! retried internally.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while scanning, archiving or describing a package.
#[derive(Error, Debug)]
pub enum Error {
    /// No version was passed and no version file supplied one.
    #[error(
        "no version given: use {command} [version], or put the version in a file named \"version\""
    )]
    MissingVersion {
        /// Command name shown to the user
        command: String,
    },

    /// The release artifact for this package id and version is already on disk.
    #[error(
        "release {} already exists, so a new zip was not created. To generate a new zip, either \
         delete the existing zip file or update the version number in the version file and then \
         build the package again",
        path.display()
    )]
    AlreadyExists {
        /// Existing artifact
        path: PathBuf,
    },

    /// Package id or version would not produce a plain file name.
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidArtifactName {
        /// Which input was rejected ("package id" or "version")
        field: &'static str,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Source root is missing or is not a directory.
    #[error("source directory {} does not exist or is not a directory", path.display())]
    SourceNotDirectory {
        /// Resolved source root
        path: PathBuf,
    },

    /// A discovered file name cannot be used as an archive entry name.
    #[error("path {} is not valid UTF-8", path.display())]
    NonUtf8Path {
        /// Offending path
        path: PathBuf,
    },

    /// Install descriptor has a shape the copy list cannot be merged into.
    #[error("invalid install descriptor: {0}")]
    InvalidDescriptor(String),

    /// Rendered manifest could not be loaded back.
    #[error("manifest parse error at {line}:{column}: {message}")]
    ManifestParse {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// What was expected
        message: String,
    },

    /// Filesystem failure with the action and path that caused it.
    #[error("failed {action} {}: {source}", path.display())]
    Fs {
        /// What was being done
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Directory traversal failure.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// Archive writer failure.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

/// Attach the action and path to an I/O failure.
pub trait ErrorExt<T> {
    /// Convert an `io::Error` into [`Error::Fs`].
    fn fs_context(self, action: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, action: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Turn an empty `Option` or a foreign error into [`Error::GenericError`].
pub trait Context<T> {
    /// Use `msg` as the error message.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_message_guides_caller() {
        let err = Error::AlreadyExists {
            path: PathBuf::from("releases/sugarcrm-test-1.0.zip"),
        };
        let msg = err.to_string();
        assert!(msg.contains("releases/sugarcrm-test-1.0.zip"));
        assert!(msg.contains("delete the existing zip"));
        assert!(msg.contains("update the version number"));
    }

    #[test]
    fn missing_version_names_command() {
        let err = Error::MissingVersion {
            command: "pack".into(),
        };
        assert!(err.to_string().contains("use pack [version]"));
    }

    #[test]
    fn fs_context_keeps_action_and_path() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = res.fs_context("reading", "/tmp/x").unwrap_err();
        match err {
            Error::Fs { action, path, .. } => {
                assert_eq!(action, "reading");
                assert_eq!(path, PathBuf::from("/tmp/x"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
