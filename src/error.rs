//! Top-level error types for the packager binary and library callers.
//!
//! Wraps core packaging errors together with CLI and configuration failures,
//! each with actionable recovery suggestions.

use thiserror::Error;

/// Result type alias for CLI-level operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON package definition errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML package definition errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Packaging pipeline errors
    #[error("{0}")]
    Packager(#[from] crate::packager::Error),

    /// Errors with attached context from anyhow
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl PackagerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::packager::Error as Core;

        match self {
            PackagerError::Packager(Core::AlreadyExists { path }) => vec![
                format!("Delete {} if it is stale", path.display()),
                "Or bump the version in the version file (or pass a new version) and rebuild"
                    .to_string(),
            ],
            PackagerError::Packager(Core::MissingVersion { command }) => vec![
                format!("Pass the version as an argument: {command} 1.0.0"),
                "Or create a file named \"version\" in the working directory".to_string(),
            ],
            PackagerError::Packager(Core::SourceNotDirectory { .. }) => vec![
                "Check --source-dir / source_directory; it is resolved against the working directory"
                    .to_string(),
            ],
            PackagerError::Packager(Core::InvalidDescriptor(_)) => {
                vec!["Make [installdefs] copy a list of {from, to} tables".to_string()]
            }
            PackagerError::Toml(_) | PackagerError::Json(_) => {
                vec!["Fix the package definition file syntax".to_string()]
            }
            PackagerError::Anyhow(_) => {
                vec!["Check that the --config path exists and is readable".to_string()]
            }
            PackagerError::Cli(CliError::MissingArgument { .. }) => vec![
                "Set it in the package definition file or pass it on the command line".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
