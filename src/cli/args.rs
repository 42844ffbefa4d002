//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// SugarCRM Module Loadable Package builder
#[derive(Parser, Debug)]
#[command(
    name = "sugar_mlp_packager",
    version,
    about = "Builds SugarCRM Module Loadable Packages",
    long_about = "Zips a module source tree into releases/sugarcrm-{id}-{version}.zip together with a generated manifest.php.

Usage:
  sugar_mlp_packager 1.0.0
  sugar_mlp_packager --package-id professorm --source-dir src
  sugar_mlp_packager -C ../my-module -c pack.json 2.1.0

When VERSION is omitted the contents of the `version` file are used.
An existing artifact is never overwritten."
)]
pub struct Args {
    /// Version to package (defaults to the contents of the version file)
    #[arg(value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Package definition file (TOML, or JSON by .json extension)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory that relative paths resolve against
    #[arg(short = 'C', long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Package identifier, overrides package_id from the definition file
    #[arg(long, value_name = "ID", env = "SUGAR_MLP_PACKAGE_ID")]
    pub package_id: Option<String>,

    /// Source directory, overrides source_directory from the definition file
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dir: Option<String>,

    /// Store entries without compression
    #[arg(long)]
    pub store: bool,

    /// Print the resolved build settings before packaging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("--verbose and --quiet cannot be used together".to_string());
        }

        if let Some(id) = &self.package_id
            && id.trim().is_empty()
        {
            return Err("--package-id cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
