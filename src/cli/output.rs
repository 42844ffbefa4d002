//! Terminal output for the packager CLI.

use crate::packager::{FileEntry, PackageProgress};
use console::style;
use std::io::{self, Write};
use std::path::Path;

/// Styled stdout/stderr writer honoring `--verbose` and `--quiet`.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates a new output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether settings detail lines are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Prints an informational line.
    pub fn info(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "{message}")
    }

    /// Prints a line only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        writeln!(io::stdout(), "{}", style(message).dim())
    }

    /// Prints a success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "{} {}", style("✓").green().bold(), message)
    }

    /// Prints a warning to stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stderr(), "{} {}", style("warning:").yellow().bold(), message)
    }

    /// Prints an indented line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "  {message}")
    }
}

// Terminal write failures during a build are not worth aborting it for.
impl PackageProgress for OutputManager {
    fn archive_created(&self, path: &Path) {
        let _ = self.info(&format!("Creating {} ...", style(path.display()).cyan()));
    }

    fn file_added(&self, entry: &FileEntry) {
        let _ = self.info(&format!(" [*] {}", entry.relative_path()));
    }

    fn archive_sealed(&self, path: &Path) {
        let name = path.file_name().unwrap_or(path.as_os_str());
        let _ = self.success(&format!("Done creating {}", name.to_string_lossy()));
    }

    fn files_excluded(&self, entries: &[FileEntry]) {
        let _ = self.warn("The following files were excluded from the zip:");
        for entry in entries {
            let _ = self.indent(&format!("[*] {}", entry.relative_path()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_verbose() {
        assert!(!OutputManager::new(true, true).is_verbose());
        assert!(OutputManager::new(true, false).is_verbose());
    }

    #[test]
    fn quiet_output_writes_nothing() {
        let out = OutputManager::new(false, true);
        assert!(out.info("hidden").is_ok());
        assert!(out.success("hidden").is_ok());
    }
}
