//! Source tree traversal.
//!
//! Walks every regular file below `<work_dir>/<source_directory>` and sorts it
//! into the included or excluded bucket using [`PathClassifier`].

use super::{
    classifier::{PathClassifier, normalize_separators},
    error::{Context, Error, ErrorExt, Result},
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    absolute_path: PathBuf,
    relative_path: String,
}

impl FileEntry {
    /// Creates an entry from its on-disk path and its archive path.
    pub fn new(absolute_path: impl Into<PathBuf>, relative_path: impl Into<String>) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Location on disk.
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Path starting with the source directory name, `/`-separated.
    ///
    /// Also the entry name inside the archive.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }
}

/// Files of one traversal, split by [`PathClassifier::should_include`].
///
/// Both lists keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Files that go into the package
    pub included: Vec<FileEntry>,
    /// Files left out of the package
    pub excluded: Vec<FileEntry>,
}

impl ClassificationResult {
    /// Total number of files seen.
    pub fn len(&self) -> usize {
        self.included.len() + self.excluded.len()
    }

    /// True when the source tree held no regular files.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enumerates and classifies the files of a source tree.
#[derive(Debug, Clone)]
pub struct TreeScanner {
    work_dir: PathBuf,
    classifier: PathClassifier,
    skipped_dirs: Vec<PathBuf>,
}

impl TreeScanner {
    /// Creates a scanner resolving source directories against `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            classifier: PathClassifier::new(),
            skipped_dirs: Vec::new(),
        }
    }

    /// Never descends into `dir`, e.g. the releases directory when the
    /// source tree contains it. Neither bucket reports its contents.
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skipped_dirs.push(dir.into());
        self
    }

    fn is_skipped(&self, path: &Path) -> bool {
        self.skipped_dirs.iter().any(|dir| dir == path)
    }

    /// Scans `<work_dir>/<source_directory>`.
    ///
    /// Symlinks to regular files are packaged under the link's own path.
    /// Symlinked directories are not descended into. Dangling links and
    /// special files are skipped. Entries are
    /// visited in file-name order so repeated runs give the same archive
    /// layout.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceNotDirectory`] if the root is missing or not a directory
    /// - [`Error::Walk`] if any directory below the root cannot be read
    /// - [`Error::NonUtf8Path`] if a file name is not valid UTF-8
    pub fn scan(&self, source_directory: &str) -> Result<ClassificationResult> {
        let prefix = source_prefix(source_directory);
        let base = self.work_dir.join(source_directory);

        match std::fs::metadata(&base) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(Error::SourceNotDirectory { path: base }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::SourceNotDirectory { path: base });
            }
            Err(e) => return Err(e).fs_context("reading metadata of", &base),
        }

        log::debug!("Scanning {}", base.display());

        let mut result = ClassificationResult::default();

        let walker = WalkDir::new(&base)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let skip = e.file_type().is_dir() && self.is_skipped(e.path());
                if skip {
                    log::debug!("Not descending into {}", e.path().display());
                }
                !skip
            });

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            // Links count when their target is a regular file; they are not descended.
            if !(file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())) {
                log::debug!("Skipping non-regular entry {}", entry.path().display());
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&base)
                .context("walked entry outside of source root")?;
            let relative_path = join_relative(&prefix, relative)?;
            let file = FileEntry::new(entry.path(), relative_path);

            if self.classifier.should_include(file.relative_path()) {
                result.included.push(file);
            } else {
                log::debug!("Excluding {}", file.relative_path());
                result.excluded.push(file);
            }
        }

        log::info!(
            "Scanned {} files ({} included, {} excluded)",
            result.len(),
            result.included.len(),
            result.excluded.len()
        );

        Ok(result)
    }
}

/// Source directory name in canonical form, without trailing separators.
fn source_prefix(source_directory: &str) -> String {
    normalize_separators(source_directory)
        .trim_end_matches('/')
        .to_string()
}

fn join_relative(prefix: &str, relative: &Path) -> Result<String> {
    let mut out = prefix.to_string();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path {
                path: relative.to_path_buf(),
            })?;
        out.push('/');
        out.push_str(part);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel.as_bytes()).unwrap();
    }

    #[test]
    fn partitions_files_by_rule() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "mymodule/foo.php");
        touch(dir.path(), "mymodule/custom/application/Ext/bar.php");
        touch(dir.path(), "mymodule/sub/custom/modules/Accounts/Ext/baz.php");

        let result = TreeScanner::new(dir.path()).scan("mymodule").unwrap();

        let included: Vec<_> = result.included.iter().map(|f| f.relative_path()).collect();
        assert_eq!(included, vec!["mymodule/foo.php"]);

        let excluded: BTreeSet<_> = result.excluded.iter().map(|f| f.relative_path()).collect();
        assert_eq!(
            excluded,
            BTreeSet::from([
                "mymodule/custom/application/Ext/bar.php",
                "mymodule/sub/custom/modules/Accounts/Ext/baz.php",
            ])
        );
        assert_eq!(
            result.included[0].absolute_path(),
            dir.path().join("mymodule").join("foo.php")
        );
    }

    #[test]
    fn every_file_appears_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            "src/a.php",
            "src/b/c.php",
            "src/b/d/e.txt",
            "src/custom/modules/Leads/Ext/x.php",
            "src/custom/modules/Leads/y.php",
            "src/custom/application/Ext/z.php",
            "src/.hidden",
        ];
        for f in files {
            touch(dir.path(), f);
        }
        fs::create_dir_all(dir.path().join("src/empty/dir")).unwrap();

        let result = TreeScanner::new(dir.path()).scan("src").unwrap();
        assert_eq!(result.len(), files.len());

        let seen: BTreeSet<_> = result
            .included
            .iter()
            .chain(&result.excluded)
            .map(|f| f.relative_path().to_string())
            .collect();
        let expected: BTreeSet<_> = files.iter().map(|f| f.to_string()).collect();
        assert_eq!(seen, expected);
        assert_eq!(result.excluded.len(), 2);
    }

    #[test]
    fn order_is_stable_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        for f in ["m/z.php", "m/a.php", "m/k/b.php", "m/c/d.php"] {
            touch(dir.path(), f);
        }
        let scanner = TreeScanner::new(dir.path());
        assert_eq!(scanner.scan("m").unwrap(), scanner.scan("m").unwrap());
    }

    #[test]
    fn trailing_separator_in_source_name_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "mymodule/foo.php");
        let result = TreeScanner::new(dir.path()).scan("mymodule/").unwrap();
        assert_eq!(result.included[0].relative_path(), "mymodule/foo.php");
    }

    #[test]
    fn nested_source_directory_keeps_full_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "pkg/module/foo.php");
        let result = TreeScanner::new(dir.path()).scan("pkg/module").unwrap();
        assert_eq!(result.included[0].relative_path(), "pkg/module/foo.php");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TreeScanner::new(dir.path()).scan("nope").unwrap_err();
        assert!(matches!(err, Error::SourceNotDirectory { .. }));
    }

    #[test]
    fn file_as_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "file.php");
        let err = TreeScanner::new(dir.path()).scan("file.php").unwrap_err();
        assert!(matches!(err, Error::SourceNotDirectory { .. }));
    }

    #[test]
    fn empty_tree_yields_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let result = TreeScanner::new(dir.path()).scan("empty").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn skipped_dir_is_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.php");
        touch(dir.path(), "releases/sugarcrm-t-0.9.zip");
        touch(dir.path(), "sub/releases/keep.php");

        let result = TreeScanner::new(dir.path())
            .skip_dir(dir.path().join("releases"))
            .scan(".")
            .unwrap();

        let included: Vec<_> = result.included.iter().map(|f| f.relative_path()).collect();
        assert_eq!(included, vec!["./a.php", "./sub/releases/keep.php"]);
        assert!(result.excluded.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_included_under_link_path() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "m/a.php");
        touch(dir.path(), "shared/lib.php");
        std::os::unix::fs::symlink(
            dir.path().join("shared/lib.php"),
            dir.path().join("m/lib.php"),
        )
        .unwrap();

        let result = TreeScanner::new(dir.path()).scan("m").unwrap();

        let included: Vec<_> = result.included.iter().map(|f| f.relative_path()).collect();
        assert_eq!(included, vec!["m/a.php", "m/lib.php"]);
        assert!(result.excluded.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_and_directory_links_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "m/a.php");
        touch(dir.path(), "shared/lib.php");
        std::os::unix::fs::symlink(dir.path().join("gone.php"), dir.path().join("m/dead.php"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("shared"), dir.path().join("m/shared"))
            .unwrap();

        let result = TreeScanner::new(dir.path()).scan("m").unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.included[0].relative_path(), "m/a.php");
    }
}
