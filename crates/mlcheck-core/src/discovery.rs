//! Finding documents to scan below a directory
//!
//! Discovery walks a directory (one level, or the whole tree when recursive)
//! and groups the matching files by the directory that contains them.
//! Directories come out in path order with the scan root first, files in
//! name order within each directory.

use crate::error::{Error, Result};
use crate::session::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Matching files found directly inside one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryBatch {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// File discovery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Lowercase extensions without the leading dot
    extensions: Vec<String>,
    recursive: bool,
}

impl Discovery {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            recursive: false,
        }
    }

    /// Discovery for the standard extensions of `dialect`
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(dialect.extensions())
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` carries one of the configured extensions
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Collect matching files below `root`, grouped by directory
    ///
    /// Directories without matching files are left out. Entries that cannot
    /// be read below the root are logged and skipped.
    pub fn discover(&self, root: &Path) -> Result<Vec<DirectoryBatch>> {
        if !root.is_dir() {
            return Err(Error::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name();

        let mut grouped: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(Error::Walk {
                        path: root.to_path_buf(),
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.matches(path) {
                continue;
            }

            let directory = path.parent().unwrap_or(root).to_path_buf();
            grouped.entry(directory).or_default().push(path.to_path_buf());
        }

        let batches: Vec<DirectoryBatch> = grouped
            .into_iter()
            .map(|(directory, files)| DirectoryBatch { directory, files })
            .collect();

        debug!(
            root = %root.display(),
            directories = batches.len(),
            files = batches.iter().map(|b| b.files.len()).sum::<usize>(),
            "discovery finished"
        );
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        for file in [
            "b.html",
            "a.HTM",
            "notes.txt",
            "quiz.xml",
            "nested/c.html",
            "nested/deeper/d.html",
        ] {
            fs::write(root.join(file), "<p></p>").unwrap();
        }
        dir
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let discovery = Discovery::new([".html", "htm"]);
        assert!(discovery.matches(Path::new("index.HTML")));
        assert!(discovery.matches(Path::new("x/page.htm")));
        assert!(!discovery.matches(Path::new("page.xhtml")));
        assert!(!discovery.matches(Path::new("html")));
    }

    #[test]
    fn test_flat_scan_stays_in_root() {
        let dir = tree();
        let batches = Discovery::for_dialect(Dialect::Html).discover(dir.path()).unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].directory, dir.path());
        assert_eq!(
            batches[0].files,
            vec![dir.path().join("a.HTM"), dir.path().join("b.html")]
        );
    }

    #[test]
    fn test_recursive_scan_groups_by_directory() {
        let dir = tree();
        let batches = Discovery::for_dialect(Dialect::Html)
            .recursive(true)
            .discover(dir.path())
            .unwrap();

        let directories: Vec<_> = batches.iter().map(|b| b.directory.clone()).collect();
        assert_eq!(
            directories,
            vec![
                dir.path().to_path_buf(),
                dir.path().join("nested"),
                dir.path().join("nested/deeper"),
            ]
        );
        assert_eq!(batches[2].files, vec![dir.path().join("nested/deeper/d.html")]);
    }

    #[test]
    fn test_xml_dialect_only_picks_xml() {
        let dir = tree();
        let batches = Discovery::for_dialect(Dialect::Xml)
            .recursive(true)
            .discover(dir.path())
            .unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].files, vec![dir.path().join("quiz.xml")]);
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = tree();
        let error = Discovery::for_dialect(Dialect::Html)
            .discover(&dir.path().join("b.html"))
            .unwrap_err();
        assert!(matches!(error, Error::NotADirectory { .. }));
    }
}
