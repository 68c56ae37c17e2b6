//! Directory batch scanning
//!
//! A [`BatchScan`] discovers documents, validates them one after another
//! and keeps per-directory and global [`BatchSummary`] totals. Progress is
//! reported through a callback so the caller decides how to render it.
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use crate::discovery::{DirectoryBatch, Discovery};
use crate::error::Result;
use crate::session::{Dialect, DialectChoice, DocumentReport, ValidationSession};
use crate::stats::{BatchSummary, ValidationStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// What happened to one discovered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Checked(DocumentReport),
    /// The file could not be read; it counts as scanned with one error
    Failed { path: PathBuf, message: String },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Checked(report) => &report.path,
            Self::Failed { path, .. } => path,
        }
    }

    pub fn stats(&self) -> ValidationStats {
        match self {
            Self::Checked(report) => report.outcome.stats,
            Self::Failed { .. } => ValidationStats::read_failure(),
        }
    }
}

/// Results for the files of one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    pub files: Vec<FileOutcome>,
    pub summary: BatchSummary,
}

/// Results of a whole scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub dialect: Dialect,
    pub recursive: bool,
    pub generated_at: DateTime<Utc>,
    pub directories: Vec<DirectoryReport>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.directories.iter().flat_map(|d| d.files.iter())
    }
}

/// Progress notifications emitted while a scan runs
#[derive(Debug, Clone, Copy)]
pub enum BatchEvent<'a> {
    /// Discovery finished; this many files will be checked
    Planned { total_files: usize },
    DirectoryStarted { directory: &'a Path, files: usize },
    FileChecked(&'a FileOutcome),
    DirectoryFinished(&'a DirectoryReport),
}

/// A configured directory scan
#[derive(Debug, Clone)]
pub struct BatchScan {
    session: ValidationSession,
    dialect: Dialect,
    forced: Option<Dialect>,
    discovery: Discovery,
}

impl BatchScan {
    /// Scan for files of `dialect`, validating them as that dialect
    pub fn new(session: ValidationSession, dialect: Dialect) -> Self {
        Self {
            session,
            dialect,
            forced: None,
            discovery: Discovery::for_dialect(dialect),
        }
    }

    /// Replace the default discovery (custom extensions, recursion)
    pub fn with_discovery(mut self, discovery: Discovery) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.discovery = self.discovery.recursive(recursive);
        self
    }

    /// Validate every file as `dialect`, whatever its extension says
    pub fn force_dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.forced = dialect;
        self
    }

    /// The dialect files are validated as
    pub fn effective_dialect(&self) -> Dialect {
        self.forced.unwrap_or(self.dialect)
    }

    /// Run the scan without progress reporting
    pub fn run(&self, root: &Path) -> Result<BatchReport> {
        self.run_with_progress(root, |_| {})
    }

    /// Run the scan, calling `on_event` as it progresses
    #[instrument(skip(self, root, on_event), fields(root = %root.display(), dialect = %self.dialect))]
    pub fn run_with_progress<F>(&self, root: &Path, mut on_event: F) -> Result<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let batches = self.discovery.discover(root)?;
        let total_files = batches.iter().map(|b| b.files.len()).sum();
        on_event(BatchEvent::Planned { total_files });

        let mut summary = BatchSummary::new();
        let mut directories = Vec::with_capacity(batches.len());

        for batch in batches {
            let report = self.scan_directory(batch, &mut on_event);
            summary.merge(&report.summary);
            on_event(BatchEvent::DirectoryFinished(&report));
            directories.push(report);
        }

        info!(
            files = summary.files_scanned,
            failing = summary.files_with_errors,
            errors = summary.total_errors,
            "scan finished"
        );

        Ok(BatchReport {
            root: root.to_path_buf(),
            dialect: self.effective_dialect(),
            recursive: self.discovery.is_recursive(),
            generated_at: Utc::now(),
            directories,
            summary,
        })
    }

    fn scan_directory<F>(&self, batch: DirectoryBatch, on_event: &mut F) -> DirectoryReport
    where
        F: FnMut(BatchEvent<'_>),
    {
        on_event(BatchEvent::DirectoryStarted {
            directory: &batch.directory,
            files: batch.files.len(),
        });

        let choice = DialectChoice::Fixed(self.effective_dialect());
        let mut summary = BatchSummary::new();
        let mut files = Vec::with_capacity(batch.files.len());

        for path in batch.files {
            let outcome = match self.session.validate_file(&path, choice) {
                Ok(report) => FileOutcome::Checked(report),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "file could not be checked");
                    FileOutcome::Failed {
                        path,
                        message: err.to_string(),
                    }
                }
            };

            summary.record(&outcome.stats());
            on_event(BatchEvent::FileChecked(&outcome));
            files.push(outcome);
        }

        DirectoryReport {
            directory: batch.directory,
            files,
            summary,
        }
    }
}
