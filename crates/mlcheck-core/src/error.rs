//! Error types for mlcheck core operations
//!
//! Structural problems inside a document are never errors: they are
//! reported as [`Diagnostic`](crate::Diagnostic) values. The errors here
//! cover the things that stop a document (or a scan) from being checked
//! at all.
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for core operations
#[derive(Debug, Error)]
pub enum Error {
    /// A document or directory could not be read
    #[error("Critical error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A batch scan was pointed at something that is not a directory
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Directory traversal failed at the scan root
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A schema rule was requested by a name nobody registered
    #[error("Unknown schema rule '{name}' (available: {available})")]
    UnknownSchemaRule { name: String, available: String },
}

impl Error {
    /// Create an I/O error bound to the path that failed
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
