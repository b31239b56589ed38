//! Error types for retargeting
//!
//! This module defines every fatal error a run can raise.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Non-fatal conditions are not errors; see [`crate::diagnostic`].

use crate::catalog::CatalogKind;
use crate::types::ContainerId;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for retarget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on a specific path
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// Path being read, written, created or removed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Malformed structured document
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Two types in one catalog share a fully qualified name
    #[error("duplicate type '{name}' in {catalog} catalog (containers {first} and {second})")]
    DuplicateType {
        /// Catalog being built
        catalog: CatalogKind,
        /// The colliding fully qualified name
        name: String,
        /// Container of the entry already present
        first: ContainerId,
        /// Container of the rejected entry
        second: ContainerId,
    },

    /// Two source types resolve to the same container id
    #[error("container {container_id} is remapped twice")]
    DuplicateRemap {
        /// The colliding source container id
        container_id: ContainerId,
    },

    /// A collaborator could not resolve an asset
    #[error("resolution failed for {path:?}: {reason}")]
    Resolution {
        /// Asset being resolved
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A file handed to the transformer is not under the project root
    #[error("{path:?} is not under project root {root:?}")]
    PathOutsideRoot {
        /// Offending file
        path: PathBuf,
        /// Expected root
        root: PathBuf,
    },
}

impl Error {
    /// Attach a path to an I/O error
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a resolution error
    pub fn resolution(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Error::Resolution {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// True for document corruption errors
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

/// Document corruption. Always fatal.
///
/// Line numbers are 1-based and point at the first physical line of the
/// offending record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A reference record still lacks its closing brace after one continuation line
    #[error("{path:?}:{line}: reference record spans more than two lines: {text}")]
    UnterminatedRecord {
        /// Document path
        path: PathBuf,
        /// Line number
        line: usize,
        /// The merged text
        text: String,
    },

    /// The script sentinel appears on a line without the field marker
    #[error("{path:?}:{line}: line contains script type but not m_Script: {text}")]
    SentinelWithoutMarker {
        /// Document path
        path: PathBuf,
        /// Line number
        line: usize,
        /// The offending line
        text: String,
    },

    /// No container identifier could be extracted from a script reference
    #[error("{path:?}:{line}: failed to find the guid in line: {text}")]
    MissingIdentifier {
        /// Document path
        path: PathBuf,
        /// Line number
        line: usize,
        /// The offending line
        text: String,
    },

    /// More than one container identifier in a single record
    #[error("{path:?}:{line}: found {count} guids in line: {text}")]
    AmbiguousIdentifier {
        /// Document path
        path: PathBuf,
        /// Line number
        line: usize,
        /// Number of matches
        count: usize,
        /// The offending line
        text: String,
    },
}

impl ParseError {
    /// Document the error was raised for
    pub fn path(&self) -> &Path {
        match self {
            ParseError::UnterminatedRecord { path, .. }
            | ParseError::SentinelWithoutMarker { path, .. }
            | ParseError::MissingIdentifier { path, .. }
            | ParseError::AmbiguousIdentifier { path, .. } => path,
        }
    }

    /// Line the error was raised at
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedRecord { line, .. }
            | ParseError::SentinelWithoutMarker { line, .. }
            | ParseError::MissingIdentifier { line, .. }
            | ParseError::AmbiguousIdentifier { line, .. } => *line,
        }
    }
}
