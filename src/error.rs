//! Error types for PyCycle.
//!
//! Two layers, mirroring how a scan behaves:
//!
//! - **`PycycleError`**: an operation failed. Only `UnreadableRoot` ends a
//!   whole run; everything else is scoped to the file being processed.
//! - **`FileError`**: a per-file failure recorded during a scan. The scan
//!   skips the file and carries on with the rest.

use std::collections::TryReserveError;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::graph::types::ModuleId;

/// Result type for PyCycle operations.
pub type Result<T> = std::result::Result<T, PycycleError>;

#[derive(Debug, Error)]
pub enum PycycleError {
    /// Growing the registry or graph storage failed. Prior state is untouched.
    #[error("allocation failed while growing {what}: {source}")]
    AllocationFailure {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// An edge referenced a module the graph never issued.
    #[error("invalid module identity {id} (graph holds {len} modules)")]
    InvalidIdentity { id: ModuleId, len: usize },

    #[error("module name must not be empty")]
    EmptyModuleName,

    #[error("cannot read {}: {source}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot traverse analysis root {}: {source}", path.display())]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write graph export to {}: {source}", path.display())]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("cannot serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl PycycleError {
    pub(crate) fn alloc(what: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| PycycleError::AllocationFailure { what, source }
    }
}

/// Serialize a path through its display form, so non-UTF-8 paths never fail.
pub(crate) fn serialize_path<S: Serializer>(
    path: &Path,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&path.display())
}

/// A file that could not be (fully) processed during a scan.
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub kind: FileErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorKind {
    /// The file could not be opened or read.
    Unreadable,
    /// Storage growth failed while ingesting the file.
    Allocation,
    /// The graph rejected an operation (should not happen with a sound resolver).
    Graph,
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::Unreadable => write!(f, "unreadable"),
            FileErrorKind::Allocation => write!(f, "allocation failure"),
            FileErrorKind::Graph => write!(f, "graph error"),
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path.display(), self.message, self.kind)
    }
}

impl FileError {
    pub fn new(path: PathBuf, error: &PycycleError) -> Self {
        let kind = match error {
            PycycleError::UnreadableInput { .. } | PycycleError::UnreadableRoot { .. } => {
                FileErrorKind::Unreadable
            }
            PycycleError::AllocationFailure { .. } => FileErrorKind::Allocation,
            _ => FileErrorKind::Graph,
        };
        Self {
            path,
            kind,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_kind_follows_source_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PycycleError::UnreadableInput {
            path: PathBuf::from("pkg/mod.py"),
            source: io,
        };
        let record = FileError::new(PathBuf::from("pkg/mod.py"), &err);
        assert_eq!(record.kind, FileErrorKind::Unreadable);
        assert!(record.message.contains("denied"));

        let record = FileError::new(
            PathBuf::from("pkg/mod.py"),
            &PycycleError::InvalidIdentity {
                id: ModuleId::new(9),
                len: 2,
            },
        );
        assert_eq!(record.kind, FileErrorKind::Graph);
    }

    #[test]
    fn test_file_error_display_includes_path_and_kind() {
        let record = FileError::new(PathBuf::from("app/models.py"), &PycycleError::EmptyModuleName);
        let display = record.to_string();
        assert!(display.contains("app/models.py"));
        assert!(display.contains("graph error"));
    }

    #[test]
    fn test_allocation_failure_reports_what() {
        let mut v: Vec<u8> = Vec::new();
        let source = v.try_reserve(usize::MAX).unwrap_err();
        let err = PycycleError::alloc("registry buckets")(source);
        assert!(err.to_string().contains("registry buckets"));
    }
}
