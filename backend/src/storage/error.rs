//! Error types returned by product storage.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::product::InvalidValue;

/// Reasons an operation was refused. None of these change the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a product with id '{id}' already exists")]
    DuplicateKey { id: String },

    #[error("no product with id '{id}'")]
    NotFound { id: String },

    /// Every rejected field of the call, in the order they were checked
    #[error("{}", join_rejections(.0))]
    InvalidValue(Vec<InvalidValue>),
}

impl From<InvalidValue> for StoreError {
    fn from(rejected: InvalidValue) -> Self {
        StoreError::InvalidValue(vec![rejected])
    }
}

fn join_rejections(rejected: &[InvalidValue]) -> String {
    rejected
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A failure to write the backing file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("store is read-only, {} was not written", .path.display())]
    ReadOnly { path: PathBuf },

    #[error("access denied to {}: {source}", .path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            PersistenceError::AccessDenied { path, source }
        } else {
            PersistenceError::Io { path, source }
        }
    }

    /// Permission-class failures push a store into read-only mode
    pub fn is_access_denied(&self) -> bool {
        matches!(self, PersistenceError::AccessDenied { .. })
    }
}

/// Whether a change that succeeded in memory also reached the backing file.
#[must_use]
#[derive(Debug)]
pub enum SyncStatus {
    Synced,
    /// Memory holds the change, the file does not
    Diverged(PersistenceError),
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }

    pub fn warning(&self) -> Option<&PersistenceError> {
        match self {
            SyncStatus::Synced => None,
            SyncStatus::Diverged(err) => Some(err),
        }
    }
}
