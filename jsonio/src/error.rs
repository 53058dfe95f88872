use crate::internal::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the file collaborator. Only `NotFound` is expected in normal operation;
/// everything else means the file system or the file is in a state the caller cannot
/// fix by retrying.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} does not contain UTF-8 text", path.display())]
    Utf8 { path: PathBuf },
}

impl PersistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io { path: path.into(), source }
    }

    /// Like [`io`](Self::io), but a missing file is `NotFound`. Only for opening the file
    /// being read: a missing directory on the write side is an ordinary I/O failure.
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PersistError::NotFound { path }
        } else {
            PersistError::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::NotFound { .. })
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CombineError {
    #[error("operands diverge at `{path}`")]
    ShapeMismatch { path: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type PersistResult<T> = Result<T, PersistError>;
pub type CombineResult<T> = Result<T, CombineError>;
