//! Error types for package fetching.

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`FetchError`], for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Transport,
    Parse,
    Io,
}

/// Errors that can occur while fetching a package tree.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} not found: {}", .path.display())]
    NotFound { what: String, path: PathBuf },

    #[error("target file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("download failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("cannot read {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;
