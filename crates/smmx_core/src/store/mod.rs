//! File-system persistence for mind map archives.
//!
//! # Responsibility
//! - Read archives from disk and publish them back atomically.
//! - Discover `.smmx` files below a location.
//!
//! # Invariants
//! - A failed save leaves the previous file untouched.
//! - Only paths with the `.smmx` extension are loaded or saved as archives.

use crate::codec::CodecError;
use crate::error::ErrorKind;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod discovery;
pub mod fs_store;

pub use discovery::discover_mindmaps;
pub use fs_store::{FsMindMapStore, MindMapStore};

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Path does not exist.
    FileNotFound(PathBuf),
    /// Path does not carry the archive extension.
    UnsupportedExtension(PathBuf),
    /// Reading or publishing failed at the file-system level.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Archive bytes could not be decoded or encoded.
    Codec(CodecError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) => ErrorKind::NotFound,
            Self::UnsupportedExtension(_) => ErrorKind::Format,
            Self::Io { .. } => ErrorKind::Io,
            Self::Codec(err) => err.kind(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::UnsupportedExtension(path) => {
                write!(f, "file must be a .smmx file: {}", path.display())
            }
            Self::Io { path, source } => write!(f, "i/o failure at {}: {source}", path.display()),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec(err) => Some(err),
            Self::FileNotFound(_) | Self::UnsupportedExtension(_) => None,
        }
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}
