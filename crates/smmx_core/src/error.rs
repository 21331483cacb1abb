//! Error taxonomy shared by every core layer.
//!
//! Each layer keeps its own error enum; `ErrorKind` is the coarse
//! classification callers branch on when turning failures into responses.

use std::fmt::{Display, Formatter};

/// Coarse failure class of any core error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unresolvable node id or missing file path.
    NotFound,
    /// Wrong file type, missing or malformed internal payload.
    Format,
    /// Cycle or dangling parent reference in the node tree.
    CorruptTree,
    /// Disallowed mutation.
    InvalidOperation,
    /// File-system failure while reading or publishing an archive.
    Io,
}

impl ErrorKind {
    /// Stable lowercase label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Format => "format",
            Self::CorruptTree => "corrupt_tree",
            Self::InvalidOperation => "invalid_operation",
            Self::Io => "io",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
