//! Archive codec for `.smmx` mind maps.
//!
//! # Responsibility
//! - Turn archive bytes into a linked [`MindMap`] and back.
//! - Keep ZIP and XML details inside the codec boundary.
//!
//! # Invariants
//! - Decoding never returns a document that fails [`MindMap::validate`].
//! - Encoding never mutates the document and is byte-deterministic.
//! - `decode(encode(d)) == d` for every `d` produced by `decode`.
//!
//! [`MindMap`]: crate::model::document::MindMap
//! [`MindMap::validate`]: crate::model::document::MindMap::validate

use crate::error::ErrorKind;
use crate::model::document::DocumentError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod archive;
mod decode;
mod encode;

pub use archive::parse_attachment_path;
pub use decode::{decode, decode_payload};
pub use encode::{encode, encode_payload};

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    /// Input bytes are not a readable ZIP container.
    NotAnArchive(String),
    /// Container has no payload entry at the expected path.
    MissingPayload(&'static str),
    /// Payload is not well-formed or misses required attributes.
    MalformedMarkup(String),
    /// Payload parsed, but its parent links do not form a tree.
    CorruptTree(DocumentError),
    /// An archive entry could not be read.
    Archive(zip::result::ZipError),
    /// Writing the payload or container failed.
    Encode(String),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAnArchive(_)
            | Self::MissingPayload(_)
            | Self::MalformedMarkup(_)
            | Self::Archive(_) => ErrorKind::Format,
            Self::CorruptTree(_) => ErrorKind::CorruptTree,
            Self::Encode(_) => ErrorKind::Io,
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnArchive(message) => write!(f, "not a mind map archive: {message}"),
            Self::MissingPayload(path) => write!(f, "archive has no `{path}` entry"),
            Self::MalformedMarkup(message) => write!(f, "malformed mind map payload: {message}"),
            Self::CorruptTree(err) => write!(f, "corrupt node tree: {err}"),
            Self::Archive(err) => write!(f, "archive entry unreadable: {err}"),
            Self::Encode(message) => write!(f, "failed to encode mind map: {message}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptTree(err) => Some(err),
            Self::Archive(err) => Some(err),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for CodecError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value)
    }
}

impl From<quick_xml::Error> for CodecError {
    fn from(value: quick_xml::Error) -> Self {
        Self::MalformedMarkup(value.to_string())
    }
}

impl From<DocumentError> for CodecError {
    fn from(value: DocumentError) -> Self {
        Self::CorruptTree(value)
    }
}
