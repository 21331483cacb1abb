//! ZIP container access.
//!
//! Entries are written with a fixed timestamp so identical documents
//! produce identical bytes.

use super::{CodecError, CodecResult};
use crate::model::defaults::{ATTACHMENT_PREFIX, DEFAULT_ATTACHMENT_EXTENSION, PAYLOAD_PATH};
use crate::model::document::Attachment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

static ATTACHMENT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}([^/]+)\.([A-Za-z0-9]+)$",
        regex::escape(ATTACHMENT_PREFIX)
    ))
    .expect("valid attachment path regex")
});

/// Raw contents of a mind map container.
pub(super) struct ArchiveContents {
    pub payload: Vec<u8>,
    pub attachments: BTreeMap<String, Attachment>,
}

/// Splits `images/<hash>.<ext>` into `(hash, ext)`.
///
/// Returns `None` for paths outside the attachment namespace.
pub fn parse_attachment_path(path: &str) -> Option<(&str, &str)> {
    let captures = ATTACHMENT_PATH_RE.captures(path)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

pub(super) fn read_archive(bytes: &[u8]) -> CodecResult<ArchiveContents> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| CodecError::NotAnArchive(err.to_string()))?;

    let payload = match archive.by_name(PAYLOAD_PATH) {
        Ok(mut entry) => read_entry(&mut entry)?,
        Err(ZipError::FileNotFound) => return Err(CodecError::MissingPayload(PAYLOAD_PATH)),
        Err(err) => return Err(err.into()),
    };

    let mut attachments = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if let Some((hash, extension)) = parse_attachment_path(&name) {
            let data = read_entry(&mut entry)?;
            attachments.insert(
                hash.to_string(),
                Attachment {
                    extension: extension.to_string(),
                    data,
                },
            );
        }
    }

    Ok(ArchiveContents {
        payload,
        attachments,
    })
}

pub(super) fn write_archive(
    payload: &[u8],
    attachments: &BTreeMap<String, Attachment>,
) -> CodecResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(PAYLOAD_PATH, options)?;
    writer.write_all(payload).map_err(ZipError::from)?;

    for (hash, attachment) in attachments {
        let extension = match attachment.extension.as_str() {
            "" => DEFAULT_ATTACHMENT_EXTENSION,
            extension => extension,
        };
        writer.start_file(format!("{ATTACHMENT_PREFIX}{hash}.{extension}"), options)?;
        writer.write_all(&attachment.data).map_err(ZipError::from)?;
    }

    Ok(writer.finish()?.into_inner())
}

fn read_entry(entry: &mut impl Read) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    entry.read_to_end(&mut buffer).map_err(ZipError::from)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::{parse_attachment_path, read_archive, write_archive};
    use crate::codec::CodecError;
    use crate::model::document::Attachment;
    use std::collections::BTreeMap;

    #[test]
    fn attachment_paths_split_into_hash_and_extension() {
        assert_eq!(
            parse_attachment_path("images/ABC123.png"),
            Some(("ABC123", "png"))
        );
        assert_eq!(
            parse_attachment_path("images/photo.v2.jpeg"),
            Some(("photo.v2", "jpeg"))
        );
        assert_eq!(parse_attachment_path("images/nested/a.png"), None);
        assert_eq!(parse_attachment_path("document/mindmap.xml"), None);
        assert_eq!(parse_attachment_path("images/"), None);
    }

    #[test]
    fn written_container_reads_back_payload_and_attachments() {
        let mut attachments = BTreeMap::new();
        attachments.insert(
            "HASH".to_string(),
            Attachment {
                extension: "jpg".to_string(),
                data: vec![0xff, 0xd8, 0xff],
            },
        );

        let bytes = write_archive(b"<x/>", &attachments).unwrap();
        let contents = read_archive(&bytes).unwrap();
        assert_eq!(contents.payload, b"<x/>");
        assert_eq!(contents.attachments, attachments);
    }

    #[test]
    fn attachments_without_extension_are_written_as_png() {
        let mut attachments = BTreeMap::new();
        attachments.insert(
            "RAW".to_string(),
            Attachment {
                extension: String::new(),
                data: vec![1, 2, 3],
            },
        );

        let bytes = write_archive(b"<x/>", &attachments).unwrap();
        let contents = read_archive(&bytes).unwrap();
        assert_eq!(contents.attachments["RAW"].extension, "png");
    }

    #[test]
    fn writing_is_deterministic() {
        let attachments = BTreeMap::new();
        let first = write_archive(b"<x/>", &attachments).unwrap();
        let second = write_archive(b"<x/>", &attachments).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn non_zip_bytes_are_rejected() {
        let err = read_archive(b"definitely not a zip").err().unwrap();
        assert!(matches!(err, CodecError::NotAnArchive(_)));
    }
}
