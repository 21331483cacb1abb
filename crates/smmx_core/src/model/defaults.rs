//! Format constants and decode defaults.
//!
//! # Responsibility
//! - Hold every value the decoder substitutes for an absent field.
//! - Hold the fixed identifiers the encoder writes into the archive.
//!
//! # Invariants
//! - Decoder and encoder read defaults only from this table, so that
//!   `decode(encode(d))` reproduces `d` for decoder-produced documents.

/// Reserved `parent` value meaning "this node has no parent".
pub const ROOT_SENTINEL: &str = "-1";

/// Archive entry holding the structured-markup payload.
pub const PAYLOAD_PATH: &str = "document/mindmap.xml";

/// Archive prefix for attachment blobs (`images/<hash>.<ext>`).
pub const ATTACHMENT_PREFIX: &str = "images/";

/// Extension used when writing an attachment whose source extension is unknown.
pub const DEFAULT_ATTACHMENT_EXTENSION: &str = "png";

/// File extension of mind map archives.
pub const FILE_EXTENSION: &str = "smmx";

/// Title used when the payload carries no title.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Style key used when the payload carries no style.
pub const DEFAULT_STYLE_KEY: &str = "system.bright-palette";

/// Zoom percentage used when the payload carries no scroll state.
pub const DEFAULT_ZOOM: i32 = 100;

/// Scroll offset used when the payload carries no scroll state.
pub const DEFAULT_SCROLL: f64 = 0.0;

/// Payload document version written on encode.
pub const DOC_VERSION: &str = "3";

/// Generator identity written on encode.
pub const GENERATOR: &str = "smmx";

/// Fixed numbering mode written into every payload.
pub const AUTO_NUMBERING_STYLE: &str = "disabled";

/// Text format written on every topic.
pub const TEXT_FORMAT: &str = "plain";

/// Perpendicular distance between siblings of a branch node.
pub const SIBLING_SPACING: f64 = 80.0;

/// Horizontal offset of children placed directly under a top-level node.
pub const ROOT_CHILD_OFFSET_X: f64 = 200.0;

/// Vertical stacking distance of children placed directly under a top-level node.
pub const ROOT_CHILD_SPACING_Y: f64 = 100.0;

/// Deepest heading level rendered by the markdown export.
pub const MARKDOWN_MAX_DEPTH: usize = 10;

/// Deepest node nesting the JSON export renders before failing.
pub const JSON_MAX_DEPTH: usize = 256;

/// Number of characters shown in export previews.
pub const EXPORT_PREVIEW_CHARS: usize = 500;
