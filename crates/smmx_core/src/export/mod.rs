//! Text renderers over a decoded document.
//!
//! Renderers are pure: they never mutate the document or touch the file
//! system.

pub mod json;
pub mod markdown;

pub use json::{to_json, JsonExport, JsonNode};
pub use markdown::{to_markdown, to_markdown_with_depth};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    /// Parses a user-supplied format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }
}
