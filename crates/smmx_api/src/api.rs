//! Tool-facing use-case API.
//!
//! # Responsibility
//! - Expose one function per mind map tool with plain string arguments.
//! - Turn every core result, success or failure, into a [`ToolResponse`].
//!
//! # Invariants
//! - Exported functions never panic and never return `Err`.
//! - Successful structured results are pretty-printed JSON.
//! - Mutations save to `output_path` when given, else back to `filepath`.

use log::{info, warn};
use serde::Serialize;
use smmx_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ExportFormat,
    FsMindMapStore, MindMapService, NewChild, NodeUpdate, ServiceError,
};
use std::path::Path;

/// Number of characters of an export echoed back as preview.
pub const EXPORT_PREVIEW_CHARS: usize = smmx_core::model::defaults::EXPORT_PREVIEW_CHARS;

/// Response envelope shared by every tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// JSON payload, rendered text, or a human-readable message.
    pub text: String,
}

impl ToolResponse {
    fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
        }
    }

    fn failure(text: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: text.into(),
        }
    }
}

/// Output modes of [`read_mindmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFormat {
    /// Nested JSON tree (the default).
    Structured,
    Markdown,
    Json,
    Summary,
}

impl ReadFormat {
    /// Parses a mode name; unknown or missing names mean `Structured`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("markdown") | Some("md") => Self::Markdown,
            Some("json") => Self::Json,
            Some("summary") => Self::Summary,
            _ => Self::Structured,
        }
    }
}

/// Expose core crate version.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Lists every `.smmx` file at or below `path` with title and node count.
pub fn list_mindmaps(path: String) -> ToolResponse {
    let listings = match service().list_mindmaps(Path::new(&path)) {
        Ok(listings) => listings,
        Err(err) => return failure("list_mindmaps", &err),
    };
    if listings.is_empty() {
        return ToolResponse::success(format!("No .smmx files found in: {path}"));
    }

    #[derive(Serialize)]
    struct Listing<'a> {
        count: usize,
        files: &'a [smmx_core::MapListing],
    }
    json_response(
        "list_mindmaps",
        &Listing {
            count: listings.len(),
            files: &listings,
        },
    )
}

/// Reads a document in one of the [`ReadFormat`] modes.
pub fn read_mindmap(filepath: String, format: Option<String>) -> ToolResponse {
    let service = service();
    let path = Path::new(&filepath);
    match ReadFormat::parse(format.as_deref()) {
        ReadFormat::Markdown => {
            text_response("read_mindmap", service.export(path, ExportFormat::Markdown, None))
        }
        ReadFormat::Structured | ReadFormat::Json => {
            text_response("read_mindmap", service.export(path, ExportFormat::Json, None))
        }
        ReadFormat::Summary => match service.summary(path) {
            Ok(summary) => json_response("read_mindmap", &summary),
            Err(err) => failure("read_mindmap", &err),
        },
    }
}

/// Returns one node with its direct children.
pub fn get_node(filepath: String, node_id: String) -> ToolResponse {
    match service().get_node(Path::new(&filepath), &node_id) {
        Ok(info) => json_response("get_node", &info),
        Err(err) => failure("get_node", &err),
    }
}

/// Case-insensitive search over node text, and notes unless disabled.
pub fn search_nodes(filepath: String, query: String, search_notes: Option<bool>) -> ToolResponse {
    let include_notes = search_notes.unwrap_or(true);
    match service().search(Path::new(&filepath), &query, include_notes) {
        Ok(report) if report.count == 0 => {
            ToolResponse::success(format!("No nodes found matching '{query}'"))
        }
        Ok(report) => json_response("search_nodes", &report),
        Err(err) => failure("search_nodes", &err),
    }
}

/// Exports to Markdown or JSON, optionally writing the result to a file.
pub fn export_mindmap(
    filepath: String,
    format: String,
    output_path: Option<String>,
) -> ToolResponse {
    let Some(format) = ExportFormat::parse(&format) else {
        return ToolResponse::failure(format!(
            "Error: unsupported export format '{format}'; expected markdown or json"
        ));
    };
    let output = output_path.as_deref().map(Path::new);
    let content = match service().export(Path::new(&filepath), format, output) {
        Ok(content) => content,
        Err(err) => return failure("export_mindmap", &err),
    };

    let mut message = match format {
        ExportFormat::Markdown => "Exported to Markdown".to_string(),
        ExportFormat::Json => "Exported to JSON".to_string(),
    };
    if let Some(output_path) = output_path {
        message.push_str(&format!(" at: {output_path}"));
    }
    let preview = content.chars().take(EXPORT_PREVIEW_CHARS).collect::<String>();
    log_ok("export_mindmap");
    ToolResponse::success(format!("{message}\n\nPreview:\n{preview}..."))
}

/// Adds a child under `parent_id` and saves the document.
pub fn add_node(
    filepath: String,
    parent_id: String,
    text: String,
    notes: Option<String>,
    output_path: Option<String>,
) -> ToolResponse {
    let request = NewChild::new(parent_id.clone(), text).with_notes(notes.unwrap_or_default());
    let output = output_path.as_deref().map(Path::new);
    match service().insert_child(Path::new(&filepath), request, output) {
        Ok(change) => {
            log_ok("add_node");
            ToolResponse::success(format!(
                "Added node '{}' with ID {} under parent {parent_id}\nSaved to: {}",
                change.text,
                change.node_id,
                change.saved_to.display()
            ))
        }
        Err(err) => failure("add_node", &err),
    }
}

/// Updates text and/or notes of one node and saves the document.
///
/// `None` leaves a field untouched; `Some("")` clears notes.
pub fn update_node(
    filepath: String,
    node_id: String,
    text: Option<String>,
    notes: Option<String>,
    output_path: Option<String>,
) -> ToolResponse {
    let mut changes = Vec::new();
    if let Some(text) = &text {
        changes.push(format!("text -> '{text}'"));
    }
    if let Some(notes) = &notes {
        changes.push(format!("notes -> {} characters", notes.chars().count()));
    }

    let output = output_path.as_deref().map(Path::new);
    let update = NodeUpdate { text, notes };
    match service().update_node(Path::new(&filepath), &node_id, update, output) {
        Ok(change) => {
            log_ok("update_node");
            ToolResponse::success(format!(
                "Updated node {node_id}: {}\nSaved to: {}",
                changes.join(", "),
                change.saved_to.display()
            ))
        }
        Err(err) => failure("update_node", &err),
    }
}

/// Deletes a node and all of its descendants, then saves the document.
pub fn delete_node(filepath: String, node_id: String, output_path: Option<String>) -> ToolResponse {
    let output = output_path.as_deref().map(Path::new);
    match service().delete_node(Path::new(&filepath), &node_id, output) {
        Ok(change) => {
            log_ok("delete_node");
            ToolResponse::success(format!(
                "Deleted node '{}' and {} descendants\nSaved to: {}",
                change.text,
                change.removed.saturating_sub(1),
                change.saved_to.display()
            ))
        }
        Err(err) => failure("delete_node", &err),
    }
}

/// Returns the root-to-node path with a `A > B > C` breadcrumb.
pub fn get_node_path(filepath: String, node_id: String) -> ToolResponse {
    match service().resolve_path(Path::new(&filepath), &node_id) {
        Ok(path) => json_response("get_node_path", &path),
        Err(err) => failure("get_node_path", &err),
    }
}

/// Lists non-top-level nodes that have no notes.
pub fn find_nodes_without_notes(filepath: String) -> ToolResponse {
    match service().nodes_without_notes(Path::new(&filepath)) {
        Ok(listing) => json_response("find_nodes_without_notes", &listing),
        Err(err) => failure("find_nodes_without_notes", &err),
    }
}

fn service() -> MindMapService<FsMindMapStore> {
    MindMapService::new(FsMindMapStore::new())
}

fn json_response(tool: &str, value: &impl Serialize) -> ToolResponse {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            log_ok(tool);
            ToolResponse::success(text)
        }
        Err(err) => failure(tool, &ServiceError::Render(err)),
    }
}

fn text_response(tool: &str, result: Result<String, ServiceError>) -> ToolResponse {
    match result {
        Ok(text) => {
            log_ok(tool);
            ToolResponse::success(text)
        }
        Err(err) => failure(tool, &err),
    }
}

fn log_ok(tool: &str) {
    info!("event=tool_call module=api tool={tool} status=ok");
}

fn failure(tool: &str, err: &ServiceError) -> ToolResponse {
    warn!(
        "event=tool_call module=api tool={tool} status=error error_kind={}",
        err.kind()
    );
    ToolResponse::failure(format!("Error: {err}"))
}
