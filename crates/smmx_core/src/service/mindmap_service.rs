//! Mind map use-case service.
//!
//! # Responsibility
//! - Run load-query and load-mutate-save cycles over a [`MindMapStore`].
//! - Return serializable read models; formatting for people is left to
//!   callers.
//!
//! # Invariants
//! - Every mutation writes the whole document, to the source path or to the
//!   caller-supplied output path.
//! - A failed mutation never writes.

use crate::error::ErrorKind;
use crate::export::{to_json, to_markdown, ExportFormat};
use crate::model::document::{DocumentError, MindMap, NewChild, NodeUpdate};
use crate::service::views::{
    MapListing, MapSummary, NodeInfo, NodeListing, NodePath, SavedChange, SearchReport,
};
use crate::store::{MindMapStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Result type used by mind map service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from mind map service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Loading or saving failed.
    Store(StoreError),
    /// The requested change violates a document rule.
    Document(DocumentError),
    /// A JSON rendering could not be produced.
    Render(serde_json::Error),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) => err.kind(),
            Self::Document(err) => err.kind(),
            Self::Render(_) => ErrorKind::Format,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "failed to render JSON: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DocumentError> for ServiceError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

/// Mind map service facade.
pub struct MindMapService<S: MindMapStore> {
    store: S,
}

impl<S: MindMapStore> MindMapService<S> {
    /// Creates service from store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Summarizes every archive at or below `location`.
    ///
    /// Files that fail to load are listed with their error instead of
    /// aborting the listing.
    pub fn list_mindmaps(&self, location: &Path) -> ServiceResult<Vec<MapListing>> {
        let files = self.store.discover(location)?;
        Ok(files
            .into_iter()
            .map(|path| match self.store.load(&path) {
                Ok(map) => MapListing {
                    path,
                    title: Some(map.meta.title.clone()),
                    node_count: Some(map.len()),
                    error: None,
                },
                Err(err) => MapListing {
                    path,
                    title: None,
                    node_count: None,
                    error: Some(err.to_string()),
                },
            })
            .collect())
    }

    /// Loads the whole document.
    pub fn read(&self, path: &Path) -> ServiceResult<MindMap> {
        Ok(self.store.load(path)?)
    }

    pub fn summary(&self, path: &Path) -> ServiceResult<MapSummary> {
        Ok(MapSummary::from_map(&self.read(path)?))
    }

    /// Returns one node with its direct children.
    pub fn get_node(&self, path: &Path, node_id: &str) -> ServiceResult<NodeInfo> {
        let map = self.read(path)?;
        let node = map
            .get_node(node_id)
            .ok_or_else(|| DocumentError::NodeNotFound(node_id.to_string()))?;
        Ok(NodeInfo::from_node(&map, node, true))
    }

    pub fn search(
        &self,
        path: &Path,
        query: &str,
        include_notes: bool,
    ) -> ServiceResult<SearchReport> {
        let map = self.read(path)?;
        let results = map
            .search_nodes(query, include_notes)
            .into_iter()
            .map(|node| NodeInfo::from_node(&map, node, false))
            .collect::<Vec<_>>();
        Ok(SearchReport {
            query: query.to_string(),
            count: results.len(),
            results,
        })
    }

    /// Renders the document and, when `output` is given, publishes the text.
    pub fn export(
        &self,
        path: &Path,
        format: ExportFormat,
        output: Option<&Path>,
    ) -> ServiceResult<String> {
        let map = self.read(path)?;
        let content = match format {
            ExportFormat::Markdown => to_markdown(&map),
            ExportFormat::Json => to_json(&map)?,
        };
        if let Some(output) = output {
            self.store.write_text(output, &content)?;
        }
        Ok(content)
    }

    /// Inserts a child node and saves the document.
    pub fn insert_child(
        &self,
        path: &Path,
        request: NewChild,
        output: Option<&Path>,
    ) -> ServiceResult<SavedChange> {
        let mut map = self.read(path)?;
        let text = request.text.clone();
        let node_id = map.insert_child(request)?;
        let saved_to = self.save(&map, path, output)?;
        Ok(SavedChange {
            node_id,
            text,
            removed: 0,
            saved_to,
        })
    }

    /// Updates text and/or notes of one node and saves the document.
    pub fn update_node(
        &self,
        path: &Path,
        node_id: &str,
        update: NodeUpdate,
        output: Option<&Path>,
    ) -> ServiceResult<SavedChange> {
        let mut map = self.read(path)?;
        let text = map.update_node(node_id, update)?.text.clone();
        let saved_to = self.save(&map, path, output)?;
        Ok(SavedChange {
            node_id: node_id.to_string(),
            text,
            removed: 0,
            saved_to,
        })
    }

    /// Deletes a node with its subtree and saves the document.
    pub fn delete_node(
        &self,
        path: &Path,
        node_id: &str,
        output: Option<&Path>,
    ) -> ServiceResult<SavedChange> {
        let mut map = self.read(path)?;
        let text = map
            .get_node(node_id)
            .map(|node| node.text.clone())
            .unwrap_or_default();
        let removed = map.delete_node(node_id)?;
        let saved_to = self.save(&map, path, output)?;
        Ok(SavedChange {
            node_id: node_id.to_string(),
            text,
            removed,
            saved_to,
        })
    }

    pub fn resolve_path(&self, path: &Path, node_id: &str) -> ServiceResult<NodePath> {
        let map = self.read(path)?;
        Ok(NodePath::new(node_id, map.resolve_path(node_id)?))
    }

    pub fn nodes_without_notes(&self, path: &Path) -> ServiceResult<NodeListing> {
        let map = self.read(path)?;
        let nodes = map
            .nodes_without_notes()
            .into_iter()
            .map(|node| NodeInfo::from_node(&map, node, false))
            .collect::<Vec<_>>();
        Ok(NodeListing {
            count: nodes.len(),
            nodes,
        })
    }

    fn save(
        &self,
        map: &MindMap,
        source: &Path,
        output: Option<&Path>,
    ) -> ServiceResult<PathBuf> {
        let target = output.unwrap_or(source);
        self.store.save(map, target)?;
        Ok(target.to_path_buf())
    }
}
