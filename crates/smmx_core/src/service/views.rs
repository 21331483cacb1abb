//! Serializable read models returned by the mind map service.

use crate::model::document::{breadcrumb, MindMap, PathEntry};
use crate::model::node::{Node, Position};
use serde::Serialize;
use std::path::PathBuf;

/// Node details used by lookups and listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub id: String,
    pub text: String,
    pub notes: String,
    pub parent_id: String,
    pub guid: String,
    pub position: Position,
    pub child_count: usize,
    /// Direct children; omitted from search and listing results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PathEntry>>,
}

impl NodeInfo {
    pub fn from_node(map: &MindMap, node: &Node, include_children: bool) -> Self {
        Self {
            id: node.id.clone(),
            text: node.text.clone(),
            notes: node.notes.clone(),
            parent_id: node.parent_id.clone(),
            guid: node.guid.clone(),
            position: node.position,
            child_count: node.children().len(),
            children: include_children.then(|| {
                map.children_of(&node.id)
                    .map(|child| PathEntry {
                        id: child.id.clone(),
                        text: child.text.clone(),
                    })
                    .collect()
            }),
        }
    }
}

/// One first-level branch in a [`MapSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchSummary {
    pub id: String,
    pub text: String,
    pub child_count: usize,
}

/// Overview of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub title: String,
    pub total_nodes: usize,
    pub root_node: Option<String>,
    pub top_level_branches: Vec<BranchSummary>,
}

impl MapSummary {
    pub fn from_map(map: &MindMap) -> Self {
        let root = map.root();
        Self {
            title: map.meta.title.clone(),
            total_nodes: map.len(),
            root_node: root.map(|node| node.text.clone()),
            top_level_branches: root
                .map(|node| {
                    map.children_of(&node.id)
                        .map(|child| BranchSummary {
                            id: child.id.clone(),
                            text: child.text.clone(),
                            child_count: child.children().len(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// One discovered archive, summarized or with the reason it failed to load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapListing {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Matches of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub count: usize,
    pub results: Vec<NodeInfo>,
}

/// Root-to-node path of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePath {
    pub node_id: String,
    pub path: Vec<PathEntry>,
    pub breadcrumb: String,
}

impl NodePath {
    pub fn new(node_id: impl Into<String>, path: Vec<PathEntry>) -> Self {
        let breadcrumb = breadcrumb(&path);
        Self {
            node_id: node_id.into(),
            path,
            breadcrumb,
        }
    }
}

/// Nodes that still need notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeListing {
    pub count: usize,
    pub nodes: Vec<NodeInfo>,
}

/// Outcome of a mutating use case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedChange {
    /// Node created, updated or deleted.
    pub node_id: String,
    /// Node text after the change (before it, for deletions).
    pub text: String,
    /// Nodes removed, the target included; zero for inserts and updates.
    pub removed: usize,
    pub saved_to: PathBuf,
}
