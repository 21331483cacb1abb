//! Mind map document model.
//!
//! # Responsibility
//! - Own the node collection and the derived children sequences.
//! - Provide the query and mutation API used by services and codecs.
//!
//! # Invariants
//! - A node appears in its parent's children iff its `parent_id` names
//!   that parent.
//! - Every non-top-level node's parent is present (checked by
//!   [`MindMap::validate`]).
//! - Nodes are created only by [`MindMap::add_node`] and removed only by
//!   [`MindMap::delete_node`], which removes whole subtrees.
//! - Mapping iteration order is insertion order.

use crate::error::ErrorKind;
use crate::model::defaults::{DEFAULT_SCROLL, DEFAULT_STYLE_KEY, DEFAULT_TITLE, DEFAULT_ZOOM};
use crate::model::node::{Node, NodeId};
use crate::model::placement::place_child;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type used by document model operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors from document model operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Target node does not exist.
    NodeNotFound(NodeId),
    /// Parent named by an insert does not exist.
    ParentNotFound(NodeId),
    /// Top-level nodes cannot be deleted.
    CannotDeleteRoot(NodeId),
    /// Update carried neither text nor notes.
    EmptyUpdate(NodeId),
    /// Id generation needs every existing id to be numeric.
    NonNumericId(NodeId),
    /// Id already present in the document.
    DuplicateId(NodeId),
    /// Following parent links from this node never reaches a top-level node.
    CycleDetected { node_id: NodeId },
    /// Parent link points at a node that does not exist.
    DanglingParent { node_id: NodeId, parent_id: NodeId },
}

impl DocumentError {
    /// Coarse failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound(_) | Self::ParentNotFound(_) => ErrorKind::NotFound,
            Self::CannotDeleteRoot(_)
            | Self::EmptyUpdate(_)
            | Self::NonNumericId(_)
            | Self::DuplicateId(_) => ErrorKind::InvalidOperation,
            Self::CycleDetected { .. } | Self::DanglingParent { .. } => ErrorKind::CorruptTree,
        }
    }
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node with ID '{id}' not found"),
            Self::ParentNotFound(id) => write!(f, "parent node with ID '{id}' not found"),
            Self::CannotDeleteRoot(id) => write!(f, "cannot delete the root node '{id}'"),
            Self::EmptyUpdate(id) => {
                write!(f, "must provide either text or notes to update node '{id}'")
            }
            Self::NonNumericId(id) => write!(
                f,
                "cannot generate a node id: existing id '{id}' is not numeric"
            ),
            Self::DuplicateId(id) => write!(f, "node with ID '{id}' already exists"),
            Self::CycleDetected { node_id } => {
                write!(f, "parent links form a cycle at node '{node_id}'")
            }
            Self::DanglingParent { node_id, parent_id } => write!(
                f,
                "node '{node_id}' references missing parent '{parent_id}'"
            ),
        }
    }
}

impl Error for DocumentError {}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMeta {
    pub title: String,
    pub guid: String,
    /// Style key of the whole map.
    pub style: String,
    /// Viewport zoom percentage.
    pub zoom: i32,
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Whether the payload declares embedded images.
    pub contains_images: bool,
}

impl Default for MapMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            guid: String::new(),
            style: DEFAULT_STYLE_KEY.to_string(),
            zoom: DEFAULT_ZOOM,
            scroll_x: DEFAULT_SCROLL,
            scroll_y: DEFAULT_SCROLL,
            contains_images: false,
        }
    }
}

/// Non-hierarchical cross-link between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub guid: String,
    pub source: NodeId,
    pub target: NodeId,
}

/// Binary blob stored next to the payload, keyed by its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File extension used inside the archive, without the dot.
    pub extension: String,
    pub data: Vec<u8>,
}

/// One step of a root-to-node path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    pub id: NodeId,
    pub text: String,
}

/// Renders a resolved path as `Root > Branch > Leaf`.
pub fn breadcrumb(path: &[PathEntry]) -> String {
    path.iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Request for [`MindMap::insert_child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChild {
    pub parent_id: NodeId,
    pub text: String,
    pub notes: String,
    /// Caller-chosen id; when `None` the next numeric id is generated.
    pub id: Option<NodeId>,
}

impl NewChild {
    pub fn new(parent_id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            text: text.into(),
            notes: String::new(),
            id: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Partial update for [`MindMap::update_node`].
///
/// `None` leaves a field untouched; `Some(String::new())` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeUpdate {
    pub text: Option<String>,
    pub notes: Option<String>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.notes.is_none()
    }
}

/// A complete mind map document.
#[derive(Debug, Clone, PartialEq)]
pub struct MindMap {
    pub meta: MapMeta,
    pub relations: Vec<Relation>,
    /// Attachment blobs keyed by hash; ordered for deterministic output.
    ///
    /// A document with attachments always declares images in its meta, so
    /// add blobs through [`MindMap::add_attachment`].
    pub attachments: BTreeMap<String, Attachment>,
    nodes: IndexMap<NodeId, Node>,
    root: Option<NodeId>,
}

impl Default for MindMap {
    fn default() -> Self {
        Self::with_meta(MapMeta::default())
    }
}

impl MindMap {
    /// Creates an empty document with a fresh guid.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_meta(MapMeta {
            title: title.into(),
            guid: new_guid(),
            ..MapMeta::default()
        })
    }

    /// Creates an empty document carrying the given metadata.
    pub fn with_meta(meta: MapMeta) -> Self {
        Self {
            meta,
            relations: Vec::new(),
            attachments: BTreeMap::new(),
            nodes: IndexMap::new(),
            root: None,
        }
    }

    /// Stores an attachment blob and marks the document as containing images.
    pub fn add_attachment(&mut self, hash: impl Into<String>, attachment: Attachment) {
        self.attachments.insert(hash.into(), attachment);
        self.meta.contains_images = true;
    }

    /// Builds a document from nodes in any order.
    ///
    /// All nodes are inserted first and linked afterwards, so children may
    /// precede their parents. The result is validated.
    pub fn from_nodes(
        meta: MapMeta,
        nodes: impl IntoIterator<Item = Node>,
    ) -> DocumentResult<Self> {
        let mut map = Self::with_meta(meta);
        for mut node in nodes {
            if map.nodes.contains_key(&node.id) {
                return Err(DocumentError::DuplicateId(node.id));
            }
            node.clear_children();
            map.nodes.insert(node.id.clone(), node);
        }
        map.rebuild_children();
        map.validate()?;
        Ok(map)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns the node or `None`; never fails for a missing id.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// The designated root.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref().and_then(|id| self.nodes.get(id))
    }

    /// Every node parented to the root sentinel, designated root included.
    pub fn top_level_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.is_top_level())
    }

    /// Resolved direct children of `id` in order.
    pub fn children_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .get(id)
            .map(|node| node.children())
            .unwrap_or_default()
            .iter()
            .filter_map(|child_id| self.nodes.get(child_id))
    }

    /// Makes `id` the designated root if it is a top-level node.
    ///
    /// Returns whether the designation changed.
    pub fn designate_root(&mut self, id: &str) -> bool {
        match self.nodes.get(id) {
            Some(node) if node.is_top_level() => {
                self.root = Some(node.id.clone());
                true
            }
            _ => false,
        }
    }

    /// Inserts one node.
    ///
    /// A top-level node becomes the designated root when none is set yet.
    /// Otherwise the node is appended to its parent's children when the
    /// parent is already present; if it is not, linking is left to
    /// [`MindMap::rebuild_children`].
    pub fn add_node(&mut self, mut node: Node) -> DocumentResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(DocumentError::DuplicateId(node.id));
        }
        node.clear_children();

        if node.is_top_level() {
            if self.root.is_none() {
                self.root = Some(node.id.clone());
            }
        } else if let Some(parent) = self.nodes.get_mut(&node.parent_id) {
            parent.push_child(node.id.clone());
        }

        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Recomputes every children sequence from the `parent_id` relation.
    ///
    /// Sibling order follows mapping order. Also designates the first
    /// top-level node as root when none is set.
    pub fn rebuild_children(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_children();
        }

        let links = self
            .nodes
            .values()
            .filter(|node| !node.is_top_level() && node.parent_id != node.id)
            .map(|node| (node.parent_id.clone(), node.id.clone()))
            .collect::<Vec<_>>();
        for (parent_id, child_id) in links {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.push_child(child_id);
            }
        }

        if self.root().is_none() {
            let first = self.top_level_nodes().next().map(|node| node.id.clone());
            self.root = first;
        }
    }

    /// Checks that every parent link resolves and the tree has no cycles.
    pub fn validate(&self) -> DocumentResult<()> {
        for node in self.nodes.values() {
            if !node.is_top_level() && !self.nodes.contains_key(&node.parent_id) {
                return Err(DocumentError::DanglingParent {
                    node_id: node.id.clone(),
                    parent_id: node.parent_id.clone(),
                });
            }
        }

        let reachable = self.collect_reachable();
        match self.nodes.keys().find(|id| !reachable.contains(id.as_str())) {
            Some(node_id) => Err(DocumentError::CycleDetected {
                node_id: node_id.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Case-insensitive substring search over text, and notes when asked.
    ///
    /// Each node is returned at most once, in mapping order. An empty query
    /// matches every node.
    pub fn search_nodes(&self, query: &str, include_notes: bool) -> Vec<&Node> {
        let needle = query.to_lowercase();
        self.nodes
            .values()
            .filter(|node| {
                node.text.to_lowercase().contains(&needle)
                    || (include_notes && node.notes.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Nodes with empty notes, excluding top-level nodes.
    pub fn nodes_without_notes(&self) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|node| node.notes.is_empty() && !node.is_top_level())
            .collect()
    }

    /// Deletes a node and its whole subtree.
    ///
    /// Relations touching a removed node are dropped as well. Returns the
    /// number of removed nodes, the target included.
    pub fn delete_node(&mut self, id: &str) -> DocumentResult<usize> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.to_string()))?;
        if node.is_top_level() {
            return Err(DocumentError::CannotDeleteRoot(id.to_string()));
        }

        let parent_id = node.parent_id.clone();
        let doomed = self.collect_subtree(id);

        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.remove_child(id);
        }
        for doomed_id in &doomed {
            self.nodes.shift_remove(doomed_id);
        }

        let removed = doomed.iter().map(String::as_str).collect::<HashSet<_>>();
        self.relations.retain(|relation| {
            !removed.contains(relation.source.as_str())
                && !removed.contains(relation.target.as_str())
        });

        Ok(doomed.len())
    }

    /// Returns the `(id, text)` chain from the top-level ancestor to `id`.
    ///
    /// The walk is bounded by the number of nodes, so cyclic parent links
    /// fail instead of looping.
    pub fn resolve_path(&self, id: &str) -> DocumentResult<Vec<PathEntry>> {
        let mut current = self
            .nodes
            .get(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.to_string()))?;
        let mut path = Vec::new();

        loop {
            if path.len() >= self.nodes.len() {
                return Err(DocumentError::CycleDetected {
                    node_id: id.to_string(),
                });
            }
            path.push(PathEntry {
                id: current.id.clone(),
                text: current.text.clone(),
            });
            if current.is_top_level() {
                break;
            }
            current = self.nodes.get(&current.parent_id).ok_or_else(|| {
                DocumentError::DanglingParent {
                    node_id: current.id.clone(),
                    parent_id: current.parent_id.clone(),
                }
            })?;
        }

        path.reverse();
        Ok(path)
    }

    /// Returns one more than the largest numeric id, or `"0"` when empty.
    ///
    /// Ids are compared as decimal numbers of any length.
    pub fn next_node_id(&self) -> DocumentResult<NodeId> {
        let mut max_id: Option<&str> = None;
        for id in self.nodes.keys() {
            let value =
                decimal_digits(id).ok_or_else(|| DocumentError::NonNumericId(id.clone()))?;
            let is_larger = max_id.map_or(true, |current| {
                (value.len(), value) > (current.len(), current)
            });
            if is_larger {
                max_id = Some(value);
            }
        }
        Ok(max_id.map_or_else(|| "0".to_string(), increment_decimal))
    }

    /// Creates a child under an existing node and returns its id.
    ///
    /// The position follows [`place_child`]; the guid is freshly generated.
    pub fn insert_child(&mut self, request: NewChild) -> DocumentResult<NodeId> {
        let parent = self
            .nodes
            .get(&request.parent_id)
            .ok_or_else(|| DocumentError::ParentNotFound(request.parent_id.clone()))?;

        let id = match request.id {
            Some(id) => id,
            None => self.next_node_id()?,
        };
        if self.nodes.contains_key(&id) {
            return Err(DocumentError::DuplicateId(id));
        }

        let grandparent = if parent.is_top_level() {
            None
        } else {
            self.nodes.get(&parent.parent_id).map(|node| node.position)
        };
        let position = place_child(grandparent, parent.position, parent.children().len());

        let node = Node::new(id.clone(), request.text, request.parent_id)
            .with_position(position.x, position.y)
            .with_notes(request.notes)
            .with_guid(new_guid());
        self.add_node(node)?;
        Ok(id)
    }

    /// Applies the provided fields of `update` to an existing node.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> DocumentResult<&Node> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.to_string()))?;
        if update.is_empty() {
            return Err(DocumentError::EmptyUpdate(id.to_string()));
        }

        if let Some(text) = update.text {
            node.text = text;
        }
        if let Some(notes) = update.notes {
            node.notes = notes;
        }
        Ok(&*node)
    }

    fn collect_subtree(&self, id: &str) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children().iter().rev().cloned());
            }
            ordered.push(current);
        }
        ordered
    }

    fn collect_reachable(&self) -> HashSet<&str> {
        let mut reachable = HashSet::new();
        let mut stack = self
            .top_level_nodes()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        while let Some(current) = stack.pop() {
            if !reachable.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children().iter().map(String::as_str));
            }
        }
        reachable
    }
}

/// Returns `id` without leading zeros when it is a plain decimal number.
fn decimal_digits(id: &str) -> Option<&str> {
    if id.is_empty() || !id.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let trimmed = id.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed })
}

/// Adds one to a decimal digit string.
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    bytes.insert(0, b'1');
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Generates an upper-case hex guid.
pub fn new_guid() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}
