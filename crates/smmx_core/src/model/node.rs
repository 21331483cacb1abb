//! Mind map node entity.
//!
//! # Responsibility
//! - Define the canonical record for one topic of a mind map.
//! - Provide the flat representation used by JSON views and exports.
//!
//! # Invariants
//! - `id` is unique within one document.
//! - `children` is a cache derived from `parent_id`; only the document model
//!   writes it.
//! - Extended attributes are empty strings when absent from the source and
//!   are omitted from the flat representation in that case.

use crate::model::defaults::ROOT_SENTINEL;
use serde::Serialize;

/// Identifier of a node, unique within one document.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NodeId = String;

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position from raw coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Layout hints attached to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Layout {
    pub mode: String,
    pub direction: String,
    pub flow: String,
}

impl Layout {
    /// Returns whether this layout carries no information worth writing.
    pub fn is_empty(&self) -> bool {
        self.mode.is_empty() && self.direction.is_empty() && self.flow.is_empty()
    }
}

/// One topic of a mind map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Document-unique identifier.
    pub id: NodeId,
    /// Display label.
    pub text: String,
    /// Parent identifier, or [`ROOT_SENTINEL`] for top-level nodes.
    pub parent_id: NodeId,
    pub position: Position,
    /// Free-form notes; empty when the topic has none.
    pub notes: String,
    /// Stable external identifier, distinct from `id`.
    pub guid: String,
    /// Palette styling key.
    pub palette: String,
    /// Colour styling key.
    pub colorinfo: String,
    /// Icon reference.
    pub icon: String,
    /// External link target.
    pub url_link: String,
    pub layout: Layout,
    /// Guid of the styled connection to the parent.
    pub parent_relation_guid: String,
    children: Vec<NodeId>,
}

impl Node {
    /// Creates a node with empty notes, guid and extended attributes.
    pub fn new(
        id: impl Into<NodeId>,
        text: impl Into<String>,
        parent_id: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            parent_id: parent_id.into(),
            position: Position::default(),
            notes: String::new(),
            guid: String::new(),
            palette: String::new(),
            colorinfo: String::new(),
            icon: String::new(),
            url_link: String::new(),
            layout: Layout::default(),
            parent_relation_guid: String::new(),
            children: Vec::new(),
        }
    }

    /// Creates a top-level node (parented to [`ROOT_SENTINEL`]).
    pub fn root(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self::new(id, text, ROOT_SENTINEL)
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = guid.into();
        self
    }

    /// Returns whether this node hangs directly off the root sentinel.
    pub fn is_top_level(&self) -> bool {
        self.parent_id == ROOT_SENTINEL
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child_id: NodeId) {
        self.children.push(child_id);
    }

    pub(crate) fn remove_child(&mut self, child_id: &str) {
        self.children.retain(|id| id != child_id);
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Returns the flat representation of this node.
    ///
    /// Core fields are always present; extended attributes only when set.
    pub fn to_flat(&self) -> FlatNode<'_> {
        FlatNode {
            id: &self.id,
            text: &self.text,
            parent_id: &self.parent_id,
            x: self.position.x,
            y: self.position.y,
            notes: &self.notes,
            guid: &self.guid,
            palette: &self.palette,
            colorinfo: &self.colorinfo,
            icon: &self.icon,
            url_link: &self.url_link,
            layout: (!self.layout.is_empty()).then_some(&self.layout),
            parent_relation_guid: &self.parent_relation_guid,
        }
    }
}

/// Borrowed flat view of a [`Node`], serialized without children.
#[derive(Debug, Clone, Serialize)]
pub struct FlatNode<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub parent_id: &'a str,
    pub x: f64,
    pub y: f64,
    pub notes: &'a str,
    pub guid: &'a str,
    pub palette: &'a str,
    pub colorinfo: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    pub icon: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    pub url_link: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<&'a Layout>,
    #[serde(skip_serializing_if = "is_blank")]
    pub parent_relation_guid: &'a str,
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

#[cfg(test)]
mod tests {
    use super::{Layout, Node};

    #[test]
    fn flat_view_omits_empty_extended_attributes() {
        let node = Node::root("0", "Root").with_position(400.0, 400.0);
        let json = serde_json::to_value(node.to_flat()).unwrap();

        assert_eq!(json["id"], "0");
        assert_eq!(json["parent_id"], "-1");
        assert_eq!(json["x"], 400.0);
        assert_eq!(json["palette"], "");
        assert!(json.get("icon").is_none());
        assert!(json.get("url_link").is_none());
        assert!(json.get("layout").is_none());
        assert!(json.get("parent_relation_guid").is_none());
    }

    #[test]
    fn flat_view_includes_set_extended_attributes() {
        let mut node = Node::root("0", "Root");
        node.icon = "star".to_string();
        node.url_link = "https://example.com".to_string();
        node.layout = Layout {
            mode: "horizontal".to_string(),
            direction: "right".to_string(),
            flow: "linear".to_string(),
        };

        let json = serde_json::to_value(node.to_flat()).unwrap();
        assert_eq!(json["icon"], "star");
        assert_eq!(json["url_link"], "https://example.com");
        assert_eq!(json["layout"]["mode"], "horizontal");
        assert_eq!(json["layout"]["direction"], "right");
        assert_eq!(json["layout"]["flow"], "linear");
    }

    #[test]
    fn top_level_is_derived_from_sentinel() {
        assert!(Node::root("0", "Root").is_top_level());
        assert!(!Node::new("1", "Child", "0").is_top_level());
    }
}
