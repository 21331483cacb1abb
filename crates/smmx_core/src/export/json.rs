//! Nested JSON rendering.
//!
//! # Invariants
//! - Nesting is bounded by [`JSON_MAX_DEPTH`]; deeper documents fail with a
//!   render error instead of exhausting the stack.

use crate::model::defaults::JSON_MAX_DEPTH;
use crate::model::document::MindMap;
use crate::model::node::{FlatNode, Node};
use serde::ser::Error as _;
use serde::Serialize;

/// Whole-document JSON shape.
#[derive(Debug, Serialize)]
pub struct JsonExport<'a> {
    pub title: &'a str,
    pub root: Option<JsonNode<'a>>,
    pub total_nodes: usize,
}

/// Flat node view plus its nested children.
#[derive(Debug, Serialize)]
pub struct JsonNode<'a> {
    #[serde(flatten)]
    pub node: FlatNode<'a>,
    pub children: Vec<JsonNode<'a>>,
}

impl<'a> JsonExport<'a> {
    pub fn from_map(map: &'a MindMap) -> serde_json::Result<Self> {
        let root = match map.root() {
            Some(root) => Some(JsonNode::build(map, root, 0)?),
            None => None,
        };
        Ok(Self {
            title: &map.meta.title,
            root,
            total_nodes: map.len(),
        })
    }
}

impl<'a> JsonNode<'a> {
    fn build(map: &'a MindMap, node: &'a Node, depth: usize) -> serde_json::Result<Self> {
        if depth >= JSON_MAX_DEPTH {
            return Err(serde_json::Error::custom(format!(
                "node '{}' is nested deeper than {JSON_MAX_DEPTH} levels",
                node.id
            )));
        }
        let children = map
            .children_of(&node.id)
            .map(|child| Self::build(map, child, depth + 1))
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self {
            node: node.to_flat(),
            children,
        })
    }
}

/// Renders the document as pretty-printed JSON.
pub fn to_json(map: &MindMap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonExport::from_map(map)?)
}

#[cfg(test)]
mod tests {
    use super::to_json;
    use crate::model::defaults::JSON_MAX_DEPTH;
    use crate::model::document::MindMap;
    use crate::model::node::Node;
    use serde_json::Value;

    #[test]
    fn nests_children_under_root() {
        let mut map = MindMap::new("Plans");
        map.add_node(Node::root("0", "Trip").with_position(400.0, 400.0))
            .unwrap();
        let mut child = Node::new("1", "Packing", "0");
        child.icon = "bag".to_string();
        map.add_node(child).unwrap();
        map.add_node(Node::new("2", "Socks", "1")).unwrap();

        let value: Value = serde_json::from_str(&to_json(&map).unwrap()).unwrap();
        assert_eq!(value["title"], "Plans");
        assert_eq!(value["total_nodes"], 3);

        let root = &value["root"];
        assert_eq!(root["text"], "Trip");
        assert_eq!(root["x"], 400.0);
        assert_eq!(root["notes"], "");
        assert!(root.get("icon").is_none());

        let packing = &root["children"][0];
        assert_eq!(packing["id"], "1");
        assert_eq!(packing["icon"], "bag");
        assert_eq!(packing["children"][0]["text"], "Socks");
        assert_eq!(packing["children"][0]["children"], Value::Array(Vec::new()));
    }

    #[test]
    fn rootless_document_has_null_root() {
        let value: Value = serde_json::from_str(&to_json(&MindMap::default()).unwrap()).unwrap();
        assert!(value["root"].is_null());
        assert_eq!(value["total_nodes"], 0);
    }

    fn chain(length: usize) -> MindMap {
        let mut map = MindMap::new("Chain");
        map.add_node(Node::root("0", "Level 0")).unwrap();
        for level in 1..length {
            let parent = (level - 1).to_string();
            map.add_node(Node::new(level.to_string(), format!("Level {level}"), parent))
                .unwrap();
        }
        map
    }

    #[test]
    fn renders_chain_up_to_depth_limit() {
        let json = to_json(&chain(JSON_MAX_DEPTH)).unwrap();
        assert!(json.contains(&format!("\"Level {}\"", JSON_MAX_DEPTH - 1)));
    }

    #[test]
    fn deeper_chain_is_a_render_error() {
        let err = to_json(&chain(20_000)).unwrap_err();
        assert!(err.to_string().contains("nested deeper than"));
    }
}
