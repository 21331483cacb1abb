//! Hierarchical Markdown rendering.

use crate::model::defaults::MARKDOWN_MAX_DEPTH;
use crate::model::document::MindMap;

/// Renders the designated root's tree as Markdown headings.
///
/// Returns an empty string for a document without a root.
pub fn to_markdown(map: &MindMap) -> String {
    to_markdown_with_depth(map, MARKDOWN_MAX_DEPTH)
}

/// Like [`to_markdown`], skipping descendants deeper than `max_depth`.
///
/// The root is a level-one heading, its children level two, and so on.
/// Non-empty notes follow their heading as a paragraph.
pub fn to_markdown_with_depth(map: &MindMap, max_depth: usize) -> String {
    let Some(root) = map.root() else {
        return String::new();
    };

    let mut blocks = vec![format!("# {}\n", root.text)];
    if !root.notes.is_empty() {
        blocks.push(format!("{}\n", root.notes));
    }
    push_children(map, &root.id, 1, max_depth, &mut blocks);
    blocks.join("\n")
}

fn push_children(
    map: &MindMap,
    id: &str,
    depth: usize,
    max_depth: usize,
    blocks: &mut Vec<String>,
) {
    if depth > max_depth {
        return;
    }
    for child in map.children_of(id) {
        blocks.push(format!("{} {}\n", "#".repeat(depth + 1), child.text));
        if !child.notes.is_empty() {
            blocks.push(format!("{}\n", child.notes));
        }
        push_children(map, &child.id, depth + 1, max_depth, blocks);
    }
}

#[cfg(test)]
mod tests {
    use super::{to_markdown, to_markdown_with_depth};
    use crate::model::document::MindMap;
    use crate::model::node::Node;

    fn sample_map() -> MindMap {
        let mut map = MindMap::new("Plans");
        map.add_node(Node::root("0", "Trip").with_notes("Summer")).unwrap();
        map.add_node(Node::new("1", "Packing", "0")).unwrap();
        map.add_node(Node::new("2", "Socks", "1").with_notes("Wool")).unwrap();
        map.add_node(Node::new("3", "Route", "0")).unwrap();
        map
    }

    #[test]
    fn renders_nested_headings_with_notes() {
        assert_eq!(
            to_markdown(&sample_map()),
            "# Trip\n\nSummer\n\n## Packing\n\n### Socks\n\nWool\n\n## Route\n"
        );
    }

    #[test]
    fn depth_limit_cuts_deep_branches() {
        assert_eq!(
            to_markdown_with_depth(&sample_map(), 1),
            "# Trip\n\nSummer\n\n## Packing\n\n## Route\n"
        );
    }

    #[test]
    fn rootless_document_renders_nothing() {
        assert_eq!(to_markdown(&MindMap::default()), "");
    }
}
