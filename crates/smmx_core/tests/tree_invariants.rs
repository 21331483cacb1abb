use smmx_core::{
    breadcrumb, place_child, DocumentError, ErrorKind, MindMap, NewChild, Node, NodeUpdate,
    Position,
};
use std::collections::HashSet;

fn assert_tree_consistent(map: &MindMap) {
    for node in map.nodes() {
        for child_id in node.children() {
            assert_eq!(map.get_node(child_id).unwrap().parent_id, node.id);
        }
        if !node.is_top_level() {
            let parent = map.get_node(&node.parent_id).unwrap();
            assert_eq!(
                parent.children().iter().filter(|id| **id == node.id).count(),
                1
            );
        }
    }

    let mut reachable = HashSet::new();
    let mut stack = map.top_level_nodes().collect::<Vec<_>>();
    while let Some(node) = stack.pop() {
        reachable.insert(node.id.clone());
        stack.extend(map.children_of(&node.id));
    }
    assert_eq!(reachable.len(), map.len());
}

fn seeded_map() -> MindMap {
    let mut map = MindMap::new("Seed");
    map.add_node(Node::root("0", "Root").with_position(400.0, 400.0))
        .unwrap();
    map
}

#[test]
fn mixed_mutations_keep_tree_consistent() {
    let mut map = seeded_map();
    let a = map.insert_child(NewChild::new("0", "A")).unwrap();
    let b = map.insert_child(NewChild::new("0", "B")).unwrap();
    let a1 = map.insert_child(NewChild::new(a.clone(), "A1")).unwrap();
    let a2 = map.insert_child(NewChild::new(a.clone(), "A2")).unwrap();
    map.insert_child(NewChild::new(a1.clone(), "A1x")).unwrap();
    map.insert_child(NewChild::new(b.clone(), "B1")).unwrap();
    assert_tree_consistent(&map);

    map.update_node(
        &a2,
        NodeUpdate {
            text: Some("A2 renamed".to_string()),
            notes: None,
        },
    )
    .unwrap();
    map.delete_node(&a1).unwrap();
    assert_tree_consistent(&map);

    let c = map.insert_child(NewChild::new(a.clone(), "C")).unwrap();
    assert_eq!(c, "7");
    assert_tree_consistent(&map);
    assert_eq!(
        map.children_of(&a).map(|n| n.text.as_str()).collect::<Vec<_>>(),
        vec!["A2 renamed", "C"]
    );
}

#[test]
fn delete_removes_exactly_the_subtree() {
    let mut map = seeded_map();
    let branch = map.insert_child(NewChild::new("0", "Branch")).unwrap();
    for index in 0..3 {
        let child = map
            .insert_child(NewChild::new(branch.clone(), format!("child {index}")))
            .unwrap();
        map.insert_child(NewChild::new(child, "grandchild")).unwrap();
    }
    map.insert_child(NewChild::new("0", "Sibling")).unwrap();
    let before = map.len();

    let removed = map.delete_node(&branch).unwrap();
    assert_eq!(removed, 7);
    assert_eq!(map.len(), before - 7);
    assert_eq!(map.root().unwrap().children().len(), 1);
    assert_tree_consistent(&map);

    let err = map.delete_node("0").unwrap_err();
    assert_eq!(err, DocumentError::CannotDeleteRoot("0".to_string()));
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn search_matches_each_node_once() {
    let mut map = seeded_map();
    map.add_node(Node::new("1", "Python Code", "0").with_notes("Python programming"))
        .unwrap();
    map.add_node(Node::new("2", "Rust", "0").with_notes("systems code"))
        .unwrap();

    assert_eq!(map.search_nodes("PYTHON", true).len(), 1);
    let code = map
        .search_nodes("code", true)
        .iter()
        .map(|n| n.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(code, vec!["1", "2"]);
    assert_eq!(map.search_nodes("code", false).len(), 1);
}

#[test]
fn path_runs_from_root_to_target() {
    let mut map = seeded_map();
    let a = map.insert_child(NewChild::new("0", "A")).unwrap();
    let b = map.insert_child(NewChild::new(a, "B")).unwrap();

    let path = map.resolve_path(&b).unwrap();
    assert_eq!(breadcrumb(&path), "Root > A > B");
    assert_eq!(
        map.resolve_path("404").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn second_child_is_offset_perpendicular_to_branch() {
    let mut map = MindMap::default();
    map.add_node(Node::root("0", "Grandparent").with_position(0.0, 0.0))
        .unwrap();
    map.add_node(Node::new("1", "Parent", "0").with_position(100.0, 0.0))
        .unwrap();
    map.add_node(Node::new("2", "Existing", "1").with_position(200.0, 0.0))
        .unwrap();

    let id = map.insert_child(NewChild::new("1", "Second")).unwrap();
    let placed = map.get_node(&id).unwrap().position;
    assert_eq!(placed, Position::new(200.0, -80.0));
    assert_eq!(
        placed,
        place_child(Some(Position::new(0.0, 0.0)), Position::new(100.0, 0.0), 1)
    );
}

#[test]
fn children_of_top_level_nodes_stack_downwards() {
    let mut map = seeded_map();
    let first = map.insert_child(NewChild::new("0", "First")).unwrap();
    let second = map.insert_child(NewChild::new("0", "Second")).unwrap();

    assert_eq!(
        map.get_node(&first).unwrap().position,
        Position::new(600.0, 400.0)
    );
    assert_eq!(
        map.get_node(&second).unwrap().position,
        Position::new(600.0, 500.0)
    );
}
