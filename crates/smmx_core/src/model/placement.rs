//! Placement of newly inserted children.
//!
//! A child continues the grandparent -> parent direction so branches keep
//! radiating outward. Siblings fan out along the perpendicular of that
//! direction, alternating sides. Children of a top-level node (or of a node
//! sitting exactly on its parent) stack vertically instead.

use crate::model::defaults::{ROOT_CHILD_OFFSET_X, ROOT_CHILD_SPACING_Y, SIBLING_SPACING};
use crate::model::node::Position;

/// Computes the position of the next child of `parent`.
///
/// `sibling_count` is the number of children `parent` already has.
pub fn place_child(
    grandparent: Option<Position>,
    parent: Position,
    sibling_count: usize,
) -> Position {
    let direction = grandparent
        .map(|gp| (parent.x - gp.x, parent.y - gp.y))
        .filter(|(dx, dy)| dx.hypot(*dy) > 0.0);

    let Some((dx, dy)) = direction else {
        return Position::new(
            parent.x + ROOT_CHILD_OFFSET_X,
            parent.y + sibling_count as f64 * ROOT_CHILD_SPACING_Y,
        );
    };

    let base = Position::new(parent.x + dx, parent.y + dy);
    if sibling_count == 0 {
        return base;
    }

    let length = dx.hypot(dy);
    let perp_x = -dy / length * SIBLING_SPACING;
    let perp_y = dx / length * SIBLING_SPACING;
    let multiplier = sibling_offset(sibling_count);

    Position::new(base.x + perp_x * multiplier, base.y + perp_y * multiplier)
}

/// Signed perpendicular step for the child at `index`: 0, -1, 1, -2, 2, ...
fn sibling_offset(index: usize) -> f64 {
    if index % 2 == 0 {
        (index / 2) as f64
    } else {
        -(((index + 1) / 2) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{place_child, sibling_offset};
    use crate::model::node::Position;

    #[test]
    fn first_child_continues_branch_direction() {
        let placed = place_child(
            Some(Position::new(0.0, 0.0)),
            Position::new(100.0, 0.0),
            0,
        );
        assert_eq!(placed, Position::new(200.0, 0.0));
    }

    #[test]
    fn second_child_is_offset_to_negative_perpendicular() {
        let placed = place_child(
            Some(Position::new(0.0, 0.0)),
            Position::new(100.0, 0.0),
            1,
        );
        assert_eq!(placed, Position::new(200.0, -80.0));
    }

    #[test]
    fn third_child_is_offset_to_positive_perpendicular() {
        let placed = place_child(
            Some(Position::new(0.0, 0.0)),
            Position::new(100.0, 0.0),
            2,
        );
        assert_eq!(placed, Position::new(200.0, 80.0));
    }

    #[test]
    fn diagonal_branch_uses_unit_perpendicular() {
        let placed = place_child(
            Some(Position::new(0.0, 0.0)),
            Position::new(30.0, 40.0),
            1,
        );
        // perpendicular unit of (30, 40) is (-0.8, 0.6); scaled by 80 and negated.
        assert!((placed.x - (60.0 + 64.0)).abs() < 1e-9);
        assert!((placed.y - (80.0 - 48.0)).abs() < 1e-9);
    }

    #[test]
    fn children_of_top_level_nodes_stack_vertically() {
        let parent = Position::new(400.0, 400.0);
        assert_eq!(place_child(None, parent, 0), Position::new(600.0, 400.0));
        assert_eq!(place_child(None, parent, 3), Position::new(600.0, 700.0));
    }

    #[test]
    fn zero_length_direction_falls_back_to_stacking() {
        let same = Position::new(50.0, 50.0);
        assert_eq!(place_child(Some(same), same, 1), Position::new(250.0, 150.0));
    }

    #[test]
    fn sibling_offsets_alternate_and_grow_every_two() {
        let offsets = (0..6).map(sibling_offset).collect::<Vec<_>>();
        assert_eq!(offsets, vec![0.0, -1.0, 1.0, -2.0, 2.0, -3.0]);
    }
}
