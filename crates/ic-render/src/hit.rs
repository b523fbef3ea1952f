//! Hit testing: point → element lookup.
//!
//! Reverse-walks the paint order (front-to-back) and returns the topmost
//! visible node containing the point. Members of a group resolve to their
//! outermost group, which is the selection target at the top level.

use crate::tree::{RenderKind, RenderTree};
use ic_core::{Bounds, ElementId};
use kurbo::Point;

/// Find the topmost element at world position `(px, py)`.
/// Returns `None` if nothing is hit (empty canvas).
pub fn hit_test(tree: &RenderTree, px: f64, py: f64) -> Option<ElementId> {
    let p = Point::new(px, py);
    tree.nodes_in_order()
        .rev()
        .filter(|n| n.visible && !matches!(n.kind, RenderKind::Group))
        .find(|n| n.contains(p))
        .map(|n| outermost_group(tree, n.id))
}

/// Every element at `(px, py)`, topmost first, group-resolved and deduplicated.
/// Used to select underneath the current primary.
pub fn hit_test_all(tree: &RenderTree, px: f64, py: f64) -> Vec<ElementId> {
    let p = Point::new(px, py);
    let mut out: Vec<ElementId> = Vec::new();
    for node in tree.nodes_in_order().rev() {
        if !node.visible || matches!(node.kind, RenderKind::Group) || !node.contains(p) {
            continue;
        }
        let target = outermost_group(tree, node.id);
        if !out.contains(&target) {
            out.push(target);
        }
    }
    out
}

/// Find all top-level targets whose bounds intersect the given rectangle.
/// Used for marquee (box) selection.
pub fn hit_test_rect(tree: &RenderTree, rect: Bounds) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::new();
    for node in tree.nodes_in_order() {
        if !node.visible || matches!(node.kind, RenderKind::Group) {
            continue;
        }
        let r = node.bounds;
        let b = Bounds::new(r.x0, r.y0, r.width(), r.height());
        if !b.intersects(&rect) {
            continue;
        }
        let target = outermost_group(tree, node.id);
        if !out.contains(&target) {
            out.push(target);
        }
    }
    out
}

/// Follow `group_id` links up to the outermost group.
pub fn outermost_group(tree: &RenderTree, id: ElementId) -> ElementId {
    let mut current = id;
    // Bounded by the node count so a malformed cycle cannot hang.
    for _ in 0..tree.len() {
        match tree.node(current).and_then(|n| n.group_id) {
            Some(parent) if tree.node(parent).is_some() => current = parent,
            _ => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::{Element, ElementKind};
    use smallvec::smallvec;

    fn rect(id: &str, b: Bounds, z: f64) -> Element {
        let mut el = Element::new(
            ElementId::intern(id),
            ElementKind::Rectangle {
                fill: "#fff".into(),
                stroke: "#000".into(),
                stroke_width: 1.0,
            },
            b,
        );
        el.z_index = z;
        el
    }

    #[test]
    fn topmost_wins() {
        let els = vec![
            rect("hit_low", Bounds::new(0.0, 0.0, 100.0, 100.0), 1.0),
            rect("hit_high", Bounds::new(50.0, 50.0, 100.0, 100.0), 2.0),
        ];
        let mut tree = RenderTree::new();
        tree.reconcile(&els);
        assert_eq!(hit_test(&tree, 75.0, 75.0), Some(els[1].id));
        assert_eq!(hit_test(&tree, 10.0, 10.0), Some(els[0].id));
        assert_eq!(hit_test(&tree, 500.0, 500.0), None);
        assert_eq!(hit_test_all(&tree, 75.0, 75.0), vec![els[1].id, els[0].id]);
    }

    #[test]
    fn hidden_elements_are_not_hit() {
        let mut el = rect("hit_hidden", Bounds::new(0.0, 0.0, 10.0, 10.0), 1.0);
        el.visible = Some(false);
        let mut tree = RenderTree::new();
        tree.reconcile(std::slice::from_ref(&el));
        assert_eq!(hit_test(&tree, 5.0, 5.0), None);
    }

    #[test]
    fn members_resolve_to_their_group() {
        let mut a = rect("hit_ga", Bounds::new(0.0, 0.0, 10.0, 10.0), 1.0);
        let mut b = rect("hit_gb", Bounds::new(20.0, 0.0, 10.0, 10.0), 2.0);
        let group = Element::new(
            ElementId::intern("hit_group"),
            ElementKind::Group {
                children: smallvec![a.id, b.id],
            },
            Bounds::new(0.0, 0.0, 30.0, 10.0),
        );
        a.group_id = Some(group.id);
        b.group_id = Some(group.id);
        let mut tree = RenderTree::new();
        tree.reconcile(&[a, b, group.clone()]);
        assert_eq!(hit_test(&tree, 5.0, 5.0), Some(group.id));
        // The gap between members is not part of the group.
        assert_eq!(hit_test(&tree, 15.0, 5.0), None);
        assert_eq!(
            hit_test_rect(&tree, Bounds::new(-5.0, -5.0, 50.0, 50.0)),
            vec![group.id]
        );
    }
}
