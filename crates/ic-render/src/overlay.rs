//! Selection overlay: outline rectangles and corner resize handles.

use crate::tree::RenderTree;
use ic_core::{Bounds, ElementId};
use smallvec::SmallVec;

/// A resize handle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    /// The diagonally opposite corner (the resize anchor).
    pub fn opposite(self) -> Corner {
        match self {
            Corner::Nw => Corner::Se,
            Corner::Ne => Corner::Sw,
            Corner::Sw => Corner::Ne,
            Corner::Se => Corner::Nw,
        }
    }

    /// Outward direction of the corner: `+1` towards right / bottom.
    pub fn direction(self) -> (f64, f64) {
        match self {
            Corner::Nw => (-1.0, -1.0),
            Corner::Ne => (1.0, -1.0),
            Corner::Sw => (-1.0, 1.0),
            Corner::Se => (1.0, 1.0),
        }
    }

    /// The corner's position on `b`.
    pub fn point_of(self, b: &Bounds) -> (f64, f64) {
        match self {
            Corner::Nw => (b.x, b.y),
            Corner::Ne => (b.right(), b.y),
            Corner::Sw => (b.x, b.bottom()),
            Corner::Se => (b.right(), b.bottom()),
        }
    }
}

/// One resize handle in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub element: ElementId,
    pub corner: Corner,
    pub rect: Bounds,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionOverlay {
    /// One outline per selected element.
    pub outlines: SmallVec<[(ElementId, Bounds); 4]>,
    pub handles: SmallVec<[Handle; 4]>,
}

impl SelectionOverlay {
    /// The handle under `(px, py)`, if any.
    pub fn handle_at(&self, px: f64, py: f64) -> Option<&Handle> {
        self.handles.iter().find(|h| h.rect.contains(px, py))
    }
}

/// Build the overlay for the current selection.
///
/// Handles go on the primary element, or on the only selected element when
/// it is an image, rectangle, or folder. Locked elements and groups get no
/// handles. `handle_size` is in world units (screen size divided by zoom).
pub fn selection_overlay(
    tree: &RenderTree,
    selected: &[ElementId],
    primary: Option<ElementId>,
    handle_size: f64,
) -> SelectionOverlay {
    let mut overlay = SelectionOverlay::default();
    for id in selected {
        if let Some(node) = tree.node(*id) {
            let r = node.bounds;
            overlay
                .outlines
                .push((*id, Bounds::new(r.x0, r.y0, r.width(), r.height())));
        }
    }

    let target = match (primary, selected) {
        (Some(p), _) if selected.contains(&p) => Some(p),
        (_, [only]) => Some(*only),
        _ => None,
    };
    let Some(target) = target else {
        return overlay;
    };
    let Some(node) = tree.node(target) else {
        return overlay;
    };
    if node.locked || !node.kind.is_resizable() {
        return overlay;
    }

    let r = node.bounds;
    let b = Bounds::new(r.x0, r.y0, r.width(), r.height());
    let half = handle_size / 2.0;
    for corner in Corner::ALL {
        let (cx, cy) = corner.point_of(&b);
        overlay.handles.push(Handle {
            element: target,
            corner,
            rect: Bounds::new(cx - half, cy - half, handle_size, handle_size),
        });
    }
    overlay
}
