//! Render tree: one render node per element, kept in sync with the scene.
//!
//! The tree is the single source of visual truth. It is only mutated by
//! `reconcile` (driven by scene changes) and by image-load completions.
//! Each node carries the element id and the `canvas-element` tag so the
//! pointer layer can recognize it.

use ic_core::{Background, Element, ElementId, ElementKind, canonical_order};
use kurbo::{Affine, Point, Rect};
use std::collections::HashMap;

/// Capability tag carried by every element node.
pub const CANVAS_ELEMENT_TAG: &str = "canvas-element";

/// Progress of an image bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageLoadState {
    Pending,
    Loaded { natural_width: f64, natural_height: f64 },
    Failed,
}

/// Display size for a decoded bitmap: the longer side (width when
/// landscape, height otherwise) is clamped to `max_size`, keeping aspect.
/// Smaller bitmaps keep their natural size.
pub fn refined_image_size(natural_width: f64, natural_height: f64, max_size: f64) -> (f64, f64) {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return (natural_width, natural_height);
    }
    if natural_width > natural_height {
        if natural_width > max_size {
            return (max_size, natural_height * max_size / natural_width);
        }
    } else if natural_height > max_size {
        return (natural_width * max_size / natural_height, max_size);
    }
    (natural_width, natural_height)
}

/// Variant-specific drawing data.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderKind {
    Image {
        src: String,
        /// CSS `filter` value, `None` when no filter is set.
        css_filter: Option<String>,
        load: ImageLoadState,
    },
    /// Rounded rectangle with an icon and the name centered.
    Folder { name: String, corner_radius: f64 },
    Rect {
        fill: Option<String>,
        stroke: String,
        stroke_width: f64,
    },
    /// Open polyline in world coordinates.
    Polyline {
        points: Vec<Point>,
        stroke: String,
        stroke_width: f64,
    },
    /// Invisible container.
    Group,
}

impl RenderKind {
    /// Whether corner handles may be offered for this node.
    pub fn is_resizable(&self) -> bool {
        matches!(
            self,
            RenderKind::Image { .. } | RenderKind::Folder { .. } | RenderKind::Rect { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: ElementId,
    pub tag: &'static str,
    pub kind: RenderKind,
    /// Axis-aligned world bounds (before the flip transform).
    pub bounds: Rect,
    /// Mirror transform about the node center; identity when not flipped.
    pub transform: Affine,
    pub visible: bool,
    pub locked: bool,
    pub group_id: Option<ElementId>,
}

const FOLDER_CORNER_RADIUS: f64 = 8.0;

impl RenderNode {
    /// Materialize an element.
    pub fn from_element(el: &Element) -> Self {
        let bounds = Rect::new(el.x, el.y, el.x + el.width, el.y + el.height);
        let kind = match &el.kind {
            ElementKind::Image { src } => RenderKind::Image {
                src: src.clone(),
                css_filter: el
                    .filters
                    .as_ref()
                    .filter(|f| !f.is_empty())
                    .map(|f| f.to_css()),
                load: ImageLoadState::Pending,
            },
            ElementKind::Folder { name, .. } => RenderKind::Folder {
                name: name.clone(),
                corner_radius: FOLDER_CORNER_RADIUS,
            },
            ElementKind::Rectangle {
                fill,
                stroke,
                stroke_width,
            } => RenderKind::Rect {
                fill: (fill != ic_core::color::NONE).then(|| fill.clone()),
                stroke: stroke.clone(),
                stroke_width: *stroke_width,
            },
            ElementKind::Line {
                stroke,
                stroke_width,
                points,
            }
            | ElementKind::Freehand {
                stroke,
                stroke_width,
                points,
            } => RenderKind::Polyline {
                points: points
                    .iter()
                    .map(|(px, py)| Point::new(el.x + px, el.y + py))
                    .collect(),
                stroke: stroke.clone(),
                stroke_width: *stroke_width,
            },
            ElementKind::Group { .. } => RenderKind::Group,
        };
        Self {
            id: el.id,
            tag: CANVAS_ELEMENT_TAG,
            kind,
            bounds,
            transform: mirror_transform(bounds, el.is_flipped_h(), el.is_flipped_v()),
            visible: el.is_visible(),
            locked: el.is_locked(),
            group_id: el.group_id,
        }
    }

    /// Bounds as drawn, after the mirror transform.
    pub fn visual_bounds(&self) -> Rect {
        self.transform.transform_rect_bbox(self.bounds)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }
}

/// Mirror about the center of `bounds` on the requested axes.
pub fn mirror_transform(bounds: Rect, flip_h: bool, flip_v: bool) -> Affine {
    if !flip_h && !flip_v {
        return Affine::IDENTITY;
    }
    let c = bounds.center();
    let sx = if flip_h { -1.0 } else { 1.0 };
    let sy = if flip_v { -1.0 } else { 1.0 };
    Affine::translate((c.x, c.y)) * Affine::scale_non_uniform(sx, sy) * Affine::translate((-c.x, -c.y))
}

/// How the canvas background is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundPaint {
    Solid(String),
    Checker,
}

impl Default for BackgroundPaint {
    fn default() -> Self {
        BackgroundPaint::Solid("#ffffff".into())
    }
}

/// Counts of node operations performed by one reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.removed == 0
    }
}

/// The materialized scene.
#[derive(Debug, Default)]
pub struct RenderTree {
    nodes: HashMap<ElementId, RenderNode>,
    /// Back-to-front paint order.
    order: Vec<ElementId>,
    background: BackgroundPaint,
    /// Images whose bitmaps should be fetched by the host.
    image_requests: Vec<(ElementId, String)>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: ElementId) -> Option<&RenderNode> {
        self.nodes.get(&id)
    }

    /// Back-to-front ids.
    pub fn order(&self) -> &[ElementId] {
        &self.order
    }

    /// Nodes back to front.
    pub fn nodes_in_order(&self) -> impl DoubleEndedIterator<Item = &RenderNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn background(&self) -> &BackgroundPaint {
        &self.background
    }

    pub fn set_background(&mut self, bg: Option<&Background>) {
        self.background = match bg {
            None => BackgroundPaint::default(),
            Some(Background::Transparent) => BackgroundPaint::Checker,
            Some(Background::Color(c)) => BackgroundPaint::Solid(c.clone()),
        };
    }

    /// Drop every node (canvas switch).
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.image_requests.clear();
    }

    /// Diff `elements` against the current nodes, creating, updating and
    /// removing nodes so there is exactly one node per element.
    pub fn reconcile(&mut self, elements: &[Element]) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let mut next_order = Vec::with_capacity(elements.len());

        for idx in canonical_order(elements) {
            let el = &elements[idx];
            let mut fresh = RenderNode::from_element(el);
            next_order.push(el.id);

            match self.nodes.get_mut(&el.id) {
                Some(existing) => {
                    carry_image_state(existing, &mut fresh, &mut self.image_requests);
                    if *existing != fresh {
                        *existing = fresh;
                        stats.updated += 1;
                    }
                }
                None => {
                    if let RenderKind::Image { src, .. } = &fresh.kind {
                        self.image_requests.push((el.id, src.clone()));
                    }
                    self.nodes.insert(el.id, fresh);
                    stats.created += 1;
                }
            }
        }

        if next_order.len() != self.nodes.len() {
            let live: std::collections::HashSet<ElementId> = next_order.iter().copied().collect();
            self.nodes.retain(|id, _| {
                let keep = live.contains(id);
                if !keep {
                    stats.removed += 1;
                }
                keep
            });
            self.image_requests.retain(|(id, _)| live.contains(id));
        }
        self.order = next_order;

        if !stats.is_noop() {
            log::trace!(
                "render: +{} ~{} -{} ({} nodes)",
                stats.created,
                stats.updated,
                stats.removed,
                self.nodes.len()
            );
        }
        stats
    }

    /// Image fetches requested since the last call.
    pub fn take_image_requests(&mut self) -> Vec<(ElementId, String)> {
        std::mem::take(&mut self.image_requests)
    }

    /// Record a decoded bitmap. Returns false when the node no longer exists.
    pub fn mark_image_loaded(&mut self, id: ElementId, natural_width: f64, natural_height: f64) -> bool {
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(RenderKind::Image { load, .. }) => {
                *load = ImageLoadState::Loaded {
                    natural_width,
                    natural_height,
                };
                true
            }
            _ => false,
        }
    }

    pub fn mark_image_failed(&mut self, id: ElementId) -> bool {
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(RenderKind::Image { load, .. }) => {
                *load = ImageLoadState::Failed;
                true
            }
            _ => false,
        }
    }
}

/// Keep the load state of an image whose source did not change; re-request
/// the bitmap when it did.
fn carry_image_state(
    existing: &RenderNode,
    fresh: &mut RenderNode,
    requests: &mut Vec<(ElementId, String)>,
) {
    if let (
        RenderKind::Image {
            src: old_src,
            load: old_load,
            ..
        },
        RenderKind::Image { src, load, .. },
    ) = (&existing.kind, &mut fresh.kind)
    {
        if old_src == src {
            *load = *old_load;
        } else {
            requests.push((fresh.id, src.clone()));
        }
    }
}
