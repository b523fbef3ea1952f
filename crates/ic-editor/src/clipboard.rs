//! Element clipboard: deep copies of the selection plus the canvas they
//! came from. Process-local and never persisted; system-clipboard images
//! enter through image import instead.

use crate::scene::Scene;
use ic_core::{Bounds, CanvasId, Element, ElementId, ElementKind};
use std::collections::HashMap;

/// Where pasted elements should land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Shift every element by this much.
    Offset(f64, f64),
    /// Move the bounding box's top-left here.
    At(f64, f64),
}

/// A copied set of elements, with groups and their members together.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub elements: Vec<Element>,
    pub source: CanvasId,
}

impl Payload {
    /// Deep-copy `ids` (expanded to include group members) from `scene`.
    pub fn capture(scene: &Scene, ids: &[ElementId]) -> Option<Self> {
        let expanded = scene.expand_groups(ids);
        if expanded.is_empty() {
            return None;
        }
        let mut elements: Vec<Element> = expanded
            .iter()
            .filter_map(|id| scene.element(*id).cloned())
            .collect();
        // A copied member whose group stayed behind becomes free-standing.
        let copied: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
        for el in &mut elements {
            if el.group_id.is_some_and(|g| !copied.contains(&g)) {
                el.group_id = None;
            }
        }
        Some(Self {
            elements,
            source: scene.id().clone(),
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.elements.iter().map(|e| e.bounds()))
    }

    /// Fresh copies with new ids, moved per `placement` and stacked above
    /// `top_z`. Group links are remapped to the new ids. The second value
    /// lists the top-level copies (the new selection).
    pub fn instantiate(&self, placement: Placement, top_z: f64) -> (Vec<Element>, Vec<ElementId>) {
        let (dx, dy) = match (placement, self.bounds()) {
            (Placement::Offset(dx, dy), _) => (dx, dy),
            (Placement::At(x, y), Some(b)) => (x - b.x, y - b.y),
            (Placement::At(..), None) => (0.0, 0.0),
        };
        let remap: HashMap<ElementId, ElementId> = self
            .elements
            .iter()
            .map(|e| (e.id, ElementId::generate(e.kind.type_name())))
            .collect();
        let fresh = |id: &ElementId| remap.get(id).copied().unwrap_or(*id);

        let mut out = Vec::with_capacity(self.elements.len());
        let mut roots = Vec::new();
        for (i, el) in self.elements.iter().enumerate() {
            let mut copy = el.clone();
            copy.id = fresh(&el.id);
            copy.x += dx;
            copy.y += dy;
            copy.z_index = top_z + 1.0 + i as f64;
            copy.group_id = el.group_id.map(|g| fresh(&g));
            if let ElementKind::Group { children } = &mut copy.kind {
                for child in children.iter_mut() {
                    *child = fresh(child);
                }
            }
            if copy.group_id.is_none() {
                roots.push(copy.id);
            }
            out.push(copy);
        }
        (out, roots)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    payload: Option<Payload>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents. Returns the number of elements copied.
    pub fn copy(&mut self, scene: &Scene, ids: &[ElementId]) -> usize {
        match Payload::capture(scene, ids) {
            Some(payload) => {
                let n = payload.elements.len();
                log::debug!("clipboard: copied {n} elements from {}", payload.source);
                self.payload = Some(payload);
                n
            }
            None => 0,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// Where a paste into `target` should land: a fixed offset on the
    /// source canvas, otherwise at the last pointer position.
    pub fn placement(
        &self,
        target: &CanvasId,
        pointer_world: (f64, f64),
        same_canvas_offset: f64,
    ) -> Option<Placement> {
        let payload = self.payload.as_ref()?;
        Some(if payload.source == *target {
            Placement::Offset(same_canvas_offset, same_canvas_offset)
        } else {
            Placement::At(pointer_world.0, pointer_world.1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::Canvas;
    use smallvec::smallvec;

    fn rect(id: &str, x: f64, y: f64) -> Element {
        Element::new(
            ElementId::intern(id),
            ElementKind::Rectangle {
                fill: "none".into(),
                stroke: "#000".into(),
                stroke_width: 1.0,
            },
            Bounds::new(x, y, 10.0, 10.0),
        )
    }

    fn scene_with(elements: Vec<Element>) -> Scene {
        let mut canvas = Canvas::new(CanvasId::main(), "Main Canvas", None);
        canvas.elements = elements;
        Scene::new(canvas).unwrap()
    }

    #[test]
    fn same_canvas_paste_offsets() {
        let scene = scene_with(vec![rect("cb_a", 5.0, 5.0)]);
        let mut cb = Clipboard::new();
        assert_eq!(cb.copy(&scene, &[ElementId::intern("cb_a")]), 1);
        let placement = cb.placement(scene.id(), (0.0, 0.0), 20.0).unwrap();
        assert_eq!(placement, Placement::Offset(20.0, 20.0));

        let (copies, roots) = cb.payload().unwrap().instantiate(placement, 0.0);
        assert_eq!(roots, vec![copies[0].id]);
        assert_ne!(copies[0].id, ElementId::intern("cb_a"));
        assert_eq!((copies[0].x, copies[0].y), (25.0, 25.0));
        assert_eq!(copies[0].z_index, 1.0);
    }

    #[test]
    fn groups_are_copied_with_members_and_relinked() {
        let mut a = rect("cb_ga", 50.0, 60.0);
        let mut b = rect("cb_gb", 80.0, 50.0);
        let g = Element::new(
            ElementId::intern("cb_g"),
            ElementKind::Group {
                children: smallvec![a.id, b.id],
            },
            Bounds::new(50.0, 50.0, 40.0, 20.0),
        );
        a.group_id = Some(g.id);
        b.group_id = Some(g.id);
        let scene = scene_with(vec![a, b, g]);

        let payload = Payload::capture(&scene, &[ElementId::intern("cb_g")]).unwrap();
        assert_eq!(payload.elements.len(), 3);
        let (copies, roots) = payload.instantiate(Placement::At(1000.0, 800.0), 10.0);
        assert_eq!(roots.len(), 1);
        let group = copies.iter().find(|e| e.is_group()).unwrap();
        assert_eq!(group.id, roots[0]);
        for child in group.group_children() {
            let member = copies.iter().find(|e| e.id == *child).unwrap();
            assert_eq!(member.group_id, Some(group.id));
        }
        let bounds = Bounds::union_all(copies.iter().map(|e| e.bounds())).unwrap();
        assert_eq!((bounds.x, bounds.y), (1000.0, 800.0));
        ic_core::validate_elements(&copies).unwrap();
    }

    #[test]
    fn copying_a_lone_member_detaches_it() {
        let mut a = rect("cb_la", 0.0, 0.0);
        let b = rect("cb_lb", 20.0, 0.0);
        let g = Element::new(
            ElementId::intern("cb_lg"),
            ElementKind::Group {
                children: smallvec![a.id],
            },
            Bounds::new(0.0, 0.0, 10.0, 10.0),
        );
        a.group_id = Some(g.id);
        let scene = scene_with(vec![a, b, g]);
        let payload = Payload::capture(&scene, &[ElementId::intern("cb_la")]).unwrap();
        assert_eq!(payload.elements[0].group_id, None);
    }
}
