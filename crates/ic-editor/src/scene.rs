//! Scene model: owns the active canvas document.
//!
//! Every mutation validates the document invariants before it lands, keeps
//! `elements` in canonical order (ascending `zIndex`, ties by array index),
//! and queues a [`SceneChange`] for the editor to forward to the renderer.
//! The scene never records history itself; callers that represent user
//! intents snapshot first so multi-step edits stay one undo step.

use ic_core::validate::is_canonically_ordered;
use ic_core::{
    Background, Bounds, Canvas, CanvasId, Element, ElementId, Guide, ModelError, repair_canvas,
    validate_canvas, validate_elements,
};
use std::collections::HashSet;

/// What part of the document changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    /// A different canvas was loaded.
    Loaded,
    Elements,
    Guides,
    Background,
}

#[derive(Debug)]
pub struct Scene {
    canvas: Canvas,
    changes: Vec<SceneChange>,
}

impl Scene {
    /// Take ownership of a loaded canvas. Elements are put in canonical order.
    ///
    /// A stored document that breaks the invariants is repaired rather than
    /// refused, so the canvas can still be opened; each violation is logged.
    pub fn new(mut canvas: Canvas) -> Result<Self, ModelError> {
        let problems = repair_canvas(&mut canvas);
        if !problems.is_empty() {
            log::error!(
                "scene: canvas {} loaded with {} broken invariants, repaired",
                canvas.id,
                problems.len()
            );
            for problem in &problems {
                log::error!("scene: {problem}");
            }
        }
        sort_canonical(&mut canvas.elements);
        validate_canvas(&canvas)?;
        Ok(Self {
            canvas,
            changes: vec![SceneChange::Loaded],
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn id(&self) -> &CanvasId {
        &self.canvas.id
    }

    /// Elements back to front.
    pub fn elements(&self) -> &[Element] {
        &self.canvas.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.canvas.element(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn guides(&self) -> &[Guide] {
        &self.canvas.guides
    }

    pub fn background(&self) -> Option<&Background> {
        self.canvas.background_color.as_ref()
    }

    pub fn max_z(&self) -> Option<f64> {
        self.canvas.elements.iter().map(|e| e.z_index).reduce(f64::max)
    }

    pub fn min_z(&self) -> Option<f64> {
        self.canvas.elements.iter().map(|e| e.z_index).reduce(f64::min)
    }

    /// Changes queued since the last call.
    pub fn take_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }

    fn emit(&mut self, change: SceneChange) {
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    // ─── Element mutations ───────────────────────────────────────────────

    pub fn add_element(&mut self, element: Element) -> Result<(), ModelError> {
        self.add_elements(vec![element])
    }

    /// Insert several elements atomically (paste, group creation).
    pub fn add_elements(&mut self, elements: Vec<Element>) -> Result<(), ModelError> {
        if elements.is_empty() {
            return Ok(());
        }
        self.edit(|els| {
            els.extend(elements);
            Ok(())
        })
    }

    /// Remove `ids` and return the removed elements.
    ///
    /// References to removed elements are cleaned up: they leave their
    /// group's `children`, members of a removed group are released, and a
    /// group left without children is removed as well.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let mut doomed: HashSet<ElementId> = ids.iter().copied().collect();
        let mut removed = Vec::new();
        loop {
            let before = doomed.len();
            for el in &mut self.canvas.elements {
                if let ic_core::ElementKind::Group { children } = &mut el.kind {
                    children.retain(|c| !doomed.contains(c));
                }
            }
            for el in &self.canvas.elements {
                if el.is_group() && el.group_children().is_empty() {
                    doomed.insert(el.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        self.canvas.elements.retain(|el| {
            if doomed.contains(&el.id) {
                removed.push(el.clone());
                false
            } else {
                true
            }
        });
        for el in &mut self.canvas.elements {
            if el.group_id.is_some_and(|g| doomed.contains(&g)) {
                el.group_id = None;
            }
        }
        if !removed.is_empty() {
            log::debug!("scene: removed {} elements", removed.len());
            self.emit(SceneChange::Elements);
        }
        removed
    }

    /// Patch one element. The patched element is checked before it replaces
    /// the current one; a z change re-sorts the list.
    pub fn update_element(
        &mut self,
        id: ElementId,
        patch: impl FnOnce(&mut Element),
    ) -> Result<(), ModelError> {
        let idx = self.index_of(id)?;
        let mut next = self.canvas.elements[idx].clone();
        patch(&mut next);
        next.id = id;
        next.check()?;
        if next == self.canvas.elements[idx] {
            return Ok(());
        }
        let z_changed = next.z_index != self.canvas.elements[idx].z_index;
        self.canvas.elements[idx] = next;
        if z_changed {
            sort_canonical(&mut self.canvas.elements);
        }
        self.emit(SceneChange::Elements);
        Ok(())
    }

    /// Set absolute positions for several elements (per pointer move).
    pub fn move_elements(&mut self, moves: &[(ElementId, f64, f64)]) -> Result<(), ModelError> {
        for &(id, x, y) in moves {
            if !x.is_finite() || !y.is_finite() {
                return Err(ModelError::NonFinite {
                    id: id.as_str().to_string(),
                    field: if x.is_finite() { "y" } else { "x" },
                });
            }
            self.index_of(id)?;
        }
        let mut changed = false;
        for &(id, x, y) in moves {
            if let Some(el) = self.canvas.elements.iter_mut().find(|e| e.id == id)
                && (el.x != x || el.y != y)
            {
                el.x = x;
                el.y = y;
                changed = true;
            }
        }
        if changed {
            self.emit(SceneChange::Elements);
        }
        Ok(())
    }

    /// Give `id` a new `zIndex` and re-sort.
    pub fn reorder(&mut self, id: ElementId, new_z: f64) -> Result<(), ModelError> {
        self.set_z_indices(&[(id, new_z)])
    }

    pub fn set_z_indices(&mut self, updates: &[(ElementId, f64)]) -> Result<(), ModelError> {
        self.edit(|els| {
            for &(id, z) in updates {
                let el = els
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or_else(|| ModelError::UnknownElement(id.as_str().to_string()))?;
                el.z_index = z;
            }
            Ok(())
        })
    }

    /// Replace the whole element list (undo/redo, reloads).
    pub fn replace_elements(&mut self, elements: Vec<Element>) -> Result<(), ModelError> {
        self.edit(|els| {
            *els = elements;
            Ok(())
        })
    }

    /// Apply a multi-element edit atomically: the closure works on a copy,
    /// which is sorted and validated before it replaces the element list.
    pub fn edit<R>(
        &mut self,
        f: impl FnOnce(&mut Vec<Element>) -> Result<R, ModelError>,
    ) -> Result<R, ModelError> {
        let mut next = self.canvas.elements.clone();
        let out = f(&mut next)?;
        sort_canonical(&mut next);
        validate_elements(&next)?;
        if next != self.canvas.elements {
            self.canvas.elements = next;
            self.emit(SceneChange::Elements);
        }
        debug_assert!(is_canonically_ordered(&self.canvas.elements));
        Ok(out)
    }

    fn index_of(&self, id: ElementId) -> Result<usize, ModelError> {
        self.canvas
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ModelError::UnknownElement(id.as_str().to_string()))
    }

    // ─── Groups ──────────────────────────────────────────────────────────

    /// Every element nested under `id`, depth first.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = match self.element(id) {
            Some(el) => el.group_children().iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            if out.contains(&next) || next == id {
                continue;
            }
            out.push(next);
            if let Some(el) = self.element(next) {
                stack.extend(el.group_children().iter().rev().copied());
            }
        }
        out
    }

    /// `ids` plus the descendants of any groups among them, deduplicated,
    /// in canonical (back to front) order.
    pub fn expand_groups(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut wanted: HashSet<ElementId> = HashSet::new();
        for id in ids {
            if self.contains(*id) {
                wanted.insert(*id);
                wanted.extend(self.descendants(*id));
            }
        }
        self.canvas
            .elements
            .iter()
            .filter(|e| wanted.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Follow `groupId` links up to the outermost group.
    pub fn top_level(&self, id: ElementId) -> ElementId {
        let mut current = id;
        for _ in 0..self.canvas.elements.len() {
            match self.element(current).and_then(|e| e.group_id) {
                Some(parent) if self.contains(parent) => current = parent,
                _ => break,
            }
        }
        current
    }

    /// Combined bounds of `ids`.
    pub fn bounds_of(&self, ids: &[ElementId]) -> Option<Bounds> {
        Bounds::union_all(ids.iter().filter_map(|id| self.element(*id)).map(|e| e.bounds()))
    }

    /// Combined bounds of every element.
    pub fn content_bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.canvas.elements.iter().map(|e| e.bounds()))
    }

    // ─── Guides & background ─────────────────────────────────────────────

    pub fn add_guide(&mut self, guide: Guide) -> Result<usize, ModelError> {
        check_guide(&guide)?;
        self.canvas.guides.push(guide);
        self.emit(SceneChange::Guides);
        Ok(self.canvas.guides.len() - 1)
    }

    pub fn move_guide(&mut self, index: usize, position: f64) -> Result<(), ModelError> {
        let Some(guide) = self.canvas.guides.get_mut(index) else {
            return Ok(());
        };
        let moved = Guide {
            axis: guide.axis,
            position,
        };
        check_guide(&moved)?;
        if *guide != moved {
            *guide = moved;
            self.emit(SceneChange::Guides);
        }
        Ok(())
    }

    pub fn remove_guide(&mut self, index: usize) -> Option<Guide> {
        if index >= self.canvas.guides.len() {
            return None;
        }
        let guide = self.canvas.guides.remove(index);
        self.emit(SceneChange::Guides);
        Some(guide)
    }

    pub fn set_background(&mut self, background: Option<Background>) -> Result<(), ModelError> {
        if let Some(bg) = &background {
            bg.check()?;
        }
        if self.canvas.background_color != background {
            self.canvas.background_color = background;
            self.emit(SceneChange::Background);
        }
        Ok(())
    }
}

fn check_guide(guide: &Guide) -> Result<(), ModelError> {
    if guide.position.is_finite() {
        Ok(())
    } else {
        Err(ModelError::NonFinite {
            id: "guide".to_string(),
            field: "position",
        })
    }
}

/// Stable sort by `zIndex`, so equal ranks keep their array order.
pub fn sort_canonical(elements: &mut [Element]) {
    elements.sort_by(|a, b| a.z_index.total_cmp(&b.z_index));
}
