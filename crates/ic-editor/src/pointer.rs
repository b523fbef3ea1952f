//! Pointer handling: the interaction state machine.
//!
//! | From | Input | To |
//! |------|-------|----|
//! | Idle | middle button anywhere | Panning |
//! | Idle | primary on a ruler or guide (rulers shown) | GuideDrag |
//! | Idle | primary on a resize handle | Resizing |
//! | Idle | primary on an unlocked element | Dragging |
//! | Idle | primary on empty canvas, drawing tool | Drawing |
//! | Idle | Ctrl/Cmd + primary on empty canvas | Marquee |
//! | Idle | primary on empty canvas | Panning |
//! | any | pointer up / leave | Idle |
//!
//! Shift or Ctrl/Cmd + click toggles an element in the selection; Alt +
//! click cycles through the elements stacked under the pointer. Drags and
//! resizes snapshot history on the way in and commit on the way out.

use crate::commands::CommandOutcome;
use crate::editor::Editor;
use crate::guides;
use crate::input::{Modifiers, PointerButton, PointerEvent};
use crate::interaction::{
    DragState, Gesture, GuideDragState, MarqueeState, Mode, ResizeState,
};
use crate::selection::SelectMode;
use crate::tools::ToolEvent;
use crate::transform::{resize_bounds, top_level_targets};
use ic_core::{Bounds, CanvasBackend, ElementId, ElementKind, Guide, ResizeMode};
use ic_render::{hit_test, hit_test_all, hit_test_rect};

impl<B: CanvasBackend + 'static> Editor<B> {
    pub fn pointer_down(&mut self, ev: PointerEvent) -> Mode {
        if !matches!(self.gesture, Gesture::Idle) {
            self.finish_gesture();
        }
        let (wx, wy) = self.viewport.screen_to_world(ev.x, ev.y);
        self.pointer_world = (wx, wy);
        match ev.button {
            PointerButton::Middle => self.begin_pan(ev.x, ev.y),
            PointerButton::Secondary => {
                // Context menus act on what was clicked.
                if let Some(hit) = hit_test(&self.render, wx, wy)
                    && !self.selection.is_selected(hit)
                {
                    self.selection.select(hit, SelectMode::Replace);
                }
            }
            PointerButton::Primary => self.primary_down(ev, wx, wy),
        }
        log::trace!("pointer down -> {:?}", self.gesture.mode());
        self.gesture.mode()
    }

    fn primary_down(&mut self, ev: PointerEvent, wx: f64, wy: f64) {
        if self.rulers_visible && self.begin_guide_drag(ev.x, ev.y) {
            return;
        }
        if let Some(handle) = self.overlay().handle_at(wx, wy).copied()
            && let Some(el) = self.scene.element(handle.element)
        {
            let state = ResizeState {
                element: el.id,
                corner: handle.corner,
                initial: el.bounds(),
                mode: el.resize_mode(),
                grab: (wx, wy),
            };
            self.history.begin("resize", self.scene.elements());
            self.gesture = Gesture::Resizing(state);
            log::debug!("resize {} from {:?}", state.element, state.corner);
            return;
        }
        match hit_test(&self.render, wx, wy) {
            Some(hit) => self.element_down(hit, ev.modifiers, wx, wy),
            None => self.canvas_down(ev, wx, wy),
        }
    }

    fn begin_guide_drag(&mut self, sx: f64, sy: f64) -> bool {
        let rulers = &self.config.rulers;
        let state = if let Some(axis) = guides::ruler_at(sx, sy, rulers.size) {
            GuideDragState {
                axis,
                index: None,
                position: guides::guide_position(&self.viewport, axis, sx, sy),
            }
        } else if let Some(index) =
            guides::guide_at(self.scene.guides(), &self.viewport, sx, sy, rulers.guide_hit_tolerance)
        {
            let guide = self.scene.guides()[index];
            GuideDragState {
                axis: guide.axis,
                index: Some(index),
                position: guide.position,
            }
        } else {
            return false;
        };
        self.gesture = Gesture::GuideDrag(state);
        true
    }

    fn element_down(&mut self, hit: ElementId, modifiers: Modifiers, wx: f64, wy: f64) {
        if modifiers.alt {
            // Cycle to the next element under the pointer.
            let stack = hit_test_all(&self.render, wx, wy);
            let next = self
                .selection
                .primary()
                .and_then(|p| stack.iter().position(|s| *s == p))
                .map_or(hit, |i| stack[(i + 1) % stack.len()]);
            self.selection.select(next, SelectMode::Replace);
            return;
        }
        if modifiers.shift || modifiers.primary() {
            self.selection.select(hit, SelectMode::Toggle);
            return;
        }
        let mode = if self.selection.is_selected(hit) {
            SelectMode::Add
        } else {
            SelectMode::Replace
        };
        self.selection.select(hit, mode);
        self.begin_drag(hit, wx, wy);
    }

    /// Capture every unlocked selected target (with its descendants) at
    /// its current position. A locked anchor stays selected but does not move.
    fn begin_drag(&mut self, anchor: ElementId, wx: f64, wy: f64) {
        let Some(anchor_el) = self.scene.element(anchor) else {
            return;
        };
        if anchor_el.is_locked() {
            log::trace!("{anchor} is locked, not dragging");
            return;
        }
        let anchor_bounds = anchor_el.bounds();
        let movers: Vec<ElementId> = top_level_targets(&self.scene, self.selection.ids())
            .into_iter()
            .filter(|id| self.scene.element(*id).is_some_and(|e| !e.is_locked()))
            .collect();
        let origins = self
            .scene
            .expand_groups(&movers)
            .into_iter()
            .filter_map(|id| self.scene.element(id))
            .map(|e| (e.id, e.x, e.y))
            .collect();
        self.history.begin("move", self.scene.elements());
        self.gesture = Gesture::Dragging(DragState {
            anchor,
            anchor_bounds,
            grab: (wx, wy),
            origins,
        });
        log::debug!("drag {anchor} with {} members", movers.len());
    }

    fn canvas_down(&mut self, ev: PointerEvent, wx: f64, wy: f64) {
        let modifiers = ev.modifiers;
        if self.tools.active().is_drawing() && !modifiers.shift {
            if let Some(tool) = self.tools.current_mut() {
                tool.handle(&ToolEvent::Down { x: wx, y: wy, modifiers }, &self.config.drawing);
            }
            self.gesture = Gesture::Drawing;
            return;
        }
        if modifiers.primary() {
            self.gesture = Gesture::Marquee(MarqueeState {
                origin: (wx, wy),
                current: (wx, wy),
                mode: if modifiers.shift { SelectMode::Add } else { SelectMode::Replace },
                base: self.selection.ids().to_vec(),
            });
            return;
        }
        if !modifiers.shift {
            self.selection.clear();
        }
        self.begin_pan(ev.x, ev.y);
    }

    fn begin_pan(&mut self, sx: f64, sy: f64) {
        self.gesture = Gesture::Panning(self.viewport.begin_pan(sx, sy));
    }

    pub fn pointer_move(&mut self, ev: PointerEvent) {
        let (wx, wy) = self.viewport.screen_to_world(ev.x, ev.y);
        self.pointer_world = (wx, wy);
        let gesture = std::mem::take(&mut self.gesture);
        self.gesture = match gesture {
            Gesture::Idle => Gesture::Idle,
            Gesture::Panning(anchor) => {
                self.viewport.pan_to(&anchor, ev.x, ev.y);
                Gesture::Panning(anchor)
            }
            Gesture::Dragging(drag) => {
                self.drag_to(&drag, wx, wy);
                Gesture::Dragging(drag)
            }
            Gesture::Resizing(state) => {
                self.resize_to(&state, wx, wy);
                Gesture::Resizing(state)
            }
            Gesture::Marquee(mut marquee) => {
                marquee.current = (wx, wy);
                self.apply_marquee(&marquee);
                Gesture::Marquee(marquee)
            }
            Gesture::Drawing => {
                if let Some(tool) = self.tools.current_mut() {
                    let event = ToolEvent::Move {
                        x: wx,
                        y: wy,
                        modifiers: ev.modifiers,
                    };
                    tool.handle(&event, &self.config.drawing);
                }
                Gesture::Drawing
            }
            Gesture::GuideDrag(mut state) => {
                state.position = guides::guide_position(&self.viewport, state.axis, ev.x, ev.y);
                if let Some(index) = state.index
                    && let Err(e) = self.scene.move_guide(index, state.position)
                {
                    log::warn!("guide move rejected: {e}");
                }
                Gesture::GuideDrag(state)
            }
        };
        self.sync_render();
    }

    pub fn pointer_up(&mut self, ev: PointerEvent) {
        let (wx, wy) = self.viewport.screen_to_world(ev.x, ev.y);
        self.pointer_world = (wx, wy);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Panning(anchor) => self.viewport.pan_to(&anchor, ev.x, ev.y),
            Gesture::Dragging(drag) => {
                self.drag_to(&drag, wx, wy);
                self.commit_gesture();
            }
            Gesture::Resizing(state) => {
                self.resize_to(&state, wx, wy);
                self.commit_gesture();
            }
            Gesture::Marquee(mut marquee) => {
                marquee.current = (wx, wy);
                self.apply_marquee(&marquee);
            }
            Gesture::Drawing => self.finish_drawing(wx, wy, ev.modifiers),
            Gesture::GuideDrag(state) => self.drop_guide(state, ev.x, ev.y),
        }
        self.sync_render();
    }

    /// The pointer left the document: end the gesture, keeping what it did
    /// so far. An unfinished stroke is discarded.
    pub fn pointer_leave(&mut self) {
        self.finish_gesture();
        self.sync_render();
    }

    /// End the current gesture without a final pointer position.
    pub(crate) fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging(_) | Gesture::Resizing(_) => self.commit_gesture(),
            Gesture::Drawing => {
                if let Some(tool) = self.tools.current_mut() {
                    tool.cancel();
                }
            }
            Gesture::GuideDrag(GuideDragState { index: Some(_), .. }) => self.schedule_save(),
            Gesture::Idle | Gesture::Panning(_) | Gesture::Marquee(_) | Gesture::GuideDrag(_) => {}
        }
    }

    fn commit_gesture(&mut self) {
        if self.history.commit(self.scene.elements()) {
            self.sync_render();
            self.schedule_save();
        }
    }

    /// Move the drag set so the anchor follows the pointer. Snapping is
    /// computed for the anchor and the same correction applies to everyone.
    fn drag_to(&mut self, drag: &DragState, wx: f64, wy: f64) {
        let candidate = drag.anchor_candidate(wx, wy);
        let (sx, sy) = self.snapper.snap(candidate, self.scene.guides());
        let moves = drag.positions(wx, wy, (sx - candidate.x, sy - candidate.y));
        if let Err(e) = self.scene.move_elements(&moves) {
            log::warn!("drag rejected: {e}");
        }
    }

    fn resize_to(&mut self, state: &ResizeState, wx: f64, wy: f64) {
        let min_size = self.config.resize.min_size;
        let (mut dx, mut dy) = (wx - state.grab.0, wy - state.grab.1);
        let mut bounds = resize_bounds(state.initial, state.corner, dx, dy, state.mode, min_size);
        if state.mode == ResizeMode::Free && self.snapper.is_active() {
            // Snap the dragged corner; the anchor corner stays where it is.
            let (cx, cy) = state.corner.point_of(&bounds);
            let (sx, sy) = self
                .snapper
                .snap(Bounds::new(cx, cy, 0.0, 0.0), self.scene.guides());
            if (sx, sy) != (cx, cy) {
                dx += sx - cx;
                dy += sy - cy;
                bounds = resize_bounds(state.initial, state.corner, dx, dy, state.mode, min_size);
            }
        }
        if let Err(e) = self.scene.update_element(state.element, |el| el.set_bounds(bounds)) {
            log::warn!("resize rejected: {e}");
        }
    }

    fn apply_marquee(&mut self, marquee: &MarqueeState) {
        let hits = hit_test_rect(&self.render, marquee.rect());
        match marquee.mode {
            SelectMode::Replace | SelectMode::Toggle => self.selection.select_many(hits),
            SelectMode::Add => self
                .selection
                .select_many(marquee.base.iter().copied().chain(hits)),
        }
    }

    /// Commit the stroke as a new element on top of the stack.
    fn finish_drawing(&mut self, wx: f64, wy: f64, modifiers: Modifiers) {
        let Some(tool) = self.tools.current_mut() else {
            return;
        };
        let event = ToolEvent::Up { x: wx, y: wy, modifiers };
        let Some(mut element) = tool.handle(&event, &self.config.drawing) else {
            log::trace!("stroke too small, discarded");
            return;
        };
        element.z_index = self.next_z();
        self.history.begin("draw", self.scene.elements());
        match self.scene.add_element(element) {
            Ok(()) => self.commit_gesture(),
            Err(e) => {
                self.history.abandon();
                log::warn!("drawn element rejected: {e}");
            }
        }
    }

    /// Drop a guide: back on its ruler deletes it, anywhere else places it.
    fn drop_guide(&mut self, state: GuideDragState, sx: f64, sy: f64) {
        let on_ruler = guides::over_own_ruler(state.axis, sx, sy, self.config.rulers.size);
        let position = guides::guide_position(&self.viewport, state.axis, sx, sy);
        let changed = match (state.index, on_ruler) {
            (Some(index), true) => self.scene.remove_guide(index).is_some(),
            (Some(index), false) => self.scene.move_guide(index, position).is_ok(),
            (None, true) => false,
            (None, false) => self
                .scene
                .add_guide(Guide {
                    axis: state.axis,
                    position,
                })
                .is_ok(),
        };
        if changed {
            log::debug!("guide {:?} at {position:.1}", state.axis);
            self.schedule_save();
        }
    }

    /// Double-click: delete a guide, or open a folder.
    pub fn double_click(&mut self, ev: PointerEvent) -> CommandOutcome {
        self.finish_gesture();
        if self.rulers_visible
            && let Some(index) = guides::guide_at(
                self.scene.guides(),
                &self.viewport,
                ev.x,
                ev.y,
                self.config.rulers.guide_hit_tolerance,
            )
        {
            self.scene.remove_guide(index);
            self.schedule_save();
            return CommandOutcome::changed();
        }
        let (wx, wy) = self.viewport.screen_to_world(ev.x, ev.y);
        let target = hit_test_all(&self.render, wx, wy)
            .into_iter()
            .flat_map(|id| std::iter::once(id).chain(self.scene.descendants(id)))
            .find_map(|id| {
                let el = self.scene.element(id)?;
                match &el.kind {
                    ElementKind::Folder {
                        target_canvas_id, ..
                    } if el.bounds().contains(wx, wy) => Some(target_canvas_id.clone()),
                    _ => None,
                }
            });
        match target {
            Some(canvas) => CommandOutcome::navigate(canvas),
            None => CommandOutcome::ignored(),
        }
    }

    /// Wheel zoom about the pointer. The event is always consumed; returns
    /// whether the zoom changed.
    pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) -> bool {
        self.viewport.wheel(delta_y, sx, sy)
    }

    /// Pinch zoom by `scale` about the gesture center.
    pub fn pinch(&mut self, scale: f64, cx: f64, cy: f64) -> bool {
        self.viewport.zoom_at(scale, cx, cy)
    }
}
