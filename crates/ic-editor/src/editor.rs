//! Editor session.
//!
//! `Editor` owns one open canvas and every piece of state needed to edit
//! it: scene, render tree, viewport, selection, history, clipboard, tools,
//! and the autosave coordinator. Hosts feed it pointer and key events and
//! read back the render tree, overlay, and rulers.
//!
//! User intents never return errors. Commands report a [`CommandOutcome`];
//! persistence failures surface through [`SaveStatus`].
//!
//! The autosave coordinator runs on a local task, so an editor must be
//! created inside a `tokio::task::LocalSet`.

use crate::arrange;
use crate::autosave::{Autosave, SaveStatus};
use crate::clipboard::{Clipboard, Payload, Placement};
use crate::commands::{Command, CommandOutcome};
use crate::error::EditorError;
use crate::history::{History, Snapshot};
use crate::interaction::{Gesture, Mode};
use crate::input::KeyEvent;
use crate::scene::{Scene, SceneChange};
use crate::selection::{SelectMode, Selection};
use crate::shortcuts::ShortcutMap;
use crate::snapping::Snapper;
use crate::tools::{ToolBox, ToolKind};
use crate::transform::{self, AlignKind, Orientation, top_level_targets};
use crate::viewport::Viewport;
use ic_core::{
    Background, Bounds, Canvas, CanvasBackend, CanvasId, EditorConfig, Element, ElementId,
    ElementKind, FilterKind,
};
use ic_render::{RenderTree, SelectionOverlay, Tick, refined_image_size, ruler_ticks, selection_overlay};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::watch;

/// Resize handle edge length in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Size of a new folder element in world units.
const FOLDER_SIZE: (f64, f64) = (200.0, 150.0);

pub struct Editor<B: CanvasBackend + 'static> {
    pub(crate) backend: Rc<B>,
    pub(crate) config: EditorConfig,
    pub(crate) scene: Scene,
    pub(crate) render: RenderTree,
    pub(crate) viewport: Viewport,
    pub(crate) selection: Selection,
    pub(crate) history: History,
    pub(crate) snapper: Snapper,
    pub(crate) clipboard: Clipboard,
    pub(crate) autosave: Autosave,
    pub(crate) tools: ToolBox,
    pub(crate) gesture: Gesture,
    pub(crate) rulers_visible: bool,
    pub(crate) grid_visible: bool,
    pub(crate) help_visible: bool,
    /// Last pointer position in world units (paste target).
    pub(crate) pointer_world: (f64, f64),
    /// Freshly imported images whose size follows the decoded bitmap.
    pub(crate) pending_refinement: HashSet<ElementId>,
}

/// Load a canvas, standing in an empty one when the backend has none.
async fn load_canvas<B: CanvasBackend>(backend: &B, id: &CanvasId) -> Result<Canvas, EditorError> {
    match backend.get_canvas(id).await {
        Ok(doc) => Ok(doc),
        Err(e) if e.is_not_found() => {
            log::info!("canvas {id} not found, starting empty");
            Ok(Canvas::placeholder(id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

impl<B: CanvasBackend + 'static> Editor<B> {
    /// Open `canvas` in a container of `width × height` pixels.
    pub async fn open(
        backend: Rc<B>,
        config: EditorConfig,
        canvas: &CanvasId,
        width: f64,
        height: f64,
    ) -> Result<Self, EditorError> {
        let config = config.normalized();
        let doc = load_canvas(&*backend, canvas).await?;
        let scene = Scene::new(doc)?;
        let viewport = Viewport::new(
            scene.canvas().view_box,
            width,
            height,
            config.viewport.clone(),
        );
        let autosave = Autosave::spawn(
            backend.clone(),
            Duration::from_millis(config.autosave.debounce_ms),
        );
        let mut editor = Self {
            backend,
            history: History::new(config.history.capacity),
            snapper: Snapper::new(&config.snap),
            config,
            scene,
            render: RenderTree::new(),
            viewport,
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            autosave,
            tools: ToolBox::new(),
            gesture: Gesture::Idle,
            rulers_visible: false,
            grid_visible: false,
            help_visible: false,
            pointer_world: (0.0, 0.0),
            pending_refinement: HashSet::new(),
        };
        editor.sync_render();
        log::info!("editor: opened canvas {canvas}");
        Ok(editor)
    }

    // ─── Canvas lifecycle ────────────────────────────────────────────────

    /// Switch to another canvas. Pending saves are flushed first and the
    /// undo history is cleared. On failure the current canvas stays open.
    pub async fn open_canvas(&mut self, id: &CanvasId) -> Result<(), EditorError> {
        self.finish_gesture();
        self.autosave.flush().await;
        let doc = load_canvas(&*self.backend, id).await?;
        let scene = Scene::new(doc)?;
        log::info!("editor: switching {} -> {id}", self.scene.id());

        self.scene = scene;
        self.history.clear();
        self.selection.clear();
        self.tools.set_active(self.tools.active());
        self.pending_refinement.clear();
        self.render.clear();
        self.viewport.reset(self.scene.canvas().view_box);
        self.sync_render();
        Ok(())
    }

    /// Create a child canvas and a folder element linking to it. `at` is
    /// the folder center in world units (defaults to the view center).
    pub async fn create_folder(
        &mut self,
        name: &str,
        at: Option<(f64, f64)>,
    ) -> Result<ElementId, EditorError> {
        self.finish_gesture();
        let parent = self.scene.id().clone();
        let canvas = self.backend.create_canvas(Some(name), Some(&parent)).await?;
        self.backend
            .tree_add_canvas(&canvas.id, Some(&parent), name)
            .await?;
        let (cx, cy) = at.unwrap_or_else(|| self.viewport.center_world());
        let (w, h) = FOLDER_SIZE;
        let folder = Element::with_generated_id(
            ElementKind::Folder {
                name: name.to_string(),
                target_canvas_id: canvas.id,
            },
            Bounds::new(cx - w / 2.0, cy - h / 2.0, w, h),
        );
        self.insert_element(folder, "new folder")
    }

    /// Upload image bytes and place an image element centered on `at`.
    /// Its size follows the bitmap once the host reports it loaded.
    pub async fn import_image(
        &mut self,
        bytes: &[u8],
        name: &str,
        at: Option<(f64, f64)>,
    ) -> Result<ElementId, EditorError> {
        self.finish_gesture();
        let uploaded = self.backend.upload_image(bytes, name).await?;
        let (cx, cy) = at.unwrap_or_else(|| self.viewport.center_world());
        let side = self.config.images.max_image_size;
        let image = Element::with_generated_id(
            ElementKind::Image { src: uploaded.path },
            Bounds::new(cx - side / 2.0, cy - side / 2.0, side, side),
        );
        let id = self.insert_element(image, "import image")?;
        self.pending_refinement.insert(id);
        Ok(id)
    }

    /// Add one element above everything else as its own undo step and
    /// select it.
    fn insert_element(&mut self, mut element: Element, label: &str) -> Result<ElementId, EditorError> {
        element.z_index = self.next_z();
        let id = element.id;
        self.history.begin(label, self.scene.elements());
        if let Err(e) = self.scene.add_element(element) {
            self.history.abandon();
            return Err(e.into());
        }
        self.history.commit(self.scene.elements());
        self.selection.select(id, SelectMode::Replace);
        self.after_mutation();
        Ok(id)
    }

    pub(crate) fn next_z(&self) -> f64 {
        self.scene.max_z().map_or(0.0, |z| z + 1.0)
    }

    /// Write pending saves now.
    pub async fn flush(&self) {
        self.autosave.flush().await;
    }

    /// Flush pending saves and stop the autosave coordinator.
    pub async fn shutdown(self) {
        self.autosave.shutdown().await;
    }

    // ─── Image loading ───────────────────────────────────────────────────

    /// Image fetches the host should start.
    pub fn take_image_requests(&mut self) -> Vec<(ElementId, String)> {
        self.render.take_image_requests()
    }

    /// A bitmap finished decoding. Returns false when the element is gone,
    /// in which case nothing happens.
    pub fn on_image_loaded(&mut self, id: ElementId, natural_width: f64, natural_height: f64) -> bool {
        let refine = self.pending_refinement.remove(&id);
        if !self.render.mark_image_loaded(id, natural_width, natural_height) {
            log::trace!("image {id} loaded after removal, dropped");
            return false;
        }
        if refine {
            let (w, h) = refined_image_size(natural_width, natural_height, self.config.images.max_image_size);
            match self.scene.update_element(id, |el| {
                el.width = w;
                el.height = h;
            }) {
                Ok(()) => self.after_mutation(),
                Err(e) => log::warn!("image {id}: refinement rejected: {e}"),
            }
        }
        true
    }

    pub fn on_image_failed(&mut self, id: ElementId) {
        self.pending_refinement.remove(&id);
        if self.render.mark_image_failed(id) {
            log::debug!("image {id} failed to load");
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Resolve and run a key press. Keys typed into text inputs are ignored.
    pub fn key_down(&mut self, event: &KeyEvent) -> CommandOutcome {
        match ShortcutMap::resolve_event(event) {
            Some(command) => self.execute(command),
            None => CommandOutcome::ignored(),
        }
    }

    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        log::trace!("execute {}", command.label());
        if command != Command::Escape {
            self.finish_gesture();
        }
        let ids: Vec<ElementId> = self.selection.ids().to_vec();
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Copy => self.copy(),
            Command::Cut => self.cut(),
            Command::Paste => self.paste(),
            Command::Duplicate => self.duplicate(),
            Command::Delete => self.delete_selected(),
            Command::SelectAll => self.select_all(),
            Command::Escape => self.escape(),
            Command::Group => self.apply("group", |ed| {
                let gid = arrange::group(&mut ed.scene, &ids)?;
                ed.selection.select(gid, SelectMode::Replace);
                Ok(())
            }),
            Command::Ungroup => self.apply("ungroup", |ed| {
                let released = arrange::ungroup(&mut ed.scene, &ids)?;
                ed.selection.select_many(released);
                Ok(())
            }),
            Command::BringForward => {
                self.apply("bring forward", |ed| arrange::bring_forward(&mut ed.scene, &ids))
            }
            Command::BringToFront => {
                self.apply("bring to front", |ed| arrange::bring_to_front(&mut ed.scene, &ids))
            }
            Command::SendBackward => {
                self.apply("send backward", |ed| arrange::send_backward(&mut ed.scene, &ids))
            }
            Command::SendToBack => {
                self.apply("send to back", |ed| arrange::send_to_back(&mut ed.scene, &ids))
            }
            Command::ToggleLock => self.toggle_lock(),
            Command::ToggleVisibility => self.toggle_visibility(),
            Command::ToggleFilter(kind) => self.toggle_filter(kind),
            Command::Align(kind) => {
                self.apply("align", |ed| transform::align(&mut ed.scene, &ids, kind))
            }
            Command::Distribute(orientation) => self.apply("distribute", |ed| {
                transform::distribute(&mut ed.scene, &ids, orientation)
            }),
            Command::Flip(orientation) => {
                self.apply("flip", |ed| transform::flip(&mut ed.scene, &ids, orientation))
            }
            Command::OpenFolder => self.open_folder_target(),
            Command::SetBackground(bg) => self.set_background(bg),
            Command::ZoomIn => self.zoom_step(self.config.viewport.wheel_step),
            Command::ZoomOut => self.zoom_step(1.0 / self.config.viewport.wheel_step),
            Command::ZoomToFit => self.zoom_to_fit(),
            Command::ZoomToActualSize => {
                self.viewport.zoom_to_actual_size();
                CommandOutcome::handled()
            }
            Command::ZoomToSelection => self.zoom_to_selection(),
            Command::ToggleRulers => {
                self.rulers_visible = !self.rulers_visible;
                self.snapper.guides = self.rulers_visible;
                CommandOutcome::handled()
            }
            Command::ToggleGrid => {
                self.grid_visible = !self.grid_visible;
                CommandOutcome::handled()
            }
            Command::ToggleSnap => {
                self.snapper.grid = !self.snapper.grid;
                log::debug!("grid snapping {}", if self.snapper.grid { "on" } else { "off" });
                CommandOutcome::handled()
            }
            Command::ToggleHelp => {
                self.help_visible = !self.help_visible;
                CommandOutcome::handled()
            }
            Command::SetTool(kind) => {
                self.tools.set_active(kind);
                CommandOutcome::handled()
            }
        }
    }

    /// Run `op` as one undoable intent. The history entry is only kept when
    /// the elements changed; a change schedules an autosave.
    pub(crate) fn apply(
        &mut self,
        label: &str,
        op: impl FnOnce(&mut Self) -> Result<(), EditorError>,
    ) -> CommandOutcome {
        self.history.begin(label, self.scene.elements());
        let result = op(self);
        let changed = self.history.commit(self.scene.elements());
        self.sync_render();
        if changed {
            self.schedule_save();
        }
        match result {
            Ok(()) if changed => CommandOutcome::changed(),
            Ok(()) => CommandOutcome::handled(),
            Err(e) => {
                log::debug!("{label}: {e}");
                CommandOutcome {
                    changed,
                    ..CommandOutcome::failed(e.to_string())
                }
            }
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> CommandOutcome {
        match self.history.undo(self.scene.elements()) {
            Some(snapshot) => self.restore(snapshot),
            None => CommandOutcome::handled(),
        }
    }

    pub fn redo(&mut self) -> CommandOutcome {
        match self.history.redo(self.scene.elements()) {
            Some(snapshot) => self.restore(snapshot),
            None => CommandOutcome::handled(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) -> CommandOutcome {
        match self.scene.replace_elements(snapshot.elements) {
            Ok(()) => {
                self.after_mutation();
                CommandOutcome::changed()
            }
            Err(e) => {
                log::error!("history: snapshot {} rejected: {e}", snapshot.label);
                CommandOutcome::failed(e.to_string())
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    pub fn copy(&mut self) -> CommandOutcome {
        let ids = self.selection.ids().to_vec();
        if self.clipboard.copy(&self.scene, &ids) == 0 {
            return CommandOutcome::failed(EditorError::NothingSelected.to_string());
        }
        CommandOutcome::handled()
    }

    pub fn cut(&mut self) -> CommandOutcome {
        let copied = self.copy();
        if copied.error.is_some() {
            return copied;
        }
        self.delete_selected()
    }

    /// Paste the clipboard: offset on its source canvas, at the pointer on
    /// any other. The pasted elements become the selection.
    pub fn paste(&mut self) -> CommandOutcome {
        let placement = self.clipboard.placement(
            self.scene.id(),
            self.pointer_world,
            self.config.clipboard.paste_offset,
        );
        match (self.clipboard.payload().cloned(), placement) {
            (Some(payload), Some(placement)) => self.paste_payload(&payload, placement, "paste"),
            _ => CommandOutcome::failed(EditorError::EmptyClipboard.to_string()),
        }
    }

    /// Copy and paste the selection in one step, leaving the clipboard alone.
    pub fn duplicate(&mut self) -> CommandOutcome {
        let ids = self.selection.ids().to_vec();
        match Payload::capture(&self.scene, &ids) {
            Some(payload) => {
                let offset = self.config.clipboard.paste_offset;
                self.paste_payload(&payload, Placement::Offset(offset, offset), "duplicate")
            }
            None => CommandOutcome::failed(EditorError::NothingSelected.to_string()),
        }
    }

    fn paste_payload(&mut self, payload: &Payload, placement: Placement, label: &str) -> CommandOutcome {
        let top = self.scene.max_z().unwrap_or(-1.0);
        let (elements, roots) = payload.instantiate(placement, top);
        self.apply(label, |ed| {
            ed.scene.add_elements(elements)?;
            ed.selection.select_many(roots);
            Ok(())
        })
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Delete the selected elements (groups take their members along).
    pub fn delete_selected(&mut self) -> CommandOutcome {
        let targets = top_level_targets(&self.scene, self.selection.ids());
        if targets.is_empty() {
            return CommandOutcome::failed(EditorError::NothingSelected.to_string());
        }
        let doomed = self.scene.expand_groups(&targets);
        let outcome = self.apply("delete", |ed| {
            ed.scene.remove_elements(&doomed);
            Ok(())
        });
        self.selection.clear();
        outcome
    }

    pub fn select_all(&mut self) -> CommandOutcome {
        let top: Vec<ElementId> = self
            .scene
            .elements()
            .iter()
            .filter(|e| e.is_visible())
            .map(|e| self.scene.top_level(e.id))
            .collect();
        self.selection.select_many(top);
        CommandOutcome::handled()
    }

    pub fn select(&mut self, id: ElementId, mode: SelectMode) {
        if self.scene.contains(id) {
            self.selection.select(self.scene.top_level(id), mode);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Help overlay first, then an in-progress drawing, then the selection.
    fn escape(&mut self) -> CommandOutcome {
        if self.help_visible {
            self.help_visible = false;
            return CommandOutcome::handled();
        }
        if matches!(self.gesture, Gesture::Drawing) {
            if let Some(tool) = self.tools.current_mut() {
                tool.cancel();
            }
            self.gesture = Gesture::Idle;
            log::debug!("drawing cancelled");
            return CommandOutcome::handled();
        }
        self.finish_gesture();
        if self.selection.is_empty() {
            return CommandOutcome::ignored();
        }
        self.selection.clear();
        CommandOutcome::handled()
    }

    // ─── Element state ───────────────────────────────────────────────────

    /// Lock every selected target, or unlock them all when all are locked.
    pub fn toggle_lock(&mut self) -> CommandOutcome {
        let targets = top_level_targets(&self.scene, self.selection.ids());
        if targets.is_empty() {
            return CommandOutcome::failed(EditorError::NothingSelected.to_string());
        }
        let lock = targets
            .iter()
            .any(|id| self.scene.element(*id).is_some_and(|e| !e.is_locked()));
        self.apply(if lock { "lock" } else { "unlock" }, |ed| {
            ed.scene.edit(|els| {
                for el in els.iter_mut().filter(|e| targets.contains(&e.id)) {
                    el.locked = lock.then_some(true);
                }
                Ok(())
            })?;
            Ok(())
        })
    }

    /// Hide every selected target, or show them all when all are hidden.
    pub fn toggle_visibility(&mut self) -> CommandOutcome {
        let targets = self.scene.expand_groups(self.selection.ids());
        if targets.is_empty() {
            return CommandOutcome::failed(EditorError::NothingSelected.to_string());
        }
        let hide = targets
            .iter()
            .any(|id| self.scene.element(*id).is_some_and(|e| e.is_visible()));
        self.apply(if hide { "hide" } else { "show" }, |ed| {
            ed.scene.edit(|els| {
                for el in els.iter_mut().filter(|e| targets.contains(&e.id)) {
                    el.visible = hide.then_some(false);
                }
                Ok(())
            })?;
            Ok(())
        })
    }

    /// Toggle one filter on every selected image.
    pub fn toggle_filter(&mut self, kind: FilterKind) -> CommandOutcome {
        let images: Vec<ElementId> = self
            .scene
            .expand_groups(self.selection.ids())
            .into_iter()
            .filter(|id| {
                self.scene
                    .element(*id)
                    .is_some_and(|e| matches!(e.kind, ElementKind::Image { .. }))
            })
            .collect();
        if images.is_empty() {
            return CommandOutcome::failed("filters apply to images only");
        }
        self.apply("filter", |ed| {
            ed.scene.edit(|els| {
                for el in els.iter_mut().filter(|e| images.contains(&e.id)) {
                    let filters = el.filters.get_or_insert_default();
                    filters.toggle(kind);
                    if filters.is_empty() {
                        el.filters = None;
                    }
                }
                Ok(())
            })?;
            Ok(())
        })
    }

    pub fn align(&mut self, kind: AlignKind) -> CommandOutcome {
        self.execute(Command::Align(kind))
    }

    pub fn distribute(&mut self, orientation: Orientation) -> CommandOutcome {
        self.execute(Command::Distribute(orientation))
    }

    pub fn flip(&mut self, orientation: Orientation) -> CommandOutcome {
        self.execute(Command::Flip(orientation))
    }

    pub fn group(&mut self) -> CommandOutcome {
        self.execute(Command::Group)
    }

    pub fn ungroup(&mut self) -> CommandOutcome {
        self.execute(Command::Ungroup)
    }

    pub fn bring_forward(&mut self) -> CommandOutcome {
        self.execute(Command::BringForward)
    }

    pub fn bring_to_front(&mut self) -> CommandOutcome {
        self.execute(Command::BringToFront)
    }

    pub fn send_backward(&mut self) -> CommandOutcome {
        self.execute(Command::SendBackward)
    }

    pub fn send_to_back(&mut self) -> CommandOutcome {
        self.execute(Command::SendToBack)
    }

    /// Canvas backgrounds are saved but not part of the undo history.
    pub fn set_background(&mut self, background: Option<Background>) -> CommandOutcome {
        if self.scene.background() == background.as_ref() {
            return CommandOutcome::handled();
        }
        if let Err(e) = self.scene.set_background(background) {
            log::debug!("set background: {e}");
            return CommandOutcome::failed(e.to_string());
        }
        self.after_mutation();
        CommandOutcome::changed()
    }

    fn open_folder_target(&self) -> CommandOutcome {
        match self.selection.primary().and_then(|id| self.scene.element(id)) {
            Some(Element {
                kind: ElementKind::Folder {
                    target_canvas_id, ..
                },
                ..
            }) => CommandOutcome::navigate(target_canvas_id.clone()),
            _ => CommandOutcome::failed("select a folder to open"),
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    fn zoom_step(&mut self, factor: f64) -> CommandOutcome {
        let (w, h) = self.viewport.container();
        self.viewport.zoom_at(factor, w / 2.0, h / 2.0);
        CommandOutcome::handled()
    }

    /// Fit all content, or return to the canvas's initial view when empty.
    fn zoom_to_fit(&mut self) -> CommandOutcome {
        match self.scene.content_bounds() {
            Some(bounds) if self.viewport.zoom_to_bounds(bounds) => {}
            _ => self.viewport.reset(self.scene.canvas().view_box),
        }
        CommandOutcome::handled()
    }

    fn zoom_to_selection(&mut self) -> CommandOutcome {
        let ids = self.scene.expand_groups(self.selection.ids());
        match self.scene.bounds_of(&ids) {
            Some(bounds) => {
                self.viewport.zoom_to_bounds(bounds);
                CommandOutcome::handled()
            }
            None => CommandOutcome::failed(EditorError::NothingSelected.to_string()),
        }
    }

    /// Resize the container, keeping zoom and top-left.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.viewport.set_container(width, height);
    }

    // ─── Plumbing ────────────────────────────────────────────────────────

    /// Forward queued scene changes to the render tree and drop selection
    /// entries for elements that no longer exist.
    pub(crate) fn sync_render(&mut self) {
        for change in self.scene.take_changes() {
            match change {
                SceneChange::Loaded => {
                    self.render.clear();
                    self.render.reconcile(self.scene.elements());
                    self.render.set_background(self.scene.background());
                }
                SceneChange::Elements => {
                    self.render.reconcile(self.scene.elements());
                }
                SceneChange::Background => self.render.set_background(self.scene.background()),
                SceneChange::Guides => {}
            }
        }
        let scene = &self.scene;
        self.selection.retain(|id| scene.contains(id));
        self.pending_refinement.retain(|id| scene.contains(*id));
    }

    pub(crate) fn schedule_save(&self) {
        self.autosave.schedule(self.scene.canvas().clone());
    }

    pub(crate) fn after_mutation(&mut self) {
        self.sync_render();
        self.schedule_save();
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn canvas_id(&self) -> &CanvasId {
        self.scene.id()
    }

    pub fn render_tree(&self) -> &RenderTree {
        &self.render
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the selection changed since the last call.
    pub fn take_selection_changed(&mut self) -> bool {
        self.selection.take_changed()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.gesture.mode()
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.active()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.subscribe()
    }

    pub fn rulers_visible(&self) -> bool {
        self.rulers_visible
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn snap_enabled(&self) -> bool {
        self.snapper.grid
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Outlines and resize handles for the current selection.
    pub fn overlay(&self) -> SelectionOverlay {
        selection_overlay(
            &self.render,
            self.selection.ids(),
            self.selection.primary(),
            self.viewport.screen_len_to_world(HANDLE_SIZE_PX),
        )
    }

    /// Ticks along the top ruler, empty when rulers are hidden.
    pub fn horizontal_ruler(&self) -> Vec<Tick> {
        if !self.rulers_visible {
            return Vec::new();
        }
        let (ppu, _) = self.viewport.pixels_per_unit();
        let (w, _) = self.viewport.container();
        ruler_ticks(self.viewport.view().x, ppu, w, self.config.rulers.min_tick_spacing)
    }

    /// Ticks along the left ruler, empty when rulers are hidden.
    pub fn vertical_ruler(&self) -> Vec<Tick> {
        if !self.rulers_visible {
            return Vec::new();
        }
        let (_, ppu) = self.viewport.pixels_per_unit();
        let (_, h) = self.viewport.container();
        ruler_ticks(self.viewport.view().y, ppu, h, self.config.rulers.min_tick_spacing)
    }

    /// The element being drawn, for a live preview.
    pub fn drawing_preview(&self) -> Option<Element> {
        match self.gesture {
            Gesture::Drawing => self.tools.current()?.preview(&self.config.drawing),
            _ => None,
        }
    }

    /// The marquee rectangle in world units while box-selecting.
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match &self.gesture {
            Gesture::Marquee(m) => Some(m.rect()),
            _ => None,
        }
    }
}
