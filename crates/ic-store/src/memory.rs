//! In-memory store for tests and embedding.
//!
//! Single-threaded (`RefCell`), matching the editor's local task set. Besides
//! the backend contract it records how canvas writes happened so tests can
//! assert on coalescing and concurrency: every `update_canvas` call, the
//! peak number of writes in flight, and an optional artificial latency or
//! forced failure.

use crate::{DEFAULT_CANVAS_NAME, IMAGE_URL_PREFIX, stored_image_name};
use ic_core::{
    CANVAS_VERSION, Canvas, CanvasBackend, CanvasId, StoreError, TreeDocument, UploadedImage,
    check_filename, validate_canvas,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    canvases: RefCell<HashMap<CanvasId, Canvas>>,
    tree: RefCell<Option<TreeDocument>>,
    images: RefCell<HashMap<String, Vec<u8>>>,
    writes: RefCell<Vec<Canvas>>,
    in_flight: Cell<usize>,
    peak_in_flight: Cell<usize>,
    latency: Cell<Duration>,
    fail_writes: Cell<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding an empty main canvas.
    pub fn with_main() -> Self {
        let store = Self::new();
        store.insert(Canvas::placeholder(CanvasId::main()));
        store
    }

    /// Put a document directly, bypassing write accounting.
    pub fn insert(&self, canvas: Canvas) {
        self.canvases.borrow_mut().insert(canvas.id.clone(), canvas);
    }

    pub fn canvas(&self, id: &CanvasId) -> Option<Canvas> {
        self.canvases.borrow().get(id).cloned()
    }

    /// Every document passed to `update_canvas`, in call order.
    pub fn writes(&self) -> Vec<Canvas> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.get()
    }

    /// Make every canvas write take `latency` (tokio time).
    pub fn set_latency(&self, latency: Duration) {
        self.latency.set(latency);
    }

    /// Make canvas writes fail with a backend error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn image(&self, filename: &str) -> Option<Vec<u8>> {
        self.images.borrow().get(filename).cloned()
    }
}

impl CanvasBackend for MemoryBackend {
    async fn get_canvas(&self, id: &CanvasId) -> Result<Canvas, StoreError> {
        let mut canvases = self.canvases.borrow_mut();
        let canvas = canvases
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("canvas {id}")))?;
        if canvas.version.is_empty() {
            canvas.version = CANVAS_VERSION.to_string();
            canvas.touch();
        }
        Ok(canvas.clone())
    }

    async fn create_canvas(
        &self,
        name: Option<&str>,
        parent: Option<&CanvasId>,
    ) -> Result<Canvas, StoreError> {
        let canvas = Canvas::new(
            CanvasId::generate(),
            name.unwrap_or(DEFAULT_CANVAS_NAME),
            parent.cloned(),
        );
        self.insert(canvas.clone());
        Ok(canvas)
    }

    async fn update_canvas(&self, id: &CanvasId, doc: &Canvas) -> Result<Canvas, StoreError> {
        let depth = self.in_flight.get() + 1;
        self.in_flight.set(depth);
        self.peak_in_flight.set(self.peak_in_flight.get().max(depth));

        let latency = self.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.set(self.in_flight.get() - 1);
        self.writes.borrow_mut().push(doc.clone());

        if self.fail_writes.get() {
            return Err(StoreError::Backend(format!("write to {id} refused")));
        }
        let mut canvas = doc.clone();
        canvas.id = id.clone();
        if canvas.version.is_empty() {
            canvas.version = CANVAS_VERSION.to_string();
        }
        validate_canvas(&canvas)?;
        canvas.touch();
        self.insert(canvas.clone());
        Ok(canvas)
    }

    async fn delete_canvas(&self, id: &CanvasId) -> Result<(), StoreError> {
        self.canvases
            .borrow_mut()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("canvas {id}")))
    }

    async fn get_tree(&self) -> Result<TreeDocument, StoreError> {
        Ok(self
            .tree
            .borrow_mut()
            .get_or_insert_with(TreeDocument::default)
            .clone())
    }

    async fn update_tree(&self, tree: &TreeDocument) -> Result<TreeDocument, StoreError> {
        tree.validate()?;
        *self.tree.borrow_mut() = Some(tree.clone());
        Ok(tree.clone())
    }

    async fn upload_image(&self, bytes: &[u8], name: &str) -> Result<UploadedImage, StoreError> {
        let filename = stored_image_name(name);
        check_filename(&filename)?;
        self.images
            .borrow_mut()
            .insert(filename.clone(), bytes.to_vec());
        Ok(UploadedImage {
            path: format!("{IMAGE_URL_PREFIX}{filename}"),
            filename,
            original_name: name.to_string(),
            size: bytes.len() as u64,
        })
    }

    async fn image_path(&self, filename: &str) -> Result<PathBuf, StoreError> {
        check_filename(filename)?;
        if self.images.borrow().contains_key(filename) {
            Ok(PathBuf::from("/memory/images").join(filename))
        } else {
            Err(StoreError::NotFound(format!("image {filename}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn path_id_wins_on_update() {
        let store = MemoryBackend::with_main();
        let mut doc = Canvas::placeholder(CanvasId::main());
        doc.id = CanvasId::parse("other").unwrap();
        let saved = store.update_canvas(&CanvasId::main(), &doc).await.unwrap();
        assert_eq!(saved.id, CanvasId::main());
        assert!(store.canvas(&CanvasId::parse("other").unwrap()).is_none());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn failed_writes_are_recorded_but_not_stored() {
        let store = MemoryBackend::with_main();
        store.set_fail_writes(true);
        let mut doc = Canvas::placeholder(CanvasId::main());
        doc.name = "Renamed".into();
        let err = store.update_canvas(&CanvasId::main(), &doc).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.canvas(&CanvasId::main()).unwrap().name, "Main Canvas");
    }

    #[tokio::test]
    async fn missing_canvas() {
        let store = MemoryBackend::new();
        let err = store.get_canvas(&CanvasId::main()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn images_are_kept_by_stored_name() {
        let store = MemoryBackend::new();
        let up = store.upload_image(b"\x89PNG", "shot.png").await.unwrap();
        assert_eq!(up.original_name, "shot.png");
        assert_eq!(up.size, 4);
        assert_eq!(up.path, format!("/api/images/{}", up.filename));
        assert_eq!(store.image(&up.filename).unwrap(), b"\x89PNG".to_vec());
        assert!(store.image_path("missing.png").await.unwrap_err().is_not_found());
    }
}
