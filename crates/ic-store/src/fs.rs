//! Filesystem store.
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/canvases/<id>.json   one pretty-printed document per canvas
//! <root>/images/<uuid>.<ext>  uploaded images
//! <root>/tree.json            the canvas tree
//! ```
//!
//! Directories are created on first use. Ids and filenames are validated
//! before any path is built from them.

use crate::{DEFAULT_CANVAS_NAME, IMAGE_URL_PREFIX, stored_image_name};
use ic_core::{
    CANVAS_VERSION, Canvas, CanvasBackend, CanvasId, StoreError, TreeDocument, UploadedImage,
    check_filename, validate_canvas,
};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn canvases_dir(&self) -> PathBuf {
        self.root.join("canvases")
    }

    fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    fn tree_file(&self) -> PathBuf {
        self.root.join("tree.json")
    }

    fn canvas_file(&self, id: &CanvasId) -> PathBuf {
        self.canvases_dir().join(format!("{id}.json"))
    }

    /// Create the directory layout and the main canvas if missing.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.ensure_dirs().await?;
        let main = self.canvas_file(&CanvasId::main());
        if !tokio::fs::try_exists(&main).await? {
            log::info!("store: creating main canvas at {}", main.display());
            write_json(&main, &Canvas::placeholder(CanvasId::main())).await?;
        }
        Ok(())
    }

    async fn ensure_dirs(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(self.canvases_dir()).await?;
        tokio::fs::create_dir_all(self.images_dir()).await?;
        Ok(())
    }

    /// Ids of every stored canvas document, sorted.
    pub async fn list_canvases(&self) -> Result<Vec<CanvasId>, StoreError> {
        let mut out = Vec::new();
        let mut entries = match tokio::fs::read_dir(self.canvases_dir()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| CanvasId::parse(s).ok())
            {
                out.push(id);
            }
        }
        out.sort();
        Ok(out)
    }
}

/// Serialize `value` as pretty JSON and replace `path` with it.
///
/// Written to a sibling temp file first, then renamed over the target.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, text).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn not_found(what: String) -> impl FnOnce(std::io::Error) -> StoreError {
    move |e| {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(what)
        } else {
            StoreError::Io(e)
        }
    }
}

/// Documents written before versioning carry no (or an empty) `version`.
fn needs_migration(raw: &serde_json::Value) -> bool {
    raw.get("version")
        .and_then(|v| v.as_str())
        .is_none_or(str::is_empty)
}

impl CanvasBackend for FsBackend {
    async fn get_canvas(&self, id: &CanvasId) -> Result<Canvas, StoreError> {
        let path = self.canvas_file(id);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(not_found(format!("canvas {id}")))?;
        let raw: serde_json::Value = serde_json::from_str(&text)?;
        let migrate = needs_migration(&raw);
        let mut canvas: Canvas = serde_json::from_value(raw)?;
        if migrate {
            log::info!("store: migrating canvas {id} to version {CANVAS_VERSION}");
            canvas.version = CANVAS_VERSION.to_string();
            canvas.touch();
            write_json(&path, &canvas).await?;
        }
        log::debug!("store: loaded canvas {id} ({} elements)", canvas.elements.len());
        Ok(canvas)
    }

    async fn create_canvas(
        &self,
        name: Option<&str>,
        parent: Option<&CanvasId>,
    ) -> Result<Canvas, StoreError> {
        self.ensure_dirs().await?;
        let canvas = Canvas::new(
            CanvasId::generate(),
            name.unwrap_or(DEFAULT_CANVAS_NAME),
            parent.cloned(),
        );
        write_json(&self.canvas_file(&canvas.id), &canvas).await?;
        log::info!("store: created canvas {} ({:?})", canvas.id, canvas.name);
        Ok(canvas)
    }

    async fn update_canvas(&self, id: &CanvasId, doc: &Canvas) -> Result<Canvas, StoreError> {
        let mut canvas = doc.clone();
        canvas.id = id.clone();
        if canvas.version.is_empty() {
            canvas.version = CANVAS_VERSION.to_string();
        }
        validate_canvas(&canvas)?;
        canvas.touch();
        self.ensure_dirs().await?;
        write_json(&self.canvas_file(id), &canvas).await?;
        log::info!("store: saved canvas {id} ({} elements)", canvas.elements.len());
        Ok(canvas)
    }

    async fn delete_canvas(&self, id: &CanvasId) -> Result<(), StoreError> {
        tokio::fs::remove_file(self.canvas_file(id))
            .await
            .map_err(not_found(format!("canvas {id}")))?;
        log::info!("store: deleted canvas {id}");
        Ok(())
    }

    async fn get_tree(&self) -> Result<TreeDocument, StoreError> {
        let path = self.tree_file();
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let tree: TreeDocument = serde_json::from_str(&text)?;
                if let Err(e) = tree.validate() {
                    log::warn!("store: tree.json is inconsistent: {e}");
                }
                Ok(tree)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let tree = TreeDocument::default();
                tokio::fs::create_dir_all(&self.root).await?;
                write_json(&path, &tree).await?;
                log::info!("store: wrote default tree");
                Ok(tree)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_tree(&self, tree: &TreeDocument) -> Result<TreeDocument, StoreError> {
        tree.validate()?;
        tokio::fs::create_dir_all(&self.root).await?;
        write_json(&self.tree_file(), tree).await?;
        log::debug!("store: saved tree ({} canvases)", tree.canvases.len());
        Ok(tree.clone())
    }

    async fn upload_image(&self, bytes: &[u8], name: &str) -> Result<UploadedImage, StoreError> {
        let filename = stored_image_name(name);
        check_filename(&filename)?;
        self.ensure_dirs().await?;
        tokio::fs::write(self.images_dir().join(&filename), bytes).await?;
        log::info!("store: stored image {filename} ({} bytes)", bytes.len());
        Ok(UploadedImage {
            path: format!("{IMAGE_URL_PREFIX}{filename}"),
            filename,
            original_name: name.to_string(),
            size: bytes.len() as u64,
        })
    }

    async fn image_path(&self, filename: &str) -> Result<PathBuf, StoreError> {
        check_filename(filename)?;
        tokio::fs::canonicalize(self.images_dir().join(filename))
            .await
            .map_err(not_found(format!("image {filename}")))
    }
}
