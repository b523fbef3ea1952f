//! Persistence contract.
//!
//! The editor treats storage as opaque CRUD over canvas documents, the tree
//! document, and uploaded images. Implementations live in `ic-store`.
//! Futures are not required to be `Send`: the editor runs on a single
//! thread and drives backend calls from a local task set.

use crate::error::{ModelError, StoreError};
use crate::id::CanvasId;
use crate::model::Canvas;
use crate::tree::TreeDocument;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum length of an image filename.
pub const MAX_FILENAME_LEN: usize = 255;

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Stored filename (`<uuid>.<ext>`).
    pub filename: String,
    pub original_name: String,
    pub size: u64,
    /// Value usable as an image element's `src`.
    pub path: String,
}

#[allow(async_fn_in_trait)]
pub trait CanvasBackend {
    async fn get_canvas(&self, id: &CanvasId) -> Result<Canvas, StoreError>;

    async fn create_canvas(
        &self,
        name: Option<&str>,
        parent: Option<&CanvasId>,
    ) -> Result<Canvas, StoreError>;

    /// Replace a canvas document. Returns it with `modified` bumped.
    async fn update_canvas(&self, id: &CanvasId, doc: &Canvas) -> Result<Canvas, StoreError>;

    async fn delete_canvas(&self, id: &CanvasId) -> Result<(), StoreError>;

    async fn get_tree(&self) -> Result<TreeDocument, StoreError>;

    async fn update_tree(&self, tree: &TreeDocument) -> Result<TreeDocument, StoreError>;

    async fn tree_add_canvas(
        &self,
        id: &CanvasId,
        parent: Option<&CanvasId>,
        name: &str,
    ) -> Result<TreeDocument, StoreError> {
        let mut tree = self.get_tree().await?;
        tree.add_canvas(id.clone(), parent.cloned(), name)?;
        self.update_tree(&tree).await
    }

    async fn tree_remove_canvas(&self, id: &CanvasId) -> Result<TreeDocument, StoreError> {
        let mut tree = self.get_tree().await?;
        tree.remove_canvas(id).map_err(|e| match e {
            ModelError::UnknownCanvas(c) => StoreError::NotFound(format!("canvas {c}")),
            other => StoreError::Invalid(other),
        })?;
        self.update_tree(&tree).await
    }

    async fn upload_image(&self, bytes: &[u8], name: &str) -> Result<UploadedImage, StoreError>;

    /// Filesystem path of a stored image (desktop backends).
    async fn image_path(&self, filename: &str) -> Result<PathBuf, StoreError>;
}

/// Validate an image filename: `[A-Za-z0-9_-]+\.[A-Za-z0-9]+`, no path
/// separators, at most 255 characters.
pub fn check_filename(name: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::InvalidFilename(name.to_string());
    if name.is_empty() || name.len() > MAX_FILENAME_LEN {
        return Err(invalid());
    }
    let (stem, ext) = name.rsplit_once('.').ok_or_else(invalid)?;
    let stem_ok = !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let ext_ok = !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric());
    if stem_ok && ext_ok { Ok(()) } else { Err(invalid()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames() {
        assert!(check_filename("3f2a-photo_1.png").is_ok());
        assert!(check_filename("../secret.png").is_err());
        assert!(check_filename("a/b.png").is_err());
        assert!(check_filename("noext").is_err());
        assert!(check_filename("two.dots.png").is_err());
        assert!(check_filename(&format!("{}.png", "a".repeat(252))).is_err());
    }
}
