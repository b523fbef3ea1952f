pub mod config;
pub mod fs;
pub mod memory;

pub use config::load_config;
pub use fs::FsBackend;
pub use memory::MemoryBackend;

/// Default name of a canvas created without one.
pub const DEFAULT_CANVAS_NAME: &str = "New Canvas";

/// URL prefix under which uploaded images are served.
pub const IMAGE_URL_PREFIX: &str = "/api/images/";

/// Stored filename for an upload named `original`: `<uuid>.<ext>`, where
/// `ext` is the original extension (`png` when it has none).
pub(crate) fn stored_image_name(original: &str) -> String {
    let ext = std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or("png");
    format!("{}.{}", uuid::Uuid::new_v4(), ext.to_ascii_lowercase())
}
