pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod points;
pub mod tree;
pub mod validate;

pub use backend::{CanvasBackend, UploadedImage, check_filename};
pub use config::EditorConfig;
pub use error::{ModelError, StoreError};
pub use geometry::Bounds;
pub use id::{CanvasId, ElementId};
pub use model::*;
pub use points::PointList;
pub use tree::{TreeDocument, TreeNode};
pub use validate::{canonical_order, repair_canvas, validate_canvas, validate_elements};
