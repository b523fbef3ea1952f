pub mod hit;
pub mod overlay;
pub mod ruler;
pub mod tree;

pub use hit::{hit_test, hit_test_all, hit_test_rect};
pub use overlay::{Corner, Handle, SelectionOverlay, selection_overlay};
pub use ruler::{Tick, ruler_ticks, tick_interval};
pub use tree::{
    BackgroundPaint, CANVAS_ELEMENT_TAG, ImageLoadState, ReconcileStats, RenderKind, RenderNode,
    RenderTree, refined_image_size,
};
