//! Screen ↔ world mapping, zoom, and pan.
//!
//! The view box `(x, y, width, height)` is the rectangle of world space
//! mapped onto the container. The zoom level is the user's zoom state: 1.0
//! when a canvas opens, multiplied by every zoom step and kept within
//! `[min_zoom, max_zoom]` independently of the container size.

use ic_core::config::ViewportConfig;
use ic_core::{Bounds, ViewBox};

/// Margin kept around content by the zoom-to-fit commands, in pixels.
const FIT_PADDING: f64 = 40.0;

/// View box and container captured when a pan gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnchor {
    pub screen_x: f64,
    pub screen_y: f64,
    pub view: ViewBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    view: ViewBox,
    container_width: f64,
    container_height: f64,
    zoom_level: f64,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(view: ViewBox, container_width: f64, container_height: f64, config: ViewportConfig) -> Self {
        Self {
            view,
            container_width: container_width.max(1.0),
            container_height: container_height.max(1.0),
            zoom_level: 1.0,
            config,
        }
    }

    pub fn view(&self) -> ViewBox {
        self.view
    }

    pub fn container(&self) -> (f64, f64) {
        (self.container_width, self.container_height)
    }

    /// Show a canvas's initial view box.
    pub fn reset(&mut self, view: ViewBox) {
        self.view = view;
        self.zoom_level = 1.0;
    }

    /// Resize the container while keeping the zoom level and top-left.
    pub fn set_container(&mut self, width: f64, height: f64) {
        let (zx, zy) = self.pixels_per_unit();
        self.container_width = width.max(1.0);
        self.container_height = height.max(1.0);
        self.view.width = self.container_width / zx;
        self.view.height = self.container_height / zy;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom_level
    }

    /// Container pixels per world unit along x.
    fn scale(&self) -> f64 {
        self.container_width / self.view.width
    }

    /// Container pixels per world unit on each axis.
    pub fn pixels_per_unit(&self) -> (f64, f64) {
        (
            self.container_width / self.view.width,
            self.container_height / self.view.height,
        )
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            self.view.x + sx / self.container_width * self.view.width,
            self.view.y + sy / self.container_height * self.view.height,
        )
    }

    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            (wx - self.view.x) / self.view.width * self.container_width,
            (wy - self.view.y) / self.view.height * self.container_height,
        )
    }

    /// Convert a pixel distance to world units (x axis).
    pub fn screen_len_to_world(&self, px: f64) -> f64 {
        px / self.scale()
    }

    /// Zoom by `factor` keeping the world point under `(sx, sy)` fixed.
    ///
    /// A zoom whose result would leave `[min_zoom, max_zoom]` does nothing
    /// and returns false.
    pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let next = self.zoom_level * factor;
        if next < self.config.min_zoom || next > self.config.max_zoom {
            log::trace!("zoom {next:.3} out of range, ignored");
            return false;
        }
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.zoom_level = next;
        self.view.width /= factor;
        self.view.height /= factor;
        self.view.x = wx - sx / self.container_width * self.view.width;
        self.view.y = wy - sy / self.container_height * self.view.height;
        true
    }

    /// One wheel notch: `delta_y < 0` zooms in.
    pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        let factor = if delta_y < 0.0 {
            self.config.wheel_step
        } else {
            1.0 / self.config.wheel_step
        };
        self.zoom_at(factor, sx, sy)
    }

    pub fn begin_pan(&self, sx: f64, sy: f64) -> PanAnchor {
        PanAnchor {
            screen_x: sx,
            screen_y: sy,
            view: self.view,
        }
    }

    /// Translate the view so the world point grabbed at `anchor` follows the pointer.
    pub fn pan_to(&mut self, anchor: &PanAnchor, sx: f64, sy: f64) {
        let scale_x = anchor.view.width / self.container_width;
        let scale_y = anchor.view.height / self.container_height;
        self.view.x = anchor.view.x - (sx - anchor.screen_x) * scale_x;
        self.view.y = anchor.view.y - (sy - anchor.screen_y) * scale_y;
    }

    /// Fit `bounds` (plus padding) into the container, centered, preserving
    /// aspect. Returns false for empty content.
    pub fn zoom_to_bounds(&mut self, bounds: Bounds) -> bool {
        if bounds.width <= 0.0 && bounds.height <= 0.0 {
            return false;
        }
        let avail_w = (self.container_width - 2.0 * FIT_PADDING).max(1.0);
        let avail_h = (self.container_height - 2.0 * FIT_PADDING).max(1.0);
        let mut scale = f64::INFINITY;
        if bounds.width > 0.0 {
            scale = scale.min(avail_w / bounds.width);
        }
        if bounds.height > 0.0 {
            scale = scale.min(avail_h / bounds.height);
        }
        let level = self.zoom_level * scale / self.scale();
        self.set_zoom_centered(level, bounds.center());
        true
    }

    /// Return to zoom level 1 around the current view center.
    pub fn zoom_to_actual_size(&mut self) {
        self.set_zoom_centered(1.0, self.center_world());
    }

    /// Set the zoom level (clamped) and center the view on `(cx, cy)`.
    fn set_zoom_centered(&mut self, level: f64, (cx, cy): (f64, f64)) {
        let level = level.clamp(self.config.min_zoom, self.config.max_zoom);
        let factor = level / self.zoom_level;
        self.zoom_level = level;
        self.view.width /= factor;
        self.view.height /= factor;
        self.view.x = cx - self.view.width / 2.0;
        self.view.y = cy - self.view.height / 2.0;
    }

    /// World-space center of the visible area.
    pub fn center_world(&self) -> (f64, f64) {
        (
            self.view.x + self.view.width / 2.0,
            self.view.y + self.view.height / 2.0,
        )
    }
}
