//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Smallest accepted history depth.
pub const MIN_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom factor for one wheel notch.
    pub wheel_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
            wheel_step: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapConfig {
    /// Grid pitch in world units.
    pub grid_size: f64,
    /// Maximum pull distance in world units.
    pub threshold: f64,
    /// Whether grid snapping starts enabled.
    pub enabled: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_size: 40.0,
            threshold: 8.0,
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: MIN_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutosaveConfig {
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 2000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    /// Longest side of a freshly imported image, in world units.
    pub max_image_size: f64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_image_size: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeConfig {
    pub min_size: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { min_size: 20.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulerConfig {
    /// Minimum pixel distance between ticks.
    pub min_tick_spacing: f64,
    /// Ruler thickness in pixels.
    pub size: f64,
    /// Pixel distance within which a pointer grabs a guide.
    pub guide_hit_tolerance: f64,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            min_tick_spacing: 5.0,
            size: 20.0,
            guide_hit_tolerance: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClipboardConfig {
    /// Offset applied when pasting into the source canvas.
    pub paste_offset: f64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { paste_offset: 20.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingConfig {
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
    /// Freehand capture drops points closer than this to the previous one.
    pub min_point_distance: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            stroke: "#000000".into(),
            stroke_width: 2.0,
            fill: "none".into(),
            min_point_distance: 2.0,
        }
    }
}

/// All editor tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub viewport: ViewportConfig,
    pub snap: SnapConfig,
    pub history: HistoryConfig,
    pub autosave: AutosaveConfig,
    pub images: ImageConfig,
    pub resize: ResizeConfig,
    pub rulers: RulerConfig,
    pub clipboard: ClipboardConfig,
    pub drawing: DrawingConfig,
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config document.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let config: EditorConfig = serde_json::from_str(s)?;
        Ok(config.normalized())
    }

    /// Clamp values that must respect a lower bound.
    pub fn normalized(mut self) -> Self {
        if self.history.capacity < MIN_HISTORY_CAPACITY {
            log::warn!(
                "history capacity {} raised to {MIN_HISTORY_CAPACITY}",
                self.history.capacity
            );
            self.history.capacity = MIN_HISTORY_CAPACITY;
        }
        if self.viewport.min_zoom > self.viewport.max_zoom {
            std::mem::swap(&mut self.viewport.min_zoom, &mut self.viewport.max_zoom);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EditorConfig::from_json_str("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let c = EditorConfig::from_json_str(r#"{"snap":{"gridSize":25},"autosave":{"debounceMs":500}}"#)
            .unwrap();
        assert_eq!(c.snap.grid_size, 25.0);
        assert_eq!(c.snap.threshold, 8.0);
        assert_eq!(c.autosave.debounce_ms, 500);
        assert_eq!(c.images.max_image_size, 400.0);
    }

    #[test]
    fn history_capacity_has_a_floor() {
        let c = EditorConfig::from_json_str(r#"{"history":{"capacity":5}}"#).unwrap();
        assert_eq!(c.history.capacity, MIN_HISTORY_CAPACITY);
    }
}
