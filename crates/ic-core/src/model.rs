//! Core data model for canvas documents.
//!
//! A canvas is a flat, ordered list of elements. Array index is the render
//! rank (low index = behind); `z_index` is stored per element and the
//! canonical order is `z_index` ascending with ties broken by array index.
//! Groups reference their members by id, so the flat list stays the single
//! source of truth.

use crate::color;
use crate::error::ModelError;
use crate::geometry::Bounds;
use crate::id::{CanvasId, ElementId};
use crate::points::PointList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

/// Document schema version written by this engine.
pub const CANVAS_VERSION: &str = "1.0.0";

/// Name given to the root canvas and to placeholder canvases.
pub const MAIN_CANVAS_NAME: &str = "Main Canvas";

// ─── Elements ────────────────────────────────────────────────────────────

/// CSS filter parameters for image elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sepia: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue_rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
}

/// One of the eight image filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Grayscale,
    Sepia,
    Invert,
    Brightness,
    Contrast,
    Saturate,
    HueRotate,
    Blur,
}

impl FilterKind {
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
        FilterKind::Brightness,
        FilterKind::Contrast,
        FilterKind::Saturate,
        FilterKind::HueRotate,
        FilterKind::Blur,
    ];

    /// The value applied when the filter is toggled on.
    pub fn default_amount(self) -> f64 {
        match self {
            FilterKind::Grayscale | FilterKind::Sepia | FilterKind::Invert => 1.0,
            FilterKind::Brightness | FilterKind::Contrast => 1.5,
            FilterKind::Saturate => 2.0,
            FilterKind::HueRotate => 90.0,
            FilterKind::Blur => 2.0,
        }
    }
}

impl Filters {
    fn slot(&mut self, kind: FilterKind) -> &mut Option<f64> {
        match kind {
            FilterKind::Grayscale => &mut self.grayscale,
            FilterKind::Sepia => &mut self.sepia,
            FilterKind::Invert => &mut self.invert,
            FilterKind::Brightness => &mut self.brightness,
            FilterKind::Contrast => &mut self.contrast,
            FilterKind::Saturate => &mut self.saturate,
            FilterKind::HueRotate => &mut self.hue_rotate,
            FilterKind::Blur => &mut self.blur,
        }
    }

    pub fn get(&self, kind: FilterKind) -> Option<f64> {
        match kind {
            FilterKind::Grayscale => self.grayscale,
            FilterKind::Sepia => self.sepia,
            FilterKind::Invert => self.invert,
            FilterKind::Brightness => self.brightness,
            FilterKind::Contrast => self.contrast,
            FilterKind::Saturate => self.saturate,
            FilterKind::HueRotate => self.hue_rotate,
            FilterKind::Blur => self.blur,
        }
    }

    /// Turn `kind` off if set, or on with its default amount.
    pub fn toggle(&mut self, kind: FilterKind) {
        let slot = self.slot(kind);
        *slot = if slot.is_some() { None } else { Some(kind.default_amount()) };
    }

    pub fn is_empty(&self) -> bool {
        FilterKind::ALL.iter().all(|k| self.get(*k).is_none())
    }

    /// CSS `filter` property value, e.g. `grayscale(1) blur(2px)`.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        for kind in FilterKind::ALL {
            let Some(v) = self.get(kind) else { continue };
            parts.push(match kind {
                FilterKind::Grayscale => format!("grayscale({v})"),
                FilterKind::Sepia => format!("sepia({v})"),
                FilterKind::Invert => format!("invert({v})"),
                FilterKind::Brightness => format!("brightness({v})"),
                FilterKind::Contrast => format!("contrast({v})"),
                FilterKind::Saturate => format!("saturate({v})"),
                FilterKind::HueRotate => format!("hue-rotate({v}deg)"),
                FilterKind::Blur => format!("blur({v}px)"),
            });
        }
        parts.join(" ")
    }
}

/// The element variants. Serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    /// Bitmap. `src` is a backend image path or a data URL.
    Image { src: String },

    /// Link to another canvas.
    Folder {
        name: String,
        target_canvas_id: CanvasId,
    },

    /// Drawn rectangle.
    Rectangle {
        fill: String,
        stroke: String,
        stroke_width: f64,
    },

    /// Straight line (two points).
    Line {
        stroke: String,
        stroke_width: f64,
        points: PointList,
    },

    /// Freehand stroke.
    Freehand {
        stroke: String,
        stroke_width: f64,
        points: PointList,
    },

    /// Container referencing its members by id.
    Group { children: SmallVec<[ElementId; 4]> },
}

impl ElementKind {
    /// Short lowercase name of the variant, also used as id prefix.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Image { .. } => "image",
            ElementKind::Folder { .. } => "folder",
            ElementKind::Rectangle { .. } => "rectangle",
            ElementKind::Line { .. } => "line",
            ElementKind::Freehand { .. } => "freehand",
            ElementKind::Group { .. } => "group",
        }
    }
}

/// How an element reacts to resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Scale uniformly, preserving aspect ratio.
    Uniform,
    /// Width and height change independently.
    Free,
    /// No handles.
    None,
}

/// A single element on a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,

    #[serde(flatten)]
    pub kind: ElementKind,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Degrees. Stored and round-tripped; not editable.
    #[serde(default)]
    pub rotation: f64,

    #[serde(default)]
    pub z_index: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_h: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_v: Option<bool>,

    /// The group that owns this element, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ElementId>,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind, bounds: Bounds) -> Self {
        Self {
            id,
            kind,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            rotation: 0.0,
            z_index: 0.0,
            locked: None,
            visible: None,
            filters: None,
            flip_h: None,
            flip_v: None,
            group_id: None,
        }
    }

    /// A new element with a freshly generated id prefixed by its type.
    pub fn with_generated_id(kind: ElementKind, bounds: Bounds) -> Self {
        let id = ElementId::generate(kind.type_name());
        Self::new(id, kind, bounds)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, b: Bounds) {
        self.x = b.x;
        self.y = b.y;
        self.width = b.width;
        self.height = b.height;
    }

    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn is_flipped_h(&self) -> bool {
        self.flip_h.unwrap_or(false)
    }

    pub fn is_flipped_v(&self) -> bool {
        self.flip_v.unwrap_or(false)
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group { .. })
    }

    pub fn group_children(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::Group { children } => children,
            _ => &[],
        }
    }

    pub fn resize_mode(&self) -> ResizeMode {
        match self.kind {
            ElementKind::Image { .. } => ResizeMode::Uniform,
            ElementKind::Folder { .. } | ElementKind::Rectangle { .. } => ResizeMode::Free,
            ElementKind::Line { .. } | ElementKind::Freehand { .. } | ElementKind::Group { .. } => {
                ResizeMode::None
            }
        }
    }

    /// Validate colors and numeric fields of a single element.
    pub fn check(&self) -> Result<(), ModelError> {
        let id = self.id.as_str();
        for (field, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
            ("zIndex", self.z_index),
        ] {
            if !v.is_finite() {
                return Err(ModelError::NonFinite {
                    id: id.to_string(),
                    field,
                });
            }
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ModelError::NegativeSize {
                id: id.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        match &self.kind {
            ElementKind::Rectangle { fill, stroke, .. } => {
                color::check_fill(fill)?;
                color::check_color(stroke)?;
            }
            ElementKind::Line { stroke, .. } | ElementKind::Freehand { stroke, .. } => {
                color::check_color(stroke)?;
            }
            _ => {}
        }
        Ok(())
    }
}

// ─── Canvas document ─────────────────────────────────────────────────────

/// The initial visible rectangle of a canvas, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Guide orientation.
///
/// `X` is a horizontal guide whose y-position is `position`; `Y` is a
/// vertical guide whose x-position is `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// A ruler guide line in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: Axis,
    pub position: f64,
}

/// Canvas background.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Rendered as a checker pattern.
    Transparent,
    /// Any CSS color.
    Color(String),
}

impl Background {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        if s == color::TRANSPARENT {
            Ok(Background::Transparent)
        } else {
            color::check_color(s)?;
            Ok(Background::Color(s.to_string()))
        }
    }

    /// A `Color` built directly rather than through `parse` may hold
    /// anything; this rejects what `parse` would.
    pub fn check(&self) -> Result<(), ModelError> {
        match self {
            Background::Transparent => Ok(()),
            Background::Color(c) => color::check_color(c),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Background::Transparent => color::TRANSPARENT,
            Background::Color(c) => c,
        }
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Background {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Background::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn default_version() -> String {
    CANVAS_VERSION.to_string()
}

/// A canvas document: one persisted blob per canvas id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    #[serde(default = "default_version")]
    pub version: String,
    pub id: CanvasId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CanvasId>,
    #[serde(default)]
    pub view_box: ViewBox,
    /// Absent means white.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Background>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub guides: Vec<Guide>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Canvas {
    /// A fresh, empty canvas with default view box and timestamps set to now.
    pub fn new(id: CanvasId, name: impl Into<String>, parent_id: Option<CanvasId>) -> Self {
        let now = Utc::now();
        Self {
            version: default_version(),
            id,
            name: name.into(),
            parent_id,
            view_box: ViewBox::default(),
            background_color: None,
            elements: Vec::new(),
            guides: Vec::new(),
            created: now,
            modified: now,
        }
    }

    /// The in-memory stand-in used when a canvas cannot be found.
    pub fn placeholder(id: CanvasId) -> Self {
        Self::new(id, MAIN_CANVAS_NAME, None)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_json_shape() {
        let json = r##"{
            "id": "rect_a",
            "type": "rectangle",
            "x": 10, "y": 20, "width": 30, "height": 40,
            "zIndex": 3,
            "fill": "none", "stroke": "#333", "strokeWidth": 2
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.id, ElementId::intern("rect_a"));
        assert_eq!(el.z_index, 3.0);
        assert!(el.is_visible());
        assert!(matches!(
            el.kind,
            ElementKind::Rectangle { stroke_width, .. } if stroke_width == 2.0
        ));

        let back = serde_json::to_value(&el).unwrap();
        assert_eq!(back["type"], "rectangle");
        assert_eq!(back["strokeWidth"], 2.0);
        assert!(back.get("locked").is_none());
    }

    #[test]
    fn folder_and_line_fields_are_camel_case() {
        let json = r#"[
            {"id":"f","type":"folder","name":"Refs","targetCanvasId":"refs-1",
             "x":0,"y":0,"width":120,"height":100,"zIndex":1},
            {"id":"l","type":"line","stroke":"black","strokeWidth":1,"points":"0,0 10,10",
             "x":0,"y":0,"width":10,"height":10,"zIndex":2,"flipH":true}
        ]"#;
        let els: Vec<Element> = serde_json::from_str(json).unwrap();
        match &els[0].kind {
            ElementKind::Folder {
                target_canvas_id, ..
            } => assert_eq!(target_canvas_id.as_str(), "refs-1"),
            other => panic!("expected folder, got {other:?}"),
        }
        assert!(els[1].is_flipped_h());
    }

    #[test]
    fn filters_toggle_and_css() {
        let mut f = Filters::default();
        f.toggle(FilterKind::Grayscale);
        f.toggle(FilterKind::Blur);
        assert_eq!(f.to_css(), "grayscale(1) blur(2px)");
        f.toggle(FilterKind::Grayscale);
        assert_eq!(f.to_css(), "blur(2px)");
        f.toggle(FilterKind::Blur);
        assert!(f.is_empty());
    }

    #[test]
    fn background_parsing() {
        assert_eq!(Background::parse("transparent").unwrap(), Background::Transparent);
        assert!(Background::parse("#abc").is_ok());
        assert!(Background::parse("not-a-color").is_err());
    }

    #[test]
    fn canvas_defaults_fill_missing_fields() {
        let json = r#"{"id":"main","name":"Main Canvas",
            "created":"2024-01-01T00:00:00Z","modified":"2024-01-01T00:00:00Z"}"#;
        let c: Canvas = serde_json::from_str(json).unwrap();
        assert_eq!(c.version, CANVAS_VERSION);
        assert_eq!(c.view_box, ViewBox::default());
        assert!(c.elements.is_empty());
        assert!(c.background_color.is_none());
    }

    #[test]
    fn check_rejects_bad_geometry_and_colors() {
        let mut el = Element::new(
            ElementId::intern("bad"),
            ElementKind::Rectangle {
                fill: "none".into(),
                stroke: "#000".into(),
                stroke_width: 1.0,
            },
            Bounds::new(0.0, 0.0, 10.0, 10.0),
        );
        assert!(el.check().is_ok());
        el.width = -1.0;
        assert!(matches!(el.check(), Err(ModelError::NegativeSize { .. })));
        el.width = 1.0;
        el.z_index = f64::NAN;
        assert!(matches!(el.check(), Err(ModelError::NonFinite { .. })));
        el.z_index = 0.0;
        el.kind = ElementKind::Rectangle {
            fill: "nope".into(),
            stroke: "#000".into(),
            stroke_width: 1.0,
        };
        assert!(matches!(el.check(), Err(ModelError::InvalidColor(_))));
    }
}
