//! Drawing tools.
//!
//! Each tool turns a pointer stroke (in world units) into one element. The
//! element is only handed back on release; the editor commits it.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Rectangle | Line | Freehand |
//! |----------|-----------|------|----------|
//! | **Shift** | Square constraint | Horizontal / vertical | none |

use crate::input::Modifiers;
use ic_core::config::DrawingConfig;
use ic_core::{Bounds, Element, ElementId, ElementKind, PointList};

/// The active tool determines how a primary press on empty canvas is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    /// Select, drag, and pan.
    #[default]
    Hand,
    Rectangle,
    Line,
    Freehand,
}

impl ToolKind {
    pub fn is_drawing(self) -> bool {
        self != ToolKind::Hand
    }
}

/// A pointer event in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolEvent {
    Down { x: f64, y: f64, modifiers: Modifiers },
    Move { x: f64, y: f64, modifiers: Modifiers },
    Up { x: f64, y: f64, modifiers: Modifiers },
}

/// Shapes smaller than this on both axes are dropped as accidental clicks.
const MIN_SHAPE_SIZE: f64 = 2.0;

/// Trait for tools that capture a stroke and produce an element.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Feed one event. Returns the finished element on `Up`.
    fn handle(&mut self, event: &ToolEvent, style: &DrawingConfig) -> Option<Element>;

    /// The shape drawn so far, for a live preview.
    fn preview(&self, style: &DrawingConfig) -> Option<Element>;

    /// Discard the stroke in progress.
    fn cancel(&mut self);

    fn is_drawing(&self) -> bool;
}

fn preview_id() -> ElementId {
    ElementId::intern("drawing_preview")
}

// ─── Rectangle Tool ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RectangleTool {
    start: Option<(f64, f64)>,
    current: (f64, f64),
    square: bool,
}

impl RectangleTool {
    fn bounds(&self) -> Option<Bounds> {
        let (sx, sy) = self.start?;
        let (mut cx, mut cy) = self.current;
        if self.square {
            let side = (cx - sx).abs().max((cy - sy).abs());
            cx = sx + side * (cx - sx).signum();
            cy = sy + side * (cy - sy).signum();
        }
        Some(Bounds::from_corners(sx, sy, cx, cy))
    }

    fn element(&self, id: ElementId, style: &DrawingConfig) -> Option<Element> {
        let bounds = self.bounds()?;
        Some(Element::new(
            id,
            ElementKind::Rectangle {
                fill: style.fill.clone(),
                stroke: style.stroke.clone(),
                stroke_width: style.stroke_width,
            },
            bounds,
        ))
    }
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn handle(&mut self, event: &ToolEvent, style: &DrawingConfig) -> Option<Element> {
        match *event {
            ToolEvent::Down { x, y, .. } => {
                self.start = Some((x, y));
                self.current = (x, y);
                self.square = false;
                None
            }
            ToolEvent::Move { x, y, modifiers } => {
                if self.start.is_some() {
                    self.current = (x, y);
                    self.square = modifiers.shift;
                }
                None
            }
            ToolEvent::Up { x, y, modifiers } => {
                self.start?;
                self.current = (x, y);
                self.square = modifiers.shift;
                let out = self
                    .bounds()
                    .filter(|b| b.width >= MIN_SHAPE_SIZE || b.height >= MIN_SHAPE_SIZE)
                    .and_then(|_| self.element(ElementId::generate("rectangle"), style));
                self.cancel();
                out
            }
        }
    }

    fn preview(&self, style: &DrawingConfig) -> Option<Element> {
        self.element(preview_id(), style)
    }

    fn cancel(&mut self) {
        self.start = None;
        self.square = false;
    }

    fn is_drawing(&self) -> bool {
        self.start.is_some()
    }
}

// ─── Line Tool ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LineTool {
    start: Option<(f64, f64)>,
    end: (f64, f64),
}

impl LineTool {
    fn track(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        let Some((sx, sy)) = self.start else { return };
        self.end = if modifiers.shift {
            if (x - sx).abs() >= (y - sy).abs() {
                (x, sy)
            } else {
                (sx, y)
            }
        } else {
            (x, y)
        };
    }

    fn element(&self, id: ElementId, style: &DrawingConfig) -> Option<Element> {
        let start = self.start?;
        Some(polyline(
            id,
            &[start, self.end],
            style,
            |stroke, stroke_width, points| ElementKind::Line {
                stroke,
                stroke_width,
                points,
            },
        ))
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn handle(&mut self, event: &ToolEvent, style: &DrawingConfig) -> Option<Element> {
        match *event {
            ToolEvent::Down { x, y, .. } => {
                self.start = Some((x, y));
                self.end = (x, y);
                None
            }
            ToolEvent::Move { x, y, modifiers } => {
                self.track(x, y, modifiers);
                None
            }
            ToolEvent::Up { x, y, modifiers } => {
                let (sx, sy) = self.start?;
                self.track(x, y, modifiers);
                let (ex, ey) = self.end;
                let long_enough = (ex - sx).hypot(ey - sy) >= MIN_SHAPE_SIZE;
                let out = if long_enough {
                    self.element(ElementId::generate("line"), style)
                } else {
                    None
                };
                self.cancel();
                out
            }
        }
    }

    fn preview(&self, style: &DrawingConfig) -> Option<Element> {
        self.element(preview_id(), style)
    }

    fn cancel(&mut self) {
        self.start = None;
    }

    fn is_drawing(&self) -> bool {
        self.start.is_some()
    }
}

// ─── Freehand Tool ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct FreehandTool {
    drawing: bool,
    points: Vec<(f64, f64)>,
}

impl FreehandTool {
    /// Append a point unless it is closer than `min_distance` to the last one.
    fn sample(&mut self, x: f64, y: f64, min_distance: f64) {
        match self.points.last() {
            Some(&(lx, ly)) if (x - lx).hypot(y - ly) < min_distance => {}
            _ => self.points.push((x, y)),
        }
    }

    fn element(&self, id: ElementId, style: &DrawingConfig) -> Option<Element> {
        if !self.drawing || self.points.is_empty() {
            return None;
        }
        Some(polyline(id, &self.points, style, |stroke, stroke_width, points| {
            ElementKind::Freehand {
                stroke,
                stroke_width,
                points,
            }
        }))
    }
}

impl Tool for FreehandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Freehand
    }

    fn handle(&mut self, event: &ToolEvent, style: &DrawingConfig) -> Option<Element> {
        match *event {
            ToolEvent::Down { x, y, .. } => {
                self.drawing = true;
                self.points.clear();
                self.points.push((x, y));
                None
            }
            ToolEvent::Move { x, y, .. } => {
                if self.drawing {
                    self.sample(x, y, style.min_point_distance);
                }
                None
            }
            ToolEvent::Up { x, y, .. } => {
                if !self.drawing {
                    return None;
                }
                self.sample(x, y, style.min_point_distance);
                let out = if self.points.len() >= 2 {
                    self.element(ElementId::generate("freehand"), style)
                } else {
                    None
                };
                self.cancel();
                out
            }
        }
    }

    fn preview(&self, style: &DrawingConfig) -> Option<Element> {
        self.element(preview_id(), style)
    }

    fn cancel(&mut self) {
        self.drawing = false;
        self.points.clear();
    }

    fn is_drawing(&self) -> bool {
        self.drawing
    }
}

/// Build a line-like element whose points are stored relative to its top-left.
fn polyline(
    id: ElementId,
    world_points: &[(f64, f64)],
    style: &DrawingConfig,
    kind: impl FnOnce(String, f64, PointList) -> ElementKind,
) -> Element {
    let bounds = Bounds::from_points(world_points).unwrap_or_default();
    let relative = world_points
        .iter()
        .map(|(x, y)| (x - bounds.x, y - bounds.y))
        .collect();
    Element::new(
        id,
        kind(
            style.stroke.clone(),
            style.stroke_width,
            PointList::from_vec(relative),
        ),
        bounds,
    )
}

// ─── Tool box ────────────────────────────────────────────────────────────

/// The tool registry and the active selection among it.
#[derive(Debug, Default)]
pub struct ToolBox {
    active: ToolKind,
    rectangle: RectangleTool,
    line: LineTool,
    freehand: FreehandTool,
}

impl ToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ToolKind {
        self.active
    }

    /// Switch tools, discarding any stroke in progress.
    pub fn set_active(&mut self, kind: ToolKind) {
        if let Some(tool) = self.current_mut() {
            tool.cancel();
        }
        self.active = kind;
    }

    /// The active drawing tool; `None` for the hand tool.
    pub fn current(&self) -> Option<&dyn Tool> {
        match self.active {
            ToolKind::Hand => None,
            ToolKind::Rectangle => Some(&self.rectangle),
            ToolKind::Line => Some(&self.line),
            ToolKind::Freehand => Some(&self.freehand),
        }
    }

    pub fn current_mut(&mut self) -> Option<&mut dyn Tool> {
        match self.active {
            ToolKind::Hand => None,
            ToolKind::Rectangle => Some(&mut self.rectangle),
            ToolKind::Line => Some(&mut self.line),
            ToolKind::Freehand => Some(&mut self.freehand),
        }
    }
}
