//! Pointer-interaction state.
//!
//! The editor owns exactly one `Gesture` at a time. It starts on pointer
//! down, is updated on every move, and ends on pointer up, pointer leave,
//! or Escape. Hosts read the current `Mode` instead of keeping flags.

use crate::selection::SelectMode;
use crate::viewport::PanAnchor;
use ic_core::{Axis, Bounds, ElementId, ResizeMode};
use ic_render::Corner;

/// The published interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Panning,
    Marquee,
    Dragging,
    Resizing,
    Drawing,
    /// Creating, moving, or deleting a ruler guide.
    GuideDrag,
}

/// A captured drag: every moving element with its position at grab time.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// The target under the pointer; snapping is computed for it.
    pub anchor: ElementId,
    pub anchor_bounds: Bounds,
    /// World pointer at grab time.
    pub grab: (f64, f64),
    /// `(id, x, y)` of every member that moves, descendants included.
    pub origins: Vec<(ElementId, f64, f64)>,
}

impl DragState {
    /// Absolute positions for a pointer at `(wx, wy)`, with `correction`
    /// added to every member.
    pub fn positions(&self, wx: f64, wy: f64, correction: (f64, f64)) -> Vec<(ElementId, f64, f64)> {
        let dx = wx - self.grab.0 + correction.0;
        let dy = wy - self.grab.1 + correction.1;
        self.origins
            .iter()
            .map(|&(id, x, y)| (id, x + dx, y + dy))
            .collect()
    }

    /// Where the anchor would land for a pointer at `(wx, wy)`, before snapping.
    pub fn anchor_candidate(&self, wx: f64, wy: f64) -> Bounds {
        self.anchor_bounds
            .translated(wx - self.grab.0, wy - self.grab.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeState {
    pub element: ElementId,
    pub corner: Corner,
    pub initial: Bounds,
    pub mode: ResizeMode,
    pub grab: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeState {
    /// World corner where the box started.
    pub origin: (f64, f64),
    pub current: (f64, f64),
    pub mode: SelectMode,
    /// Selection at the start, kept when the box is additive.
    pub base: Vec<ElementId>,
}

impl MarqueeState {
    pub fn rect(&self) -> Bounds {
        Bounds::from_corners(self.origin.0, self.origin.1, self.current.0, self.current.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideDragState {
    pub axis: Axis,
    /// Existing guide being moved, `None` while pulling a new one.
    pub index: Option<usize>,
    pub position: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning(PanAnchor),
    Marquee(MarqueeState),
    Dragging(DragState),
    Resizing(ResizeState),
    Drawing,
    GuideDrag(GuideDragState),
}

impl Gesture {
    pub fn mode(&self) -> Mode {
        match self {
            Gesture::Idle => Mode::Idle,
            Gesture::Panning(_) => Mode::Panning,
            Gesture::Marquee(_) => Mode::Marquee,
            Gesture::Dragging(_) => Mode::Dragging,
            Gesture::Resizing(_) => Mode::Resizing,
            Gesture::Drawing => Mode::Drawing,
            Gesture::GuideDrag(_) => Mode::GuideDrag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_positions_keep_relative_layout() {
        let a = ElementId::intern("ix_a");
        let b = ElementId::intern("ix_b");
        let drag = DragState {
            anchor: a,
            anchor_bounds: Bounds::new(100.0, 100.0, 50.0, 50.0),
            grab: (120.0, 110.0),
            origins: vec![(a, 100.0, 100.0), (b, 300.0, 40.0)],
        };
        assert_eq!(
            drag.anchor_candidate(130.0, 115.0),
            Bounds::new(110.0, 105.0, 50.0, 50.0)
        );
        assert_eq!(
            drag.positions(130.0, 115.0, (-2.0, 3.0)),
            vec![(a, 108.0, 108.0), (b, 308.0, 48.0)]
        );
    }

    #[test]
    fn marquee_rect_from_any_direction() {
        let m = MarqueeState {
            origin: (50.0, 50.0),
            current: (10.0, 80.0),
            mode: SelectMode::Replace,
            base: Vec::new(),
        };
        assert_eq!(m.rect(), Bounds::new(10.0, 50.0, 40.0, 30.0));
    }

    #[test]
    fn modes() {
        assert_eq!(Gesture::default().mode(), Mode::Idle);
        assert_eq!(Gesture::Drawing.mode(), Mode::Drawing);
    }
}
