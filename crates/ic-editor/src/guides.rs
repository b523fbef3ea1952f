//! Ruler and guide geometry for pointer handling.
//!
//! Rulers sit along the top and left edges of the container. Pulling from
//! the top ruler makes a horizontal guide (`axis: x`); pulling from the
//! left ruler makes a vertical one (`axis: y`).

use crate::viewport::Viewport;
use ic_core::{Axis, Guide};

/// The guide axis created by dragging from the ruler under `(sx, sy)`.
/// The corner square where both rulers meet creates nothing.
pub fn ruler_at(sx: f64, sy: f64, ruler_size: f64) -> Option<Axis> {
    let on_top = sy >= 0.0 && sy < ruler_size;
    let on_left = sx >= 0.0 && sx < ruler_size;
    match (on_top, on_left) {
        (true, false) => Some(Axis::X),
        (false, true) => Some(Axis::Y),
        _ => None,
    }
}

/// Whether a guide of `axis` dropped at `(sx, sy)` lands back on its ruler.
pub fn over_own_ruler(axis: Axis, sx: f64, sy: f64, ruler_size: f64) -> bool {
    match axis {
        Axis::X => sy < ruler_size,
        Axis::Y => sx < ruler_size,
    }
}

/// World position of a guide of `axis` under the pointer.
pub fn guide_position(viewport: &Viewport, axis: Axis, sx: f64, sy: f64) -> f64 {
    let (wx, wy) = viewport.screen_to_world(sx, sy);
    match axis {
        Axis::X => wy,
        Axis::Y => wx,
    }
}

/// Index of the guide nearest to `(sx, sy)` within `tolerance` pixels.
pub fn guide_at(guides: &[Guide], viewport: &Viewport, sx: f64, sy: f64, tolerance: f64) -> Option<usize> {
    guides
        .iter()
        .enumerate()
        .filter_map(|(i, g)| {
            let d = match g.axis {
                Axis::X => (viewport.world_to_screen(0.0, g.position).1 - sy).abs(),
                Axis::Y => (viewport.world_to_screen(g.position, 0.0).0 - sx).abs(),
            };
            (d <= tolerance).then_some((i, d))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::ViewBox;
    use ic_core::config::ViewportConfig;

    fn zoomed_viewport() -> Viewport {
        // 2 px per world unit, origin at (100, 50).
        Viewport::new(
            ViewBox {
                x: 100.0,
                y: 50.0,
                width: 400.0,
                height: 300.0,
            },
            800.0,
            600.0,
            ViewportConfig::default(),
        )
    }

    #[test]
    fn rulers_pick_the_axis() {
        assert_eq!(ruler_at(300.0, 10.0, 20.0), Some(Axis::X));
        assert_eq!(ruler_at(10.0, 300.0, 20.0), Some(Axis::Y));
        assert_eq!(ruler_at(10.0, 10.0, 20.0), None);
        assert_eq!(ruler_at(300.0, 300.0, 20.0), None);
    }

    #[test]
    fn positions_are_in_world_units() {
        let vp = zoomed_viewport();
        assert_eq!(guide_position(&vp, Axis::X, 0.0, 200.0), 150.0);
        assert_eq!(guide_position(&vp, Axis::Y, 200.0, 0.0), 200.0);
    }

    #[test]
    fn nearest_guide_within_tolerance() {
        let vp = zoomed_viewport();
        let guides = [
            Guide {
                axis: Axis::X,
                position: 150.0,
            },
            Guide {
                axis: Axis::Y,
                position: 200.0,
            },
        ];
        // Horizontal guide at world y 150 is at screen y 200.
        assert_eq!(guide_at(&guides, &vp, 500.0, 203.0, 4.0), Some(0));
        // Vertical guide at world x 200 is at screen x 200.
        assert_eq!(guide_at(&guides, &vp, 198.0, 500.0, 4.0), Some(1));
        assert_eq!(guide_at(&guides, &vp, 500.0, 500.0, 4.0), None);
    }

    #[test]
    fn dropping_on_the_ruler() {
        assert!(over_own_ruler(Axis::X, 400.0, 5.0, 20.0));
        assert!(!over_own_ruler(Axis::X, 5.0, 400.0, 20.0));
        assert!(over_own_ruler(Axis::Y, 5.0, 400.0, 20.0));
    }
}
