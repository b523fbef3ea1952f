//! Snapping service: pulls a candidate position onto grid lines and guides.
//!
//! Each axis is resolved on its own. Guides win on the axes they match; the
//! grid fills any axis the guides left alone.

use ic_core::config::SnapConfig;
use ic_core::{Axis, Bounds, Guide};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapper {
    pub grid_size: f64,
    pub threshold: f64,
    /// Grid snapping (toggled with `S`).
    pub grid: bool,
    /// Guide snapping (on while rulers are visible).
    pub guides: bool,
}

impl Snapper {
    pub fn new(config: &SnapConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            threshold: config.threshold,
            grid: config.enabled,
            guides: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.grid || self.guides
    }

    /// Snap the top-left of `candidate` (an element of its size placed at
    /// the candidate position). Returns the corrected `(x, y)`.
    pub fn snap(&self, candidate: Bounds, guides: &[Guide]) -> (f64, f64) {
        let mut x = None;
        let mut y = None;
        if self.guides {
            // Vertical guides (`axis: y`) sit at an x position and vice versa.
            x = snap_to_guides(candidate.x, candidate.width, guides, Axis::Y, self.threshold);
            y = snap_to_guides(candidate.y, candidate.height, guides, Axis::X, self.threshold);
        }
        if self.grid && self.grid_size > 0.0 {
            x = x.or_else(|| snap_to_grid(candidate.x, candidate.width, self.grid_size, self.threshold));
            y = y.or_else(|| snap_to_grid(candidate.y, candidate.height, self.grid_size, self.threshold));
        }
        (x.unwrap_or(candidate.x), y.unwrap_or(candidate.y))
    }
}

/// Nearest grid line for the start and the end of a span. Returns the
/// corrected start when either is within `threshold`; ties prefer the start.
fn snap_to_grid(start: f64, size: f64, grid: f64, threshold: f64) -> Option<f64> {
    let near_start = (start / grid).round() * grid;
    let end = start + size;
    let near_end = (end / grid).round() * grid;
    let d_start = (near_start - start).abs();
    let d_end = (near_end - end).abs();

    match (d_start <= threshold, d_end <= threshold) {
        (true, true) if d_end < d_start => Some(near_end - size),
        (true, _) => Some(near_start),
        (false, true) => Some(near_end - size),
        (false, false) => None,
    }
}

/// Align the closest of start / center / end with a guide on `axis`.
/// Ties prefer start, then center, then end.
fn snap_to_guides(start: f64, size: f64, guides: &[Guide], axis: Axis, threshold: f64) -> Option<f64> {
    let features = [0.0, size / 2.0, size];
    let mut best: Option<(f64, f64)> = None;
    for offset in features {
        let feature = start + offset;
        for guide in guides.iter().filter(|g| g.axis == axis) {
            let d = (guide.position - feature).abs();
            if d <= threshold && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, guide.position - offset));
            }
        }
    }
    best.map(|(_, snapped)| snapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapper(grid: bool, guides: bool) -> Snapper {
        Snapper {
            grid_size: 40.0,
            threshold: 8.0,
            grid,
            guides,
        }
    }

    #[test]
    fn grid_snaps_top_left() {
        let s = snapper(true, false);
        assert_eq!(s.snap(Bounds::new(122.0, 117.0, 120.0, 100.0), &[]), (120.0, 120.0));
    }

    #[test]
    fn grid_snaps_bottom_right_when_closer() {
        let s = snapper(true, false);
        // Top-left is 7 away from 80; bottom-right (158) is 2 away from 160.
        assert_eq!(s.snap(Bounds::new(87.0, 0.0, 71.0, 40.0), &[]).0, 89.0);
    }

    #[test]
    fn grid_leaves_far_candidates_alone() {
        let s = snapper(true, false);
        assert_eq!(s.snap(Bounds::new(142.0, 137.0, 120.0, 90.0), &[]), (142.0, 137.0));
    }

    #[test]
    fn disabled_snapper_is_identity() {
        let s = snapper(false, false);
        assert_eq!(s.snap(Bounds::new(121.0, 119.0, 10.0, 10.0), &[]), (121.0, 119.0));
    }

    #[test]
    fn guides_align_features() {
        let s = snapper(false, true);
        let guides = [
            Guide {
                axis: Axis::Y,
                position: 300.0,
            },
            Guide {
                axis: Axis::X,
                position: 500.0,
            },
        ];
        // Center x at 296 → 300; bottom 503 → 500.
        let (x, y) = s.snap(Bounds::new(246.0, 403.0, 100.0, 100.0), &guides);
        assert_eq!(x, 250.0);
        assert_eq!(y, 400.0);
    }

    #[test]
    fn guides_take_priority_and_grid_fills_the_rest() {
        let s = snapper(true, true);
        let guides = [Guide {
            axis: Axis::Y,
            position: 103.0,
        }];
        let (x, y) = s.snap(Bounds::new(98.0, 83.0, 50.0, 50.0), &guides);
        assert_eq!(x, 103.0);
        assert_eq!(y, 80.0);
    }
}
