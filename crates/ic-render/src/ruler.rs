//! Ruler tick layout.
//!
//! Rulers are drawn in screen space. The tick interval is the smallest
//! "nice" world distance that keeps ticks at least `min_spacing` pixels apart.

/// Candidate tick intervals in world units.
pub const TICK_INTERVALS: [f64; 12] = [
    1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0,
];

/// Every tenth tick is major and carries a label.
const MAJOR_EVERY: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position in world units along the ruler axis.
    pub world: f64,
    /// Position in pixels from the ruler origin.
    pub screen: f64,
    pub major: bool,
    pub label: Option<String>,
}

/// Pick the tick interval for `pixels_per_unit` (container pixels per world unit).
///
/// Falls back to the largest interval when even that is too dense.
pub fn tick_interval(pixels_per_unit: f64, min_spacing: f64) -> f64 {
    TICK_INTERVALS
        .iter()
        .copied()
        .find(|i| i * pixels_per_unit >= min_spacing)
        .unwrap_or(TICK_INTERVALS[TICK_INTERVALS.len() - 1])
}

/// Lay out ticks for a ruler spanning `length_px` pixels whose left/top edge
/// shows world coordinate `start_world`.
pub fn ruler_ticks(
    start_world: f64,
    pixels_per_unit: f64,
    length_px: f64,
    min_spacing: f64,
) -> Vec<Tick> {
    if !(pixels_per_unit > 0.0) || !start_world.is_finite() || !(length_px > 0.0) {
        return Vec::new();
    }
    let interval = tick_interval(pixels_per_unit, min_spacing);
    let end_world = start_world + length_px / pixels_per_unit;

    let first = (start_world / interval).ceil() as i64;
    let last = (end_world / interval).floor() as i64;
    let mut ticks = Vec::with_capacity((last - first + 1).max(0) as usize);
    for n in first..=last {
        let world = n as f64 * interval;
        let major = (n as f64).rem_euclid(MAJOR_EVERY) == 0.0;
        ticks.push(Tick {
            world,
            screen: (world - start_world) * pixels_per_unit,
            major,
            label: major.then(|| format_label(world)),
        });
    }
    log::trace!("ruler: {} ticks at interval {interval}", ticks.len());
    ticks
}

fn format_label(world: f64) -> String {
    if world.fract() == 0.0 {
        format!("{}", world as i64)
    } else {
        format!("{world}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interval_tracks_zoom() {
        assert_eq!(tick_interval(1.0, 5.0), 5.0);
        assert_eq!(tick_interval(10.0, 5.0), 1.0);
        assert_eq!(tick_interval(0.1, 5.0), 50.0);
        assert_eq!(tick_interval(0.0001, 5.0), 5000.0);
    }

    #[test]
    fn ticks_cover_the_visible_range() {
        let ticks = ruler_ticks(-12.0, 1.0, 100.0, 5.0);
        assert_eq!(ticks.first().map(|t| t.world), Some(-10.0));
        assert_eq!(ticks.last().map(|t| t.world), Some(85.0));
        let zero = ticks.iter().find(|t| t.world == 0.0).unwrap();
        assert!(zero.major);
        assert_eq!(zero.screen, 12.0);
        assert_eq!(zero.label.as_deref(), Some("0"));
        let minor = ticks.iter().find(|t| t.world == 5.0).unwrap();
        assert!(!minor.major);
        assert_eq!(minor.label, None);
        assert!(ticks.iter().find(|t| t.world == 50.0).unwrap().major);
        assert!(ticks.iter().find(|t| t.world == -50.0).is_none());
    }

    #[test]
    fn degenerate_inputs_yield_nothing() {
        assert!(ruler_ticks(0.0, 0.0, 100.0, 5.0).is_empty());
        assert!(ruler_ticks(0.0, 1.0, 0.0, 5.0).is_empty());
    }
}
