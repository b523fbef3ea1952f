//! Geometric operations: resize, align, distribute, flip.
//!
//! Operations take top-level targets (groups count as one target) and move
//! a target's descendants along with it. Locked elements never move, but
//! still count when computing the reference edge.

use crate::error::EditorError;
use crate::scene::Scene;
use ic_core::{Bounds, Element, ElementId, ModelError, ResizeMode};
use ic_render::Corner;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignKind {
    Left,
    CenterH,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

// ─── Resize ──────────────────────────────────────────────────────────────

/// New bounds for dragging `corner` of `initial` by `(dx, dy)`.
///
/// The opposite corner stays put. `Uniform` scales along the corner's
/// diagonal, `Free` moves each edge independently; both keep each side at
/// least `min_size`.
pub fn resize_bounds(
    initial: Bounds,
    corner: Corner,
    dx: f64,
    dy: f64,
    mode: ResizeMode,
    min_size: f64,
) -> Bounds {
    let (sx, sy) = corner.direction();
    let (width, height) = match mode {
        ResizeMode::None => return initial,
        ResizeMode::Uniform => {
            let perimeter = initial.width + initial.height;
            if perimeter <= 0.0 {
                return initial;
            }
            let mut scale = 1.0 + (sx * dx + sy * dy) / perimeter;
            let short = initial.width.min(initial.height);
            if short > 0.0 {
                scale = scale.max((min_size / short).min(1.0));
            }
            (initial.width * scale, initial.height * scale)
        }
        ResizeMode::Free => (
            (initial.width + sx * dx).max(min_size),
            (initial.height + sy * dy).max(min_size),
        ),
    };
    let (ax, ay) = corner.opposite().point_of(&initial);
    let x = if sx > 0.0 { ax } else { ax - width };
    let y = if sy > 0.0 { ay } else { ay - height };
    Bounds::new(x, y, width, height)
}

// ─── Shared helpers ──────────────────────────────────────────────────────

/// Resolve `ids` to distinct top-level targets, keeping first-seen order.
pub fn top_level_targets(scene: &Scene, ids: &[ElementId]) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::new();
    for id in ids {
        if !scene.contains(*id) {
            continue;
        }
        let top = scene.top_level(*id);
        if !out.contains(&top) {
            out.push(top);
        }
    }
    out
}

/// Translate each target (and its descendants) by its own delta.
fn translate_targets(scene: &mut Scene, deltas: &[(ElementId, f64, f64)]) -> Result<(), ModelError> {
    let mut moves: HashMap<ElementId, (f64, f64)> = HashMap::new();
    for &(id, dx, dy) in deltas {
        if dx == 0.0 && dy == 0.0 {
            continue;
        }
        for member in std::iter::once(id).chain(scene.descendants(id)) {
            moves.insert(member, (dx, dy));
        }
    }
    if moves.is_empty() {
        return Ok(());
    }
    scene.edit(|els| {
        for el in els.iter_mut() {
            if let Some((dx, dy)) = moves.get(&el.id) {
                el.x += dx;
                el.y += dy;
            }
        }
        Ok(())
    })
}

fn target_bounds(scene: &Scene, ids: &[ElementId]) -> Vec<(ElementId, Bounds, bool)> {
    ids.iter()
        .filter_map(|id| scene.element(*id))
        .map(|e| (e.id, e.bounds(), e.is_locked()))
        .collect()
}

// ─── Align & distribute ──────────────────────────────────────────────────

pub fn align(scene: &mut Scene, ids: &[ElementId], kind: AlignKind) -> Result<(), EditorError> {
    let targets = top_level_targets(scene, ids);
    if targets.len() < 2 {
        return Err(EditorError::NeedsSelection { min: 2 });
    }
    let items = target_bounds(scene, &targets);
    let n = items.len() as f64;
    let reference = match kind {
        AlignKind::Left => items.iter().map(|(_, b, _)| b.x).fold(f64::INFINITY, f64::min),
        AlignKind::Right => items.iter().map(|(_, b, _)| b.right()).fold(f64::NEG_INFINITY, f64::max),
        AlignKind::CenterH => items.iter().map(|(_, b, _)| b.center().0).sum::<f64>() / n,
        AlignKind::Top => items.iter().map(|(_, b, _)| b.y).fold(f64::INFINITY, f64::min),
        AlignKind::Bottom => items.iter().map(|(_, b, _)| b.bottom()).fold(f64::NEG_INFINITY, f64::max),
        AlignKind::Middle => items.iter().map(|(_, b, _)| b.center().1).sum::<f64>() / n,
    };
    let deltas: Vec<(ElementId, f64, f64)> = items
        .iter()
        .filter(|(_, _, locked)| !locked)
        .map(|(id, b, _)| match kind {
            AlignKind::Left => (*id, reference - b.x, 0.0),
            AlignKind::Right => (*id, reference - b.right(), 0.0),
            AlignKind::CenterH => (*id, reference - b.center().0, 0.0),
            AlignKind::Top => (*id, 0.0, reference - b.y),
            AlignKind::Bottom => (*id, 0.0, reference - b.bottom()),
            AlignKind::Middle => (*id, 0.0, reference - b.center().1),
        })
        .collect();
    translate_targets(scene, &deltas)?;
    Ok(())
}

/// Equal gaps between targets along `orientation`; the outermost two stay.
pub fn distribute(
    scene: &mut Scene,
    ids: &[ElementId],
    orientation: Orientation,
) -> Result<(), EditorError> {
    let targets = top_level_targets(scene, ids);
    if targets.len() < 3 {
        return Err(EditorError::NeedsSelection { min: 3 });
    }
    let start = |b: &Bounds| match orientation {
        Orientation::Horizontal => b.x,
        Orientation::Vertical => b.y,
    };
    let size = |b: &Bounds| match orientation {
        Orientation::Horizontal => b.width,
        Orientation::Vertical => b.height,
    };
    let mut items = target_bounds(scene, &targets);
    items.sort_by(|a, b| start(&a.1).total_cmp(&start(&b.1)));

    let first = start(&items[0].1);
    let end = items
        .iter()
        .map(|(_, b, _)| start(b) + size(b))
        .fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = items.iter().map(|(_, b, _)| size(b)).sum();
    let gap = (end - first - total) / (items.len() - 1) as f64;

    let mut cursor = first;
    let mut deltas = Vec::with_capacity(items.len());
    for (id, b, locked) in &items {
        let delta = cursor - start(b);
        if !locked {
            deltas.push(match orientation {
                Orientation::Horizontal => (*id, delta, 0.0),
                Orientation::Vertical => (*id, 0.0, delta),
            });
        }
        cursor += size(b) + gap;
    }
    translate_targets(scene, &deltas)?;
    Ok(())
}

// ─── Flip ────────────────────────────────────────────────────────────────

/// Toggle the mirror flag of every selected element about its own center.
/// Groups flip their members.
pub fn flip(scene: &mut Scene, ids: &[ElementId], orientation: Orientation) -> Result<(), EditorError> {
    let leaves: Vec<ElementId> = scene
        .expand_groups(ids)
        .into_iter()
        .filter(|id| scene.element(*id).is_some_and(|e| !e.is_group() && !e.is_locked()))
        .collect();
    if leaves.is_empty() {
        return Err(EditorError::NothingSelected);
    }
    scene.edit(|els| {
        for el in els.iter_mut().filter(|e| leaves.contains(&e.id)) {
            toggle_flip(el, orientation);
        }
        Ok(())
    })?;
    Ok(())
}

fn toggle_flip(el: &mut Element, orientation: Orientation) {
    let slot = match orientation {
        Orientation::Horizontal => &mut el.flip_h,
        Orientation::Vertical => &mut el.flip_v,
    };
    *slot = if slot.unwrap_or(false) { None } else { Some(true) };
}
