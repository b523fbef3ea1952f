//! Invariant checks over canvas documents.
//!
//! - element ids are unique within a canvas
//! - every numeric field is finite and sizes are non-negative
//! - colors are valid CSS colors (fills may be `none`)
//! - group members exist and point back at their group
//! - the background, when set, is `transparent` or a valid CSS color
//!
//! `repair_canvas` brings a stored document that breaks these back into
//! shape so it can still be opened.

use crate::error::ModelError;
use crate::id::ElementId;
use crate::model::{Background, Canvas, Element, ElementKind};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Validate a whole canvas document.
pub fn validate_canvas(canvas: &Canvas) -> Result<(), ModelError> {
    validate_elements(&canvas.elements)?;
    if let Some(bg) = &canvas.background_color {
        bg.check()?;
    }
    for guide in &canvas.guides {
        if !guide.position.is_finite() {
            return Err(ModelError::NonFinite {
                id: format!("guide:{:?}", guide.axis),
                field: "position",
            });
        }
    }
    Ok(())
}

/// Validate an element list in isolation.
pub fn validate_elements(elements: &[Element]) -> Result<(), ModelError> {
    let mut seen: HashSet<ElementId> = HashSet::with_capacity(elements.len());
    for el in elements {
        if !seen.insert(el.id) {
            return Err(ModelError::DuplicateId(el.id.as_str().to_string()));
        }
        el.check()?;
    }

    let by_id: HashMap<ElementId, &Element> = elements.iter().map(|e| (e.id, e)).collect();
    for el in elements {
        for child in el.group_children() {
            match by_id.get(child) {
                Some(c) if c.group_id == Some(el.id) => {}
                _ => {
                    return Err(ModelError::DanglingGroupChild {
                        group: el.id.as_str().to_string(),
                        child: child.as_str().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Fix what `validate_canvas` would reject and report each violation.
///
/// Later duplicates of an id and elements failing their own checks are
/// dropped, group links that do not resolve both ways are cut, groups left
/// without members are dropped, and non-finite guides and an invalid
/// background are cleared. A valid canvas comes back untouched.
pub fn repair_canvas(canvas: &mut Canvas) -> Vec<ModelError> {
    let mut problems = Vec::new();

    let mut seen: HashSet<ElementId> = HashSet::with_capacity(canvas.elements.len());
    canvas.elements.retain(|el| {
        if !seen.insert(el.id) {
            problems.push(ModelError::DuplicateId(el.id.as_str().to_string()));
            return false;
        }
        match el.check() {
            Ok(()) => true,
            Err(e) => {
                problems.push(e);
                false
            }
        }
    });

    // Dropping an empty group can orphan its own parent's link, so repeat.
    loop {
        reconcile_group_links(canvas, &mut problems);
        let before = canvas.elements.len();
        canvas.elements.retain(|el| {
            let empty = el.is_group() && el.group_children().is_empty();
            if empty {
                problems.push(ModelError::UnknownElement(el.id.as_str().to_string()));
            }
            !empty
        });
        if canvas.elements.len() == before {
            break;
        }
    }

    canvas.guides.retain(|guide| {
        let ok = guide.position.is_finite();
        if !ok {
            problems.push(ModelError::NonFinite {
                id: format!("guide:{:?}", guide.axis),
                field: "position",
            });
        }
        ok
    });
    if let Some(Err(e)) = canvas.background_color.as_ref().map(Background::check) {
        problems.push(e);
        canvas.background_color = None;
    }
    problems
}

/// Cut child links that do not point back and clear `group_id`s their
/// group does not list.
fn reconcile_group_links(canvas: &mut Canvas, problems: &mut Vec<ModelError>) {
    // A child link holds only when the child exists and names the group.
    let owners: HashMap<ElementId, Option<ElementId>> =
        canvas.elements.iter().map(|e| (e.id, e.group_id)).collect();
    for el in &mut canvas.elements {
        let group = el.id;
        if let ElementKind::Group { children } = &mut el.kind {
            children.retain(|child| {
                let ok = owners.get(child) == Some(&Some(group));
                if !ok {
                    problems.push(ModelError::DanglingGroupChild {
                        group: group.as_str().to_string(),
                        child: child.as_str().to_string(),
                    });
                }
                ok
            });
        }
    }
    let listed: HashSet<(ElementId, ElementId)> = canvas
        .elements
        .iter()
        .flat_map(|g| g.group_children().iter().map(move |c| (g.id, *c)))
        .collect();
    for el in &mut canvas.elements {
        if let Some(group) = el.group_id
            && !listed.contains(&(group, el.id))
        {
            el.group_id = None;
        }
    }
}

/// Compare two `(z_index, array_index)` ranks.
pub fn rank_cmp(a: (f64, usize), b: (f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Array indices of `elements` in canonical render order (back to front).
pub fn canonical_order(elements: &[Element]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by(|&a, &b| rank_cmp((elements[a].z_index, a), (elements[b].z_index, b)));
    order
}

/// True when the array is already in canonical order.
pub fn is_canonically_ordered(elements: &[Element]) -> bool {
    elements
        .windows(2)
        .all(|w| w[0].z_index.total_cmp(&w[1].z_index) != Ordering::Greater)
}
