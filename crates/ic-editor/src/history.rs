//! Undo/Redo history.
//!
//! Snapshot-based: an entry is a full copy of the canvas's `elements` taken
//! before a user intent. Gestures (drag, resize, draw) and commands both go
//! through `begin` / `commit`, so one intent is one undo step no matter how
//! many scene mutations it performs, and intents that changed nothing leave
//! no entry behind.

use ic_core::Element;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<Element>,
    pub label: String,
}

#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth.
    capacity: usize,
    /// Snapshot captured by `begin`, waiting for `commit`.
    pending: Option<Snapshot>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            pending: None,
        }
    }

    /// Capture the state before an intent. Nested calls keep the outermost
    /// snapshot.
    pub fn begin(&mut self, label: &str, elements: &[Element]) {
        if self.pending.is_none() {
            self.pending = Some(Snapshot {
                elements: elements.to_vec(),
                label: label.to_string(),
            });
        }
    }

    /// Close the intent opened by `begin`. Pushes an undo step when
    /// `elements` differs from the snapshot. Returns whether a step was pushed.
    pub fn commit(&mut self, elements: &[Element]) -> bool {
        let Some(snapshot) = self.pending.take() else {
            return false;
        };
        if snapshot.elements == elements {
            log::trace!("history: {} changed nothing", snapshot.label);
            return false;
        }
        log::debug!("history: record {}", snapshot.label);
        self.push(snapshot);
        self.redo_stack.clear();
        true
    }

    /// Drop an open intent without recording it.
    pub fn abandon(&mut self) {
        self.pending = None;
    }

    pub fn is_recording(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a snapshot directly (the state before a mutation already applied).
    pub fn record(&mut self, label: &str, before: Vec<Element>) {
        self.push(Snapshot {
            elements: before,
            label: label.to_string(),
        });
        self.redo_stack.clear();
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Step back. `current` is the live element list; it moves to the redo
    /// tail and the previous state is returned for the caller to restore.
    pub fn undo(&mut self, current: &[Element]) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack.push(Snapshot {
            elements: current.to_vec(),
            label: snapshot.label.clone(),
        });
        log::debug!("history: undo {}", snapshot.label);
        Some(snapshot)
    }

    pub fn redo(&mut self, current: &[Element]) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.push(Snapshot {
            elements: current.to_vec(),
            label: snapshot.label.clone(),
        });
        log::debug!("history: redo {}", snapshot.label);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::{Bounds, ElementId, ElementKind};

    fn state(n: usize) -> Vec<Element> {
        (0..n)
            .map(|i| {
                Element::new(
                    ElementId::intern(&format!("hist_{i}")),
                    ElementKind::Image {
                        src: "a.png".into(),
                    },
                    Bounds::new(i as f64, 0.0, 1.0, 1.0),
                )
            })
            .collect()
    }

    #[test]
    fn undo_then_redo() {
        let mut h = History::new(50);
        h.begin("add", &state(1));
        assert!(h.commit(&state(2)));

        let restored = h.undo(&state(2)).unwrap();
        assert_eq!(restored.elements, state(1));
        assert!(h.can_redo());

        let again = h.redo(&state(1)).unwrap();
        assert_eq!(again.elements, state(2));
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn unchanged_intent_leaves_no_entry() {
        let mut h = History::new(50);
        h.begin("drag", &state(1));
        assert!(!h.commit(&state(1)));
        assert!(h.is_empty());
    }

    #[test]
    fn new_record_clears_redo() {
        let mut h = History::new(50);
        h.record("a", state(1));
        h.undo(&state(2));
        assert!(h.can_redo());
        h.record("b", state(1));
        assert!(!h.can_redo());
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.record("step", state(i));
        }
        assert_eq!(h.len(), 3);
        let mut last = None;
        while let Some(s) = h.undo(&[]) {
            last = Some(s);
        }
        assert_eq!(last.unwrap().elements.len(), 2);
    }
}
