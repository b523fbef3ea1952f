//! Selection store: a set of element ids plus the primary (last clicked).

use ic_core::ElementId;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Replace,
    Add,
    Toggle,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Insertion order is kept so "the selection's internal order" is stable.
    ids: SmallVec<[ElementId; 8]>,
    primary: Option<ElementId>,
    changed: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: ElementId, mode: SelectMode) {
        match mode {
            SelectMode::Replace => {
                if self.ids.as_slice() == [id] && self.primary == Some(id) {
                    return;
                }
                self.ids.clear();
                self.ids.push(id);
                self.primary = Some(id);
            }
            SelectMode::Add => {
                if !self.ids.contains(&id) {
                    self.ids.push(id);
                }
                self.primary = Some(id);
            }
            SelectMode::Toggle => {
                if let Some(pos) = self.ids.iter().position(|s| *s == id) {
                    self.ids.remove(pos);
                    if self.primary == Some(id) {
                        self.primary = self.ids.last().copied();
                    }
                } else {
                    self.ids.push(id);
                    self.primary = Some(id);
                }
            }
        }
        self.changed = true;
    }

    /// Replace the selection with `ids`; the last one becomes primary.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        let mut next: SmallVec<[ElementId; 8]> = SmallVec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        let primary = next.last().copied();
        if next != self.ids || primary != self.primary {
            self.ids = next;
            self.primary = primary;
            self.changed = true;
        }
    }

    pub fn clear(&mut self) {
        if !self.ids.is_empty() || self.primary.is_some() {
            self.ids.clear();
            self.primary = None;
            self.changed = true;
        }
    }

    /// Drop ids for which `keep` is false (elements that no longer exist).
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        let before = self.ids.len();
        self.ids.retain(|id| keep(*id));
        if self.primary.is_some_and(|p| !self.ids.contains(&p)) {
            self.primary = self.ids.last().copied();
            self.changed = true;
        }
        if self.ids.len() != before {
            self.changed = true;
        }
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn primary(&self) -> Option<ElementId> {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the selection changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::intern(s)
    }

    #[test]
    fn replace_add_toggle() {
        let mut sel = Selection::new();
        sel.select(id("sel_a"), SelectMode::Replace);
        sel.select(id("sel_b"), SelectMode::Add);
        assert_eq!(sel.ids(), &[id("sel_a"), id("sel_b")]);
        assert_eq!(sel.primary(), Some(id("sel_b")));

        sel.select(id("sel_b"), SelectMode::Toggle);
        assert_eq!(sel.ids(), &[id("sel_a")]);
        assert_eq!(sel.primary(), Some(id("sel_a")));

        sel.select(id("sel_c"), SelectMode::Replace);
        assert_eq!(sel.ids(), &[id("sel_c")]);
        assert!(sel.take_changed());
        assert!(!sel.take_changed());
    }

    #[test]
    fn retain_fixes_primary() {
        let mut sel = Selection::new();
        sel.select_many([id("sel_x"), id("sel_y")]);
        sel.retain(|i| i != id("sel_y"));
        assert_eq!(sel.primary(), Some(id("sel_x")));
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(sel.primary(), None);
    }
}
