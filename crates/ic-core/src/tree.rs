//! The canvas tree: parent/child relationships between canvases.
//!
//! Persisted as `{ rootCanvases: [id], canvases: { id: { name, parent, children } } }`.
//! Invariants: roots have no parent, every child lists its parent back, and
//! the parent relation is acyclic.

use crate::error::ModelError;
use crate::id::CanvasId;
use crate::model::MAIN_CANVAS_NAME;
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub parent: Option<CanvasId>,
    #[serde(default)]
    pub children: Vec<CanvasId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDocument {
    pub root_canvases: Vec<CanvasId>,
    pub canvases: HashMap<CanvasId, TreeNode>,
}

impl Default for TreeDocument {
    /// A tree holding only the main canvas.
    fn default() -> Self {
        let mut canvases = HashMap::new();
        canvases.insert(
            CanvasId::main(),
            TreeNode {
                name: MAIN_CANVAS_NAME.to_string(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            root_canvases: vec![CanvasId::main()],
            canvases,
        }
    }
}

impl TreeDocument {
    pub fn get(&self, id: &CanvasId) -> Option<&TreeNode> {
        self.canvases.get(id)
    }

    pub fn contains(&self, id: &CanvasId) -> bool {
        self.canvases.contains_key(id)
    }

    /// Insert a canvas under `parent` (or as a root). No-op when `id` exists.
    pub fn add_canvas(
        &mut self,
        id: CanvasId,
        parent: Option<CanvasId>,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        if self.canvases.contains_key(&id) {
            log::debug!("tree: {id} already present, add ignored");
            return Ok(());
        }
        match &parent {
            Some(p) => {
                let parent_node = self
                    .canvases
                    .get_mut(p)
                    .ok_or_else(|| ModelError::UnknownCanvas(p.to_string()))?;
                parent_node.children.push(id.clone());
            }
            None => self.root_canvases.push(id.clone()),
        }
        self.canvases.insert(
            id,
            TreeNode {
                name: name.into(),
                parent,
                children: Vec::new(),
            },
        );
        Ok(())
    }

    /// Remove a canvas. Its children move up to its parent (or become roots),
    /// keeping their position in the sibling list.
    pub fn remove_canvas(&mut self, id: &CanvasId) -> Result<(), ModelError> {
        if id.is_main() {
            return Err(ModelError::CannotRemoveMain);
        }
        let node = self
            .canvases
            .remove(id)
            .ok_or_else(|| ModelError::UnknownCanvas(id.to_string()))?;

        for child in &node.children {
            if let Some(c) = self.canvases.get_mut(child) {
                c.parent = node.parent.clone();
            }
        }

        let siblings = match &node.parent {
            Some(p) => match self.canvases.get_mut(p) {
                Some(parent_node) => &mut parent_node.children,
                None => &mut self.root_canvases,
            },
            None => &mut self.root_canvases,
        };
        match siblings.iter().position(|c| c == id) {
            Some(pos) => {
                siblings.remove(pos);
                for (i, child) in node.children.iter().enumerate() {
                    siblings.insert(pos + i, child.clone());
                }
            }
            None => siblings.extend(node.children.iter().cloned()),
        }
        Ok(())
    }

    /// Re-parent a canvas (`None` makes it a root).
    pub fn move_canvas(
        &mut self,
        id: &CanvasId,
        new_parent: Option<CanvasId>,
    ) -> Result<(), ModelError> {
        let old_parent = self
            .canvases
            .get(id)
            .ok_or_else(|| ModelError::UnknownCanvas(id.to_string()))?
            .parent
            .clone();
        if let Some(p) = &new_parent {
            if !self.canvases.contains_key(p) {
                return Err(ModelError::UnknownCanvas(p.to_string()));
            }
            if p == id || self.descendants(id).contains(p) {
                return Err(ModelError::TreeCycle {
                    id: id.to_string(),
                    parent: p.to_string(),
                });
            }
        }
        if old_parent == new_parent {
            return Ok(());
        }

        match &old_parent {
            Some(p) => {
                if let Some(n) = self.canvases.get_mut(p) {
                    n.children.retain(|c| c != id);
                }
            }
            None => self.root_canvases.retain(|c| c != id),
        }
        match &new_parent {
            Some(p) => {
                if let Some(n) = self.canvases.get_mut(p) {
                    n.children.push(id.clone());
                }
            }
            None => self.root_canvases.push(id.clone()),
        }
        if let Some(n) = self.canvases.get_mut(id) {
            n.parent = new_parent;
        }
        Ok(())
    }

    /// All canvases below `id`, depth-first.
    pub fn descendants(&self, id: &CanvasId) -> Vec<CanvasId> {
        let mut out = Vec::new();
        let mut stack: Vec<&CanvasId> = match self.canvases.get(id) {
            Some(n) => n.children.iter().rev().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            if out.contains(next) {
                continue;
            }
            out.push(next.clone());
            if let Some(n) = self.canvases.get(next) {
                stack.extend(n.children.iter().rev());
            }
        }
        out
    }

    /// Every canvas reachable from the roots with its depth, depth-first.
    /// A canvas is listed once; links back to one already listed are
    /// skipped, so an inconsistent tree still terminates.
    pub fn outline(&self) -> Vec<(usize, &CanvasId)> {
        let mut out = Vec::new();
        let mut seen: HashSet<&CanvasId> = HashSet::new();
        let mut stack: Vec<(usize, &CanvasId)> =
            self.root_canvases.iter().rev().map(|id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            out.push((depth, id));
            if let Some(n) = self.canvases.get(id) {
                stack.extend(n.children.iter().rev().map(|c| (depth + 1, c)));
            }
        }
        out
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        for root in &self.root_canvases {
            match self.canvases.get(root) {
                Some(n) if n.parent.is_none() => {}
                Some(_) => {
                    return Err(ModelError::InconsistentTree(format!(
                        "root {root} has a parent"
                    )));
                }
                None => return Err(ModelError::UnknownCanvas(root.to_string())),
            }
        }

        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for (id, node) in &self.canvases {
            graph.add_node(id.as_str());
            for child in &node.children {
                let child_node = self
                    .canvases
                    .get(child)
                    .ok_or_else(|| ModelError::UnknownCanvas(child.to_string()))?;
                if child_node.parent.as_ref() != Some(id) {
                    return Err(ModelError::InconsistentTree(format!(
                        "{child} is listed under {id} but its parent is {:?}",
                        child_node.parent
                    )));
                }
                graph.add_edge(id.as_str(), child.as_str(), ());
            }
            if node.parent.is_none() && !self.root_canvases.contains(id) {
                return Err(ModelError::InconsistentTree(format!(
                    "{id} has no parent but is not a root"
                )));
            }
        }
        if is_cyclic_directed(&graph) {
            return Err(ModelError::InconsistentTree("cycle detected".into()));
        }
        Ok(())
    }
}
