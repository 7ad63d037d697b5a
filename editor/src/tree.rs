//! Derived parent/children view of the flat object list, for layer panels.
//!
//! The flat list with `parent_id` stays the source of truth. This module only
//! builds an arena of nodes pointing back into that list; nothing here is
//! persisted. Objects whose parent is missing from the list are shown as roots.

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

use std::collections::HashMap;

use crate::doc::MapObject;

/// One row of the layer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNode {
    /// Index of the object in the source list.
    pub object: usize,
    /// Node indices of the children, in list order.
    pub children: Vec<usize>,
}

/// Arena-backed tree over an object list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerTree {
    nodes: Vec<LayerNode>,
    roots: Vec<usize>,
}

impl LayerTree {
    /// Build the tree for `objects`. Node `i` always refers to `objects[i]`.
    #[must_use]
    pub fn build(objects: &[MapObject]) -> Self {
        let index: HashMap<&str, usize> = objects.iter().enumerate().map(|(i, o)| (o.id.as_str(), i)).collect();
        let mut nodes: Vec<LayerNode> = (0..objects.len()).map(|i| LayerNode { object: i, children: Vec::new() }).collect();
        let mut roots = Vec::new();

        for (i, obj) in objects.iter().enumerate() {
            match obj.parent_id.as_deref().and_then(|p| index.get(p)) {
                Some(&parent) if parent != i => nodes[parent].children.push(i),
                _ => roots.push(i),
            }
        }

        Self { nodes, roots }
    }

    /// Top-level node indices, in list order.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&LayerNode> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first `(depth, object index)` pairs, the order a layer list draws rows.
    #[must_use]
    pub fn flatten(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.walk(root, 0, &mut out);
        }
        out
    }

    fn walk(&self, index: usize, depth: usize, out: &mut Vec<(usize, usize)>) {
        let Some(node) = self.nodes.get(index) else {
            return;
        };
        out.push((depth, node.object));
        for &child in &node.children {
            self.walk(child, depth + 1, out);
        }
    }
}
