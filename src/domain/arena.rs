//! Arena-backed org tree.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{NodeId, OrgNode};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Org entity stored at this position
    pub data: OrgNode,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree holding one company hierarchy.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// A by-id index maps `NodeId`s back to arena slots.
#[derive(Debug)]
pub struct OrgTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    by_id: HashMap<NodeId, Index>,
}

impl Default for OrgTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            by_id: HashMap::new(),
        }
    }

    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: OrgNode, parent: Option<Index>) -> Index {
        let id = data.id.clone();
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        self.by_id.insert(id, node_idx);
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn index_of(&self, id: &NodeId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, id: &NodeId) -> Option<&OrgNode> {
        self.index_of(id)
            .and_then(|idx| self.get_node(idx))
            .map(|n| &n.data)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal: parents always precede their children.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Org nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = &OrgNode> {
        self.iter().map(|(_, node)| &node.data)
    }

    /// Number of levels in the tree, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Distance from the root (root = 0).
    pub fn depth_of(&self, idx: Index) -> usize {
        self.ancestors(idx).count()
    }

    /// Ancestors of a node, nearest first. Does not include the node itself.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get_node(idx).and_then(|n| n.parent),
        }
    }

    /// Ids of all leaf nodes (nodes with no children), in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a OrgTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a OrgTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a OrgTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a OrgTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

pub struct Ancestors<'a> {
    tree: &'a OrgTree,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.tree.get_node(idx)?;
        self.next = node.parent;
        Some((idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeCategory;

    // root
    // ├── gov-0
    // │   └── gov-0-sub-0
    // └── gov-1
    fn sample() -> OrgTree {
        let mut tree = OrgTree::new();
        let root = tree.insert_node(OrgNode::new(NodeId::root(), None, "Acme", NodeCategory::Root), None);
        let g0 = tree.insert_node(
            OrgNode::new(NodeId::governance(0), Some(NodeId::root()), "Board", NodeCategory::Governance),
            Some(root),
        );
        tree.insert_node(
            OrgNode::new(NodeId::subunit(0, 0), Some(NodeId::governance(0)), "Audit", NodeCategory::Subunit),
            Some(g0),
        );
        tree.insert_node(
            OrgNode::new(NodeId::governance(1), Some(NodeId::root()), "Council", NodeCategory::Governance),
            Some(root),
        );
        tree
    }

    #[test]
    fn given_tree_when_iterating_preorder_then_parents_first() {
        let tree = sample();
        let ids: Vec<_> = tree.nodes().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["root", "gov-0", "gov-0-sub-0", "gov-1"]);
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_root_last() {
        let tree = sample();
        let ids: Vec<_> = tree
            .iter_postorder()
            .map(|(_, n)| n.data.id.to_string())
            .collect();
        assert_eq!(ids, vec!["gov-0-sub-0", "gov-0", "gov-1", "root"]);
    }

    #[test]
    fn given_tree_when_querying_shape_then_depth_and_leaves_match() {
        let tree = sample();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_nodes(), vec![NodeId::subunit(0, 0), NodeId::governance(1)]);

        let sub = tree.index_of(&NodeId::subunit(0, 0)).unwrap();
        assert_eq!(tree.depth_of(sub), 2);
        let chain: Vec<_> = tree.ancestors(sub).map(|(_, n)| n.data.id.to_string()).collect();
        assert_eq!(chain, vec!["gov-0", "root"]);
    }

    #[test]
    fn given_empty_tree_when_querying_then_nothing() {
        let tree = OrgTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }
}
