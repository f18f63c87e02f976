// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, structural edits, traversal.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::TreeError;
use crate::types::{BranchType, Classification, NodeData, NodeId, VoxelPoint};

/// A node stored in a [`NeuriteTree`].
#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl Node {
    fn new(parent: Option<NodeId>, data: NodeData) -> Self {
        Self {
            parent,
            children: Vec::new(),
            data,
        }
    }

    /// Parent of this node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position and classification.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Voxel position.
    pub fn position(&self) -> VoxelPoint {
        self.data.position
    }

    /// Classification fields.
    pub fn class(&self) -> &Classification {
        &self.data.class
    }

    /// True if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True if the node has two or more children.
    pub fn is_branch_point(&self) -> bool {
        self.children.len() >= 2
    }
}

/// One neuron: a rooted tree of annotation points.
///
/// Nodes live in an arena and are addressed by [`NodeId`].
/// Parent links are `Option<NodeId>` and child lists keep insertion order,
/// so "first child" is always the child that was created (or attached) first.
///
/// Every mutating method either applies completely or returns a [`TreeError`]
/// and leaves the tree untouched.
#[derive(Clone, Default)]
pub struct NeuriteTree {
    nodes: Vec<Option<Node>>, // slot = id - 1, never reused
    len: usize,
}

impl core::fmt::Debug for NeuriteTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NeuriteTree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len)
            .finish_non_exhaustive()
    }
}

impl NeuriteTree {
    /// Most vacant id slots [`from_records`](Self::from_records) accepts.
    pub const MAX_VACANT_SLOTS: usize = 1 << 20;

    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root, if the tree is non-empty.
    pub fn root(&self) -> Option<NodeId> {
        (!self.is_empty()).then_some(NodeId::ROOT)
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Access a live node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    /// Access a live node, reporting [`TreeError::InvalidNode`] otherwise.
    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::InvalidNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id.slot())
            .and_then(Option::as_mut)
            .ok_or(TreeError::InvalidNode(id))
    }

    /// Iterate live nodes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(slot, n)| n.as_ref().map(|n| (NodeId::from_slot(slot), n)))
    }

    /// Parent of `id`; `None` for the root or a dead id.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Children of `id` in insertion order; empty for a dead id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// True if `id` is live and has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_leaf)
    }

    /// True if `id` is live and has two or more children.
    pub fn is_branch_point(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_branch_point)
    }

    /// Iterate the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Path from `id` up to the root, both inclusive (`id` first).
    ///
    /// Empty if `id` is not live.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        core::iter::once(id).chain(self.ancestors(id)).collect()
    }

    /// True if `node` lies in the subtree rooted at `top` (inclusive).
    pub fn in_subtree(&self, node: NodeId, top: NodeId) -> bool {
        self.contains(node) && (node == top || self.ancestors(node).any(|a| a == top))
    }

    /// True if `node` is a strict descendant of `ancestor`.
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        node != ancestor && self.in_subtree(node, ancestor)
    }

    /// Nodes of the subtree rooted at `top` in depth-first preorder, children in insertion order.
    pub fn subtree(&self, top: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(top) {
            return out;
        }
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Leaves below `from` (or of the whole tree) in depth-first preorder.
    ///
    /// This is the fixed enumeration order used for leaf cycling.
    pub fn leaves(&self, from: Option<NodeId>) -> Vec<NodeId> {
        let Some(top) = from.or(self.root()) else {
            return Vec::new();
        };
        self.subtree(top)
            .into_iter()
            .filter(|&id| self.is_leaf(id))
            .collect()
    }

    /// Append a node as the last child of `parent` and return its id.
    ///
    /// On an empty tree `parent` is ignored: the node becomes the root
    /// ([`NodeId::ROOT`]) and its branch type is set to [`BranchType::Soma`].
    pub fn add_child(&mut self, parent: NodeId, mut data: NodeData) -> Result<NodeId, TreeError> {
        if self.is_empty() {
            self.nodes.clear();
            data.class.branch_type = BranchType::Soma;
            self.nodes.push(Some(Node::new(None, data)));
            self.len = 1;
            return Ok(NodeId::ROOT);
        }
        self.node(parent)?;
        let id = NodeId::from_slot(self.nodes.len());
        self.nodes.push(Some(Node::new(Some(parent), data)));
        self.node_mut(parent)?.children.push(id);
        self.len += 1;
        Ok(id)
    }

    /// Remove a node that is not a branch point.
    ///
    /// Its single child (if any) takes its place in the parent's child list,
    /// so sibling order is preserved.
    pub fn remove_leaf_or_chain(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if node.is_branch_point() {
            return Err(TreeError::BranchPoint(id));
        }
        let Some(parent) = node.parent else {
            return Err(TreeError::RootRemoval);
        };
        let child = node.children.first().copied();
        let siblings = &mut self.node_mut(parent)?.children;
        let Some(pos) = siblings.iter().position(|&c| c == id) else {
            return Err(TreeError::Malformed("child missing from parent"));
        };
        match child {
            Some(c) => siblings[pos] = c,
            None => {
                siblings.remove(pos);
            }
        }
        if let Some(c) = child {
            self.node_mut(c)?.parent = Some(parent);
        }
        self.vacate(id);
        Ok(())
    }

    /// Remove `id` and its whole subtree, returning how many nodes were removed.
    pub fn prune(&mut self, id: NodeId) -> Result<usize, TreeError> {
        let Some(parent) = self.node(id)?.parent else {
            return Err(TreeError::RootRemoval);
        };
        let doomed = self.subtree(id);
        self.unlink_parent(id, parent)?;
        for &d in &doomed {
            self.vacate(d);
        }
        Ok(doomed.len())
    }

    /// Move `child` (with its subtree) to the end of `new_parent`'s child list.
    ///
    /// Fails with [`TreeError::Cycle`] if `new_parent` is `child` or one of its descendants.
    /// This also rejects moving the root, since every node descends from it.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        self.node(child)?;
        self.node(new_parent)?;
        if self.in_subtree(new_parent, child) {
            return Err(TreeError::Cycle { child, new_parent });
        }
        let Some(old_parent) = self.parent(child) else {
            return Err(TreeError::Malformed("non-root node without parent"));
        };
        self.unlink_parent(child, old_parent)?;
        self.link_parent(child, new_parent)
    }

    /// Remove every node. The next [`add_child`](Self::add_child) creates a fresh root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.len = 0;
    }

    /// Move a node without touching the structure.
    pub fn set_position(&mut self, id: NodeId, position: VoxelPoint) -> Result<(), TreeError> {
        self.node_mut(id)?.data.position = position;
        Ok(())
    }

    /// Replace a node's classification.
    pub fn set_classification(
        &mut self,
        id: NodeId,
        class: Classification,
    ) -> Result<(), TreeError> {
        self.node_mut(id)?.data.class = class;
        Ok(())
    }

    /// Rebuild a tree from `(id, parent, data)` records.
    ///
    /// Children are attached in record order, so records written in preorder (see
    /// [`subtree`](Self::subtree)) restore every child list exactly. The records must
    /// describe exactly one tree rooted at [`NodeId::ROOT`]; ids are kept as given.
    ///
    /// Ids may leave gaps where nodes were removed, but at most
    /// [`MAX_VACANT_SLOTS`](Self::MAX_VACANT_SLOTS) of them.
    pub fn from_records<I>(records: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (NodeId, Option<NodeId>, NodeData)>,
    {
        let records: Vec<_> = records.into_iter().collect();
        let slots = records.iter().map(|(id, ..)| id.slot() + 1).max().unwrap_or(0);
        if slots > records.len().saturating_add(Self::MAX_VACANT_SLOTS) {
            return Err(TreeError::Malformed("node id out of range"));
        }
        let mut tree = Self::new();
        tree.nodes.resize_with(slots, || None);
        let mut links = Vec::new();
        for (id, parent, data) in records {
            if tree.nodes[id.slot()].is_some() {
                return Err(TreeError::Malformed("duplicate node id"));
            }
            match parent {
                None if id != NodeId::ROOT => return Err(TreeError::Malformed("root must be node 1")),
                Some(p) if p == id => return Err(TreeError::Malformed("node is its own parent")),
                _ => {}
            }
            tree.nodes[id.slot()] = Some(Node::new(parent, data));
            tree.len += 1;
            links.extend(parent.map(|p| (p, id)));
        }
        for (parent, child) in links {
            tree.node_mut(parent)
                .map_err(|_| TreeError::Malformed("dangling parent"))?
                .children
                .push(child);
        }
        tree.validate()?;
        Ok(tree)
    }

    /// Check the structural invariants: exactly one root at [`NodeId::ROOT`],
    /// consistent parent/child links, and every node reachable from the root (no cycles).
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root() else {
            return if self.nodes.iter().all(Option::is_none) {
                Ok(())
            } else {
                Err(TreeError::Malformed("live nodes in an empty tree"))
            };
        };
        if self.node(root)?.parent.is_some() {
            return Err(TreeError::Malformed("root has a parent"));
        }
        for (id, node) in self.iter() {
            match node.parent {
                None if id != root => return Err(TreeError::Malformed("multiple roots")),
                Some(p) => {
                    let n = self.children(p).iter().filter(|&&c| c == id).count();
                    if n != 1 {
                        return Err(TreeError::Malformed("parent does not list child exactly once"));
                    }
                }
                None => {}
            }
            if node.children.iter().any(|&c| self.parent(c) != Some(id)) {
                return Err(TreeError::Malformed("child does not point back to parent"));
            }
        }
        // Walk down from the root; a cycle or a detached component leaves nodes unvisited.
        let mut seen = 0_usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            seen += 1;
            if seen > self.len {
                return Err(TreeError::Malformed("cycle"));
            }
            stack.extend_from_slice(self.children(id));
        }
        if seen != self.len {
            return Err(TreeError::Malformed("nodes unreachable from root"));
        }
        Ok(())
    }

    // --- internals ---

    fn link_parent(&mut self, id: NodeId, parent: NodeId) -> Result<(), TreeError> {
        self.node_mut(parent)?.children.push(id);
        self.node_mut(id)?.parent = Some(parent);
        Ok(())
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) -> Result<(), TreeError> {
        self.node_mut(parent)?.children.retain(|c| *c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn vacate(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.slot())
            && slot.take().is_some()
        {
            self.len -= 1;
        }
    }
}

/// Iterator over the strict ancestors of a node, nearest first.
///
/// Returned by [`NeuriteTree::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a NeuriteTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeType;

    fn at(x: f64, y: f64, z: i32) -> NodeData {
        NodeData::at(VoxelPoint::new(x, y, z))
    }

    /// root ─ a ─ b
    ///          └ c ─ d
    fn forked() -> (NeuriteTree, [NodeId; 5]) {
        let mut tree = NeuriteTree::new();
        let root = tree.add_child(NodeId::ROOT, at(0.0, 0.0, 0)).unwrap();
        let a = tree.add_child(root, at(1.0, 0.0, 0)).unwrap();
        let b = tree.add_child(a, at(2.0, 0.0, 0)).unwrap();
        let c = tree.add_child(a, at(2.0, 1.0, 0)).unwrap();
        let d = tree.add_child(c, at(3.0, 1.0, 0)).unwrap();
        (tree, [root, a, b, c, d])
    }

    #[test]
    fn first_node_becomes_soma_root() {
        let mut tree = NeuriteTree::new();
        let bogus = NodeId::new(42).unwrap();
        let mut data = at(5.0, 5.0, 3);
        data.class.node_type = NodeType::BRIGHT;
        let root = tree.add_child(bogus, data).unwrap();
        assert_eq!(root, NodeId::ROOT);
        assert_eq!(tree.root(), Some(root));
        let node = tree.get(root).unwrap();
        assert_eq!(node.class().branch_type, BranchType::Soma);
        assert_eq!(node.class().node_type, NodeType::BRIGHT);
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn add_child_rejects_dead_parent() {
        let (mut tree, _) = forked();
        let before = tree.len();
        let bogus = NodeId::new(99).unwrap();
        assert_eq!(
            tree.add_child(bogus, at(0.0, 0.0, 0)),
            Err(TreeError::InvalidNode(bogus))
        );
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn children_keep_insertion_order() {
        let (tree, [_, a, b, c, _]) = forked();
        assert_eq!(tree.children(a), &[b, c]);
        assert!(tree.is_branch_point(a));
        assert!(tree.is_leaf(b));
    }

    #[test]
    fn remove_chain_node_relinks_child_in_place() {
        let (mut tree, [_, a, b, c, d]) = forked();
        tree.remove_leaf_or_chain(c).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.children(a), &[b, d], "d takes c's slot");
        assert_eq!(tree.parent(d), Some(a));
        assert!(!tree.contains(c));
        tree.validate().unwrap();
    }

    #[test]
    fn remove_refuses_branch_points_and_root() {
        let (mut tree, [root, a, ..]) = forked();
        assert_eq!(tree.remove_leaf_or_chain(a), Err(TreeError::BranchPoint(a)));
        assert_eq!(tree.remove_leaf_or_chain(root), Err(TreeError::RootRemoval));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn prune_removes_subtree() {
        let (mut tree, [root, a, ..]) = forked();
        assert_eq!(tree.prune(root), Err(TreeError::RootRemoval));
        assert_eq!(tree.prune(a), Ok(4));
        assert_eq!(tree.len(), 1);
        assert!(tree.is_leaf(root));
        tree.validate().unwrap();
    }

    #[test]
    fn ids_are_not_reused() {
        let (mut tree, [_, a, b, ..]) = forked();
        tree.remove_leaf_or_chain(b).unwrap();
        let e = tree.add_child(a, at(9.0, 9.0, 0)).unwrap();
        assert_ne!(e, b);
        assert!(!tree.contains(b));
        assert_eq!(e.get(), 6);
    }

    #[test]
    fn reparent_moves_subtree() {
        let (mut tree, [root, a, b, c, d]) = forked();
        tree.reparent(c, root).unwrap();
        assert_eq!(tree.children(root), &[a, c]);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.children(c), &[d], "subtree shape unchanged");
        assert_eq!(tree.len(), 5);
        tree.validate().unwrap();
    }

    #[test]
    fn reparent_rejects_cycles() {
        let (mut tree, [root, a, _, c, d]) = forked();
        assert_eq!(
            tree.reparent(a, d),
            Err(TreeError::Cycle {
                child: a,
                new_parent: d
            })
        );
        assert!(matches!(tree.reparent(c, c), Err(TreeError::Cycle { .. })));
        assert!(matches!(tree.reparent(root, d), Err(TreeError::Cycle { .. })));
        assert_eq!(tree.parent(c), Some(a));
        tree.validate().unwrap();
    }

    #[test]
    fn path_and_leaves() {
        let (tree, [root, a, b, c, d]) = forked();
        assert_eq!(tree.path_to_root(d), vec![d, c, a, root]);
        assert_eq!(tree.leaves(None), vec![b, d]);
        assert_eq!(tree.leaves(Some(c)), vec![d]);
        assert!(tree.is_descendant(d, a));
        assert!(!tree.is_descendant(a, a));
    }

    #[test]
    fn records_round_trip_keeps_ids() {
        let (mut tree, [_, _, b, ..]) = forked();
        tree.remove_leaf_or_chain(b).unwrap();
        let records: Vec<_> = tree
            .iter()
            .map(|(id, n)| (id, n.parent(), n.data().clone()))
            .collect();
        let rebuilt = NeuriteTree::from_records(records).unwrap();
        assert_eq!(rebuilt.len(), tree.len());
        for (id, node) in tree.iter() {
            assert_eq!(rebuilt.children(id), node.children());
        }
        assert!(!rebuilt.contains(b));
    }

    #[test]
    fn records_reject_bad_shapes() {
        let one = NodeId::new(1).unwrap();
        let two = NodeId::new(2).unwrap();
        let three = NodeId::new(3).unwrap();
        let cyc = [
            (one, None, at(0.0, 0.0, 0)),
            (two, Some(three), at(0.0, 0.0, 0)),
            (three, Some(two), at(0.0, 0.0, 0)),
        ];
        assert!(matches!(
            NeuriteTree::from_records(cyc),
            Err(TreeError::Malformed(_))
        ));
        let dangling = [(one, None, at(0.0, 0.0, 0)), (two, Some(three), at(0.0, 0.0, 0))];
        assert_eq!(
            NeuriteTree::from_records(dangling).unwrap_err(),
            TreeError::Malformed("dangling parent")
        );
        let rootless = [(two, None, at(0.0, 0.0, 0))];
        assert!(NeuriteTree::from_records(rootless).is_err());
    }

    #[test]
    fn records_reject_ids_far_past_the_node_count() {
        let huge = NodeId::new(4_000_000_000).unwrap();
        let records = [(NodeId::ROOT, None, at(0.0, 0.0, 0)), (huge, Some(NodeId::ROOT), at(1.0, 0.0, 0))];
        assert_eq!(
            NeuriteTree::from_records(records).unwrap_err(),
            TreeError::Malformed("node id out of range")
        );

        // Gaps left by deletions are fine.
        let sparse = NodeId::new(1000).unwrap();
        let records = [(NodeId::ROOT, None, at(0.0, 0.0, 0)), (sparse, Some(NodeId::ROOT), at(1.0, 0.0, 0))];
        let tree = NeuriteTree::from_records(records).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[sparse]);
    }

    #[test]
    fn preorder_records_keep_sibling_order() {
        let (mut tree, [root, a, _, c, _]) = forked();
        // Reattaching moves a child to the end, so sibling order stops matching id order.
        tree.reparent(c, root).unwrap();
        assert_eq!(tree.children(root), &[a, c]);
        tree.reparent(a, root).unwrap();
        assert_eq!(tree.children(root), &[c, a]);

        let records: Vec<_> = tree
            .subtree(root)
            .into_iter()
            .map(|id| {
                let n = tree.get(id).unwrap();
                (id, n.parent(), n.data().clone())
            })
            .collect();
        let rebuilt = NeuriteTree::from_records(records).unwrap();
        for (id, node) in tree.iter() {
            assert_eq!(rebuilt.children(id), node.children());
        }
    }
}
