// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition of a tree's edges into unbranched runs.

use alloc::vec;
use alloc::vec::Vec;

use crate::tree::NeuriteTree;
use crate::types::NodeId;

/// A maximal unbranched chain of nodes.
///
/// A segment starts at the root or at a branch point and runs down through
/// single-child nodes until it reaches the next branch point or a leaf.
/// The first node is shared with the segment that ends there (or is the root),
/// so each parent→child edge belongs to exactly one segment.
///
/// A tree consisting of the root alone yields one single-node segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    nodes: Vec<NodeId>,
}

impl Segment {
    /// Nodes from the segment's origin down to its terminal.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The root or branch point the segment hangs from.
    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    /// The branch point or leaf that ends the segment.
    pub fn terminal(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of nodes, origin included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a segment holds at least its origin.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent→child edges covered by this segment.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }
}

impl NeuriteTree {
    /// Split the tree into [`Segment`]s.
    ///
    /// Segments are returned in depth-first order: children are visited in
    /// insertion order and a branch point's segments follow the segment that ends at it.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        let Some(root) = self.root() else {
            return out;
        };
        if self.is_leaf(root) {
            out.push(Segment { nodes: vec![root] });
            return out;
        }
        // (origin, first node after the origin)
        let mut pending: Vec<(NodeId, NodeId)> = self
            .children(root)
            .iter()
            .rev()
            .map(|&c| (root, c))
            .collect();
        while let Some((origin, first)) = pending.pop() {
            let mut nodes = vec![origin, first];
            let mut cur = first;
            while let [only] = self.children(cur) {
                cur = *only;
                nodes.push(cur);
            }
            pending.extend(self.children(cur).iter().rev().map(|&c| (cur, c)));
            out.push(Segment { nodes });
        }
        out
    }
}
