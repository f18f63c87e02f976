// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by structural tree edits.

use crate::types::NodeId;

/// A rejected tree edit. The tree is unchanged whenever one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not refer to a live node.
    #[error("node {0} does not exist")]
    InvalidNode(NodeId),
    /// Branch points cannot be removed directly, only pruned.
    #[error("cannot delete branch point {0}")]
    BranchPoint(NodeId),
    /// The root is fixed for the tree's lifetime.
    #[error("root deletion not supported")]
    RootRemoval,
    /// The requested parent lies inside the subtree being moved.
    #[error("cannot attach {child} below its own descendant {new_parent}")]
    Cycle {
        /// Node being moved.
        child: NodeId,
        /// Requested parent.
        new_parent: NodeId,
    },
    /// Records handed to [`NeuriteTree::from_records`](crate::NeuriteTree::from_records)
    /// do not describe a single rooted tree.
    #[error("malformed tree: {0}")]
    Malformed(&'static str),
}

impl TreeError {
    /// True for edits refused because they would break the tree's shape
    /// (branch-point deletion, root deletion, cycles).
    pub fn is_structural_violation(&self) -> bool {
        matches!(
            self,
            Self::BranchPoint(_) | Self::RootRemoval | Self::Cycle { .. }
        )
    }
}
