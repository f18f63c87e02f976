// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-node search on a single depth plane.
//!
//! Candidates are restricted to nodes lying exactly on the requested plane;
//! distance is measured in the XY plane only.

use kurbo::Point;

use crate::tree::NeuriteTree;
use crate::types::NodeId;

/// Result of [`nearest_in_plane`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Nearest {
    /// The closest node lies strictly within the requested distance.
    Found {
        /// The matched node.
        node: NodeId,
        /// XY distance from the cursor.
        distance: f64,
    },
    /// The plane has nodes, but none strictly within the requested distance.
    OutOfRange,
    /// No node lies on the plane.
    EmptyPlane,
}

impl Nearest {
    /// The matched node, if any.
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Found { node, .. } => Some(node),
            Self::OutOfRange | Self::EmptyPlane => None,
        }
    }
}

/// Find the node on plane `depth` closest to `cursor`.
///
/// Returns [`Nearest::Found`] only if the closest distance is `< max_distance`.
/// Equal distances resolve to the lowest [`NodeId`].
pub fn nearest_in_plane(tree: &NeuriteTree, cursor: Point, depth: i32, max_distance: f64) -> Nearest {
    let mut best: Option<(NodeId, f64)> = None;
    for (id, node) in tree.iter() {
        let pos = node.position();
        if pos.z != depth {
            continue;
        }
        let d = pos.xy().distance(cursor);
        // Ids come in ascending order, so strict `<` keeps the lowest id on ties.
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((id, d));
        }
    }
    match best {
        None => Nearest::EmptyPlane,
        Some((node, distance)) if distance < max_distance => Nearest::Found { node, distance },
        Some(_) => Nearest::OutOfRange,
    }
}

/// Convenience form of [`nearest_in_plane`] that only reports the matched node.
pub fn find_nearest(tree: &NeuriteTree, cursor: Point, depth: i32, max_distance: f64) -> Option<NodeId> {
    nearest_in_plane(tree, cursor, depth, max_distance).node()
}
