// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placing, deleting, moving and reattaching nodes from cursor input.
//!
//! Holding [`Modifiers::STRUCTURAL`] turns an add into a reparent of the extension node
//! and a delete into a prune. Both are preceded by a snapshot of the whole collection.

use arbor_tree::query::{Nearest, find_nearest, nearest_in_plane};
use arbor_tree::{NodeData, NodeId, TreeError, VoxelPoint};
use kurbo::Point;
use tracing::debug;

use crate::error::EditError;
use crate::host::{Modifiers, Viewer};
use crate::session::{Session, reported};
use crate::store::{SnapshotKind, SnapshotStore};

/// What [`Session::add_marker`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new node was placed and became the extension node.
    Added(NodeId),
    /// The extension node was moved below an existing node.
    Reparented {
        /// The moved node.
        child: NodeId,
        /// Its new parent.
        parent: NodeId,
    },
}

/// What [`Session::delete_marker`] removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The node under the cursor.
    pub node: NodeId,
    /// Number of nodes removed (more than one for a prune).
    pub removed: usize,
    /// The new extension node: the removed node's former parent.
    pub extension: NodeId,
}

impl<S: SnapshotStore> Session<S> {
    /// Place a node at `cursor` on plane `depth` below the slot's extension node.
    ///
    /// On an empty slot the node becomes the root. With [`Modifiers::STRUCTURAL`] held and a
    /// node under the cursor, the extension node is reattached below that node instead.
    pub fn add_marker(
        &mut self,
        slot: usize,
        cursor: Point,
        depth: i32,
        modifiers: Modifiers,
        host: &mut dyn Viewer,
    ) -> Result<AddOutcome, EditError> {
        let out = self.add_marker_inner(slot, cursor, depth, modifiers, host);
        reported(host, out)
    }

    fn add_marker_inner(
        &mut self,
        slot: usize,
        cursor: Point,
        depth: i32,
        modifiers: Modifiers,
        host: &mut dyn Viewer,
    ) -> Result<AddOutcome, EditError> {
        let s = self.collection.slot(slot)?;
        if modifiers.is_structural()
            && let Some(child) = s.extension()
            && let Some(target) = find_nearest(&s.tree, cursor, depth, self.config.pick_radius)
        {
            return self.reattach(slot, child, target, cursor, depth, host);
        }

        let s = self.collection.slot_mut(slot)?;
        let parent = s.extension().unwrap_or(NodeId::ROOT);
        let id = s
            .tree
            .add_child(parent, NodeData::at(VoxelPoint::from_xy(cursor, depth)))?;
        s.extension = Some(id);
        let count = s.tree.len();
        self.dirty = true;
        debug!(slot, node = %id, count, "node added");

        if self.config.autosave.due(count) {
            self.try_snapshot(SnapshotKind::Autosave, host);
        }
        Ok(AddOutcome::Added(id))
    }

    fn reattach(
        &mut self,
        slot: usize,
        child: NodeId,
        target: NodeId,
        cursor: Point,
        depth: i32,
        host: &mut dyn Viewer,
    ) -> Result<AddOutcome, EditError> {
        let radius = self.config.pick_radius;
        self.with_snapshot(SnapshotKind::Reparent, slot, host, |s| {
            s.tree.reparent(child, target)?;
            // Highlight whatever is under the cursor now.
            if let Some(hit) = find_nearest(&s.tree, cursor, depth, radius) {
                s.extension = Some(hit);
            }
            Ok(())
        })?;
        debug!(slot, %child, parent = %target, "node reattached");
        Ok(AddOutcome::Reparented {
            child,
            parent: target,
        })
    }

    /// Delete the node nearest to `cursor` on plane `depth`.
    ///
    /// Branch points and the root are refused whatever the modifiers. With
    /// [`Modifiers::STRUCTURAL`] held the node is pruned with its whole subtree, otherwise
    /// only the node goes and its child takes its place. The removed node's parent becomes
    /// the extension node.
    pub fn delete_marker(
        &mut self,
        slot: usize,
        cursor: Point,
        depth: i32,
        modifiers: Modifiers,
        host: &mut dyn Viewer,
    ) -> Result<DeleteOutcome, EditError> {
        let out = self.delete_marker_inner(slot, cursor, depth, modifiers, host);
        reported(host, out)
    }

    fn delete_marker_inner(
        &mut self,
        slot: usize,
        cursor: Point,
        depth: i32,
        modifiers: Modifiers,
        host: &mut dyn Viewer,
    ) -> Result<DeleteOutcome, EditError> {
        let radius = self.config.pick_radius;
        let s = self.collection.occupied(slot)?;
        let node = match nearest_in_plane(&s.tree, cursor, depth, radius) {
            Nearest::Found { node, .. } => node,
            Nearest::OutOfRange => return Err(EditError::NotFound { radius }),
            Nearest::EmptyPlane => return Err(EditError::EmptyPlane { depth }),
        };
        if s.tree.is_branch_point(node) {
            return Err(TreeError::BranchPoint(node).into());
        }
        let Some(parent) = s.tree.parent(node) else {
            return Err(TreeError::RootRemoval.into());
        };

        let removed = if modifiers.is_structural() {
            self.with_snapshot(SnapshotKind::Prune, slot, host, |s| {
                let n = s.tree.prune(node)?;
                s.extension = Some(parent);
                Ok(n)
            })?
        } else {
            let s = self.collection.slot_mut(slot)?;
            s.tree.remove_leaf_or_chain(node)?;
            s.extension = Some(parent);
            self.dirty = true;
            1
        };
        debug!(slot, %node, removed, "node deleted");
        Ok(DeleteOutcome {
            node,
            removed,
            extension: parent,
        })
    }

    /// Move the slot's extension node to `cursor` on plane `depth`.
    pub fn move_marker(
        &mut self,
        slot: usize,
        cursor: Point,
        depth: i32,
        host: &mut dyn Viewer,
    ) -> Result<NodeId, EditError> {
        let out = self.collection.slot_mut(slot).and_then(|s| {
            let ext = s.extension().ok_or(EditError::InvalidSelection { slot })?;
            s.tree.set_position(ext, VoxelPoint::from_xy(cursor, depth))?;
            Ok(ext)
        });
        if out.is_ok() {
            self.dirty = true;
        }
        reported(host, out)
    }
}
