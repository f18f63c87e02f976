// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving the extension node around a tree.
//!
//! Every successful move updates the slot's extension node and asks the viewer to
//! recenter on the new node and seek to its depth. Moves that have nowhere to go
//! (parent of the root, first child of a leaf, no branch point) return `Ok(None)`
//! and leave everything as it was.

use arbor_tree::{NeuriteTree, NodeId, VoxelPoint};
use serde::Deserialize;
use tracing::debug;

use crate::error::EditError;
use crate::host::{Notice, Viewer};
use crate::session::{Session, reported};
use crate::store::SnapshotStore;

/// Physical size of a voxel, in micrometres.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Width of one pixel.
    pub pixel_width: f64,
    /// Height of one pixel.
    pub pixel_height: f64,
    /// Distance between adjacent depth planes.
    pub plane_spacing: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_width: 1.0,
            pixel_height: 1.0,
            plane_spacing: 1.0,
        }
    }
}

impl Calibration {
    /// Physical distance between two voxel positions.
    pub fn distance(&self, a: VoxelPoint, b: VoxelPoint) -> f64 {
        let dx = (b.x - a.x) * self.pixel_width;
        let dy = (b.y - a.y) * self.pixel_height;
        let dz = f64::from(b.z - a.z) * self.plane_spacing;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Sum of calibrated edge lengths along `path`, which must be a chain of linked nodes.
pub fn path_length(tree: &NeuriteTree, path: &[NodeId], calibration: &Calibration) -> f64 {
    path.windows(2)
        .filter_map(|w| Some((tree.get(w[0])?.position(), tree.get(w[1])?.position())))
        .map(|(a, b)| calibration.distance(a, b))
        .sum()
}

/// Format a length given in micrometres.
///
/// ```
/// use arbor_editor::format_length;
///
/// assert_eq!(format_length(12.5), "12.50 µm");
/// assert_eq!(format_length(2500.0), "2.500 mm");
/// ```
pub fn format_length(micrometres: f64) -> String {
    if micrometres < 1000.0 {
        format!("{micrometres:.2} µm")
    } else {
        format!("{:.3} mm", micrometres / 1000.0)
    }
}

/// Leaf cycling direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Following leaf, wrapping to the first.
    Next,
    /// Preceding leaf, wrapping to the last.
    Previous,
}

/// Where leaf cycling landed.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafReport {
    /// The new current leaf.
    pub leaf: NodeId,
    /// Nearest ancestor branch point, or the root if there is none.
    pub branch: NodeId,
    /// Path length from `leaf` to `branch`, in micrometres.
    pub length: f64,
}

/// The branch point found by walking up from the extension node.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchReport {
    /// Branch point, or the root if no ancestor branches.
    pub branch: NodeId,
    /// Visited nodes, from the extension node up to and including `branch`.
    pub path: Vec<NodeId>,
    /// Path length in micrometres.
    pub length: f64,
}

/// Walk up from `from` to the first ancestor with two or more children, or the root.
///
/// Returns the visited path including both ends, or `None` if `from` is the root.
pub fn previous_branch(tree: &NeuriteTree, from: NodeId) -> Option<Vec<NodeId>> {
    tree.parent(from)?;
    let mut path = vec![from];
    for id in tree.ancestors(from) {
        path.push(id);
        if tree.is_branch_point(id) {
            break;
        }
    }
    Some(path)
}

/// The nearest branch point below `from` by depth-first descent.
///
/// Children are tried in order; each one's single-child chain is followed until it
/// reaches a branch point (the answer) or a leaf (try the next child).
pub fn next_branch(tree: &NeuriteTree, from: NodeId) -> Option<NodeId> {
    tree.children(from).iter().find_map(|&child| {
        let mut cur = child;
        loop {
            match tree.children(cur) {
                [] => return None,
                [only] => cur = *only,
                _ => return Some(cur),
            }
        }
    })
}

impl<S: SnapshotStore> Session<S> {
    fn nav_start(&self, slot: usize) -> Result<(&NeuriteTree, NodeId), EditError> {
        let s = self.collection.occupied(slot)?;
        let ext = s
            .extension()
            .ok_or(EditError::InvalidSelection { slot })?;
        Ok((&s.tree, ext))
    }

    /// Make `node` the extension node and bring it into view.
    fn focus(&mut self, slot: usize, node: NodeId, host: &mut dyn Viewer) -> Result<NodeId, EditError> {
        let s = self.collection.slot_mut(slot)?;
        let pos = s.tree.node(node)?.position();
        s.extension = Some(node);
        host.recenter(pos.x, pos.y);
        host.seek_depth(pos.z);
        debug!(slot, %node, "extension moved");
        Ok(node)
    }

    /// Jump to the root.
    pub fn go_to_root(&mut self, slot: usize, host: &mut dyn Viewer) -> Result<NodeId, EditError> {
        let root = self.collection.occupied(slot).and_then(|s| {
            s.tree.root().ok_or(EditError::InvalidSelection { slot })
        });
        let out = root.and_then(|root| self.focus(slot, root, host));
        reported(host, out)
    }

    /// Step through the tree's leaves in preorder, wrapping at either end.
    ///
    /// The current leaf is remembered per slot, independently of the extension node.
    /// If it is no longer a leaf, cycling restarts at the first leaf.
    pub fn cycle_leaf(
        &mut self,
        slot: usize,
        direction: Direction,
        host: &mut dyn Viewer,
    ) -> Result<LeafReport, EditError> {
        let out = self.cycle_leaf_inner(slot, direction, host);
        reported(host, out)
    }

    fn cycle_leaf_inner(
        &mut self,
        slot: usize,
        direction: Direction,
        host: &mut dyn Viewer,
    ) -> Result<LeafReport, EditError> {
        let s = self.collection.occupied(slot)?;
        let leaves = s.tree.leaves(None);
        let n = leaves.len();
        let current = s
            .leaf_cursor
            .and_then(|c| leaves.iter().position(|&l| l == c));
        let index = match (current, direction) {
            (None, _) => 0,
            (Some(i), Direction::Next) => (i + 1) % n,
            (Some(i), Direction::Previous) => (i + n - 1) % n,
        };
        let Some(&leaf) = leaves.get(index) else {
            return Err(EditError::InvalidSelection { slot });
        };
        let path = previous_branch(&s.tree, leaf).unwrap_or_else(|| vec![leaf]);
        let branch = path.last().copied().unwrap_or(leaf);
        let length = path_length(&s.tree, &path, &self.config.calibration);

        self.focus(slot, leaf, host)?;
        self.collection.slot_mut(slot)?.leaf_cursor = Some(leaf);
        host.notify(
            Notice::Info,
            &format!("Distance to branch point: {}", format_length(length)),
        );
        Ok(LeafReport { leaf, branch, length })
    }

    /// Move to the extension node's parent.
    pub fn go_to_parent(&mut self, slot: usize, host: &mut dyn Viewer) -> Result<Option<NodeId>, EditError> {
        let out = self.nav_start(slot).map(|(tree, ext)| tree.parent(ext));
        let out = match out {
            Ok(Some(parent)) => self.focus(slot, parent, host).map(Some),
            other => other,
        };
        reported(host, out)
    }

    /// Move to the extension node's first child.
    pub fn go_to_first_child(
        &mut self,
        slot: usize,
        host: &mut dyn Viewer,
    ) -> Result<Option<NodeId>, EditError> {
        let out = self
            .nav_start(slot)
            .map(|(tree, ext)| tree.children(ext).first().copied());
        let out = match out {
            Ok(Some(child)) => self.focus(slot, child, host).map(Some),
            other => other,
        };
        reported(host, out)
    }

    /// Walk up to the nearest ancestor branch point (or the root) and report the path length.
    ///
    /// With `report_only` the extension node stays where it is.
    pub fn go_to_previous_branch(
        &mut self,
        slot: usize,
        report_only: bool,
        host: &mut dyn Viewer,
    ) -> Result<Option<BranchReport>, EditError> {
        let out = self.nav_start(slot).map(|(tree, ext)| {
            previous_branch(tree, ext).map(|path| BranchReport {
                branch: path.last().copied().unwrap_or(ext),
                length: path_length(tree, &path, &self.config.calibration),
                path,
            })
        });
        let out = match out {
            Ok(Some(report)) => {
                host.notify(
                    Notice::Info,
                    &format!("Distance to branch point: {}", format_length(report.length)),
                );
                if report_only {
                    Ok(Some(report))
                } else {
                    self.focus(slot, report.branch, host).map(|_| Some(report))
                }
            }
            other => other,
        };
        reported(host, out)
    }

    /// Move to the nearest descendant branch point, see [`next_branch`].
    pub fn go_to_next_branch(
        &mut self,
        slot: usize,
        host: &mut dyn Viewer,
    ) -> Result<Option<NodeId>, EditError> {
        let out = self
            .nav_start(slot)
            .map(|(tree, ext)| next_branch(tree, ext));
        let out = match out {
            Ok(Some(branch)) => self.focus(slot, branch, host).map(Some),
            other => other,
        };
        reported(host, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::host::testing::RecordingViewer;
    use crate::store::MemoryStore;
    use arbor_tree::NodeData;

    fn add(tree: &mut NeuriteTree, parent: NodeId, x: f64, z: i32) -> NodeId {
        tree.add_child(parent, NodeData::at(VoxelPoint::new(x, 0.0, z)))
            .unwrap()
    }

    /// ```text
    /// r(1) ─ a(2) ─┬─ b(3) ─ c(4)
    ///              └─ d(5) ─┬─ e(6)
    ///                       └─ f(7)
    /// ```
    fn forked() -> NeuriteTree {
        let mut t = NeuriteTree::new();
        let r = add(&mut t, NodeId::ROOT, 0.0, 0);
        let a = add(&mut t, r, 3.0, 0);
        let b = add(&mut t, a, 6.0, 0);
        add(&mut t, b, 9.0, 4);
        let d = add(&mut t, a, 3.0, 1);
        add(&mut t, d, 3.0, 2);
        add(&mut t, d, 4.0, 1);
        t
    }

    fn id(n: u32) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn session(tree: NeuriteTree, extension: NodeId) -> Session<MemoryStore> {
        let mut s = Session::new(EditorConfig::default(), MemoryStore::new());
        s.collection.slot_mut(0).unwrap().replace_tree(tree, Some(extension));
        s
    }

    #[test]
    fn length_and_formatting() {
        let cal = Calibration {
            pixel_width: 0.5,
            pixel_height: 0.5,
            plane_spacing: 2.0,
        };
        let t = forked();
        // b(6,0,0) -> c(9,0,4): dx 1.5 µm, dz 8 µm.
        let len = path_length(&t, &[id(3), id(4)], &cal);
        assert!((len - (1.5_f64.powi(2) + 64.0).sqrt()).abs() < 1e-9);
        assert_eq!(format_length(999.994), "999.99 µm");
        assert_eq!(format_length(1000.0), "1.000 mm");
    }

    #[test]
    fn branch_searches() {
        let t = forked();
        assert_eq!(previous_branch(&t, id(4)), Some(vec![id(4), id(3), id(2)]));
        assert_eq!(previous_branch(&t, id(2)), Some(vec![id(2), id(1)]));
        assert_eq!(previous_branch(&t, NodeId::ROOT), None);
        assert_eq!(next_branch(&t, NodeId::ROOT), Some(id(2)));
        assert_eq!(next_branch(&t, id(4)), None);
    }

    #[test]
    fn next_branch_skips_dead_end_siblings() {
        // The first child's chain ends in a leaf; the branch is under the second child.
        let t = forked();
        assert_eq!(next_branch(&t, id(2)), Some(id(5)));

        // No descendant branch point anywhere.
        let mut chain = NeuriteTree::new();
        let r = add(&mut chain, NodeId::ROOT, 0.0, 0);
        let a = add(&mut chain, r, 1.0, 0);
        add(&mut chain, a, 2.0, 0);
        assert_eq!(next_branch(&chain, r), None);
    }

    #[test]
    fn cycle_leaf_is_cyclic() {
        let mut s = session(forked(), NodeId::ROOT);
        let mut host = RecordingViewer::default();
        let leaves = s.collection().slot(0).unwrap().tree.leaves(None);
        assert_eq!(leaves, vec![id(4), id(6), id(7)]);

        let start = s.cycle_leaf(0, Direction::Next, &mut host).unwrap().leaf;
        assert_eq!(start, id(4));
        for _ in 0..leaves.len() {
            s.cycle_leaf(0, Direction::Next, &mut host).unwrap();
        }
        assert_eq!(s.collection().slot(0).unwrap().extension(), Some(start));

        let next = s.cycle_leaf(0, Direction::Next, &mut host).unwrap().leaf;
        assert_eq!(next, id(6));
        let back = s.cycle_leaf(0, Direction::Previous, &mut host).unwrap().leaf;
        assert_eq!(back, start);
        let wrapped = s.cycle_leaf(0, Direction::Previous, &mut host).unwrap().leaf;
        assert_eq!(wrapped, id(7));
    }

    #[test]
    fn cycle_leaf_reports_distance_and_recenters() {
        let mut s = session(forked(), NodeId::ROOT);
        let mut host = RecordingViewer::default();
        let report = s.cycle_leaf(0, Direction::Previous, &mut host).unwrap();
        // First call starts at the first leaf regardless of direction.
        assert_eq!(report.leaf, id(4));
        assert_eq!(report.branch, id(2));
        assert_eq!(host.centers.last(), Some(&(9.0, 0.0)));
        assert_eq!(host.depths.last(), Some(&4));
        assert!(host.last_message().unwrap().starts_with("Distance to branch point: "));
    }

    #[test]
    fn cycle_leaf_resets_when_leaf_disappears() {
        let mut s = session(forked(), NodeId::ROOT);
        let mut host = RecordingViewer::default();
        s.cycle_leaf(0, Direction::Next, &mut host).unwrap();
        s.cycle_leaf(0, Direction::Next, &mut host).unwrap();
        // Leaf 6 gets a child, so it is no longer a leaf.
        let slot = s.collection.slot_mut(0).unwrap();
        add(&mut slot.tree, id(6), 3.0, 3);
        let report = s.cycle_leaf(0, Direction::Next, &mut host).unwrap();
        assert_eq!(report.leaf, id(4));
    }

    #[test]
    fn parent_child_and_root_moves() {
        let mut s = session(forked(), id(5));
        let mut host = RecordingViewer::default();
        assert_eq!(s.go_to_first_child(0, &mut host).unwrap(), Some(id(6)));
        assert_eq!(s.go_to_first_child(0, &mut host).unwrap(), None);
        assert_eq!(s.go_to_parent(0, &mut host).unwrap(), Some(id(5)));
        assert_eq!(s.go_to_root(0, &mut host).unwrap(), NodeId::ROOT);
        assert_eq!(s.go_to_parent(0, &mut host).unwrap(), None);
        assert_eq!(host.centers.len(), 3);
        assert_eq!(host.errors(), 0);
    }

    #[test]
    fn previous_and_next_branch_moves() {
        let mut s = session(forked(), id(4));
        let mut host = RecordingViewer::default();

        let report = s.go_to_previous_branch(0, true, &mut host).unwrap().unwrap();
        assert_eq!(report.branch, id(2));
        assert_eq!(s.collection().slot(0).unwrap().extension(), Some(id(4)));
        assert!(host.centers.is_empty());

        s.go_to_previous_branch(0, false, &mut host).unwrap();
        assert_eq!(s.collection().slot(0).unwrap().extension(), Some(id(2)));

        assert_eq!(s.go_to_next_branch(0, &mut host).unwrap(), Some(id(5)));
        assert_eq!(s.go_to_next_branch(0, &mut host).unwrap(), None);
        assert_eq!(s.collection().slot(0).unwrap().extension(), Some(id(5)));
    }

    #[test]
    fn empty_slot_is_invalid_selection() {
        let mut s = Session::new(EditorConfig::default(), MemoryStore::new());
        let mut host = RecordingViewer::default();
        assert!(matches!(
            s.go_to_root(0, &mut host),
            Err(EditError::InvalidSelection { slot: 0 })
        ));
        assert!(matches!(
            s.cycle_leaf(42, Direction::Next, &mut host),
            Err(EditError::InvalidSelection { slot: 42 })
        ));
        assert_eq!(host.errors(), 2);
    }
}
