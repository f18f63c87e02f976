// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity set of independent tree slots.

use arbor_tree::{NeuriteTree, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Opaque RGBA color of a marker type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Colors assigned to fresh slots, cycled when there are more slots than entries.
pub const PALETTE: [Color; 6] = [
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0x80, 0xff),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x00, 0xff, 0xff),
];

/// Name and color shared by every node of one tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerType {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: Color,
}

impl MarkerType {
    /// Default marker type for slot `index`.
    pub fn for_slot(index: usize) -> Self {
        Self {
            name: format!("Type {}", index + 1),
            color: PALETTE[index % PALETTE.len()],
        }
    }
}

/// One slot of a [`TreeCollection`].
#[derive(Clone, Debug)]
pub struct TreeSlot {
    /// The neuron traced in this slot. Empty means nothing is drawn.
    pub tree: NeuriteTree,
    /// Name and color of this slot's nodes.
    pub marker: MarkerType,
    /// Whether the host should draw this slot.
    pub visible: bool,
    pub(crate) extension: Option<NodeId>,
    pub(crate) leaf_cursor: Option<NodeId>,
}

impl TreeSlot {
    /// A fresh, empty slot with the default marker type for `index`.
    pub(crate) fn new(index: usize) -> Self {
        Self {
            tree: NeuriteTree::new(),
            marker: MarkerType::for_slot(index),
            visible: true,
            extension: None,
            leaf_cursor: None,
        }
    }

    /// The active editing cursor: new nodes attach below it.
    ///
    /// Always a live node of [`tree`](Self::tree), or `None` if the tree is empty.
    pub fn extension(&self) -> Option<NodeId> {
        self.extension.filter(|&e| self.tree.contains(e))
    }

    /// Replace the tree, pointing the extension node at its root.
    pub(crate) fn replace_tree(&mut self, tree: NeuriteTree, extension: Option<NodeId>) {
        self.extension = extension
            .filter(|&e| tree.contains(e))
            .or(tree.root());
        self.tree = tree;
        self.leaf_cursor = None;
    }

    /// Empty the slot's tree.
    pub(crate) fn clear(&mut self) {
        self.tree.clear();
        self.extension = None;
        self.leaf_cursor = None;
    }
}

/// Ordered, fixed-capacity set of tree slots.
///
/// The capacity only grows (for example when importing a file with more trees).
#[derive(Clone, Debug)]
pub struct TreeCollection {
    slots: Vec<TreeSlot>,
}

impl Default for TreeCollection {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_CAPACITY)
    }
}

impl TreeCollection {
    /// A collection of `capacity` empty slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(TreeSlot::new).collect(),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Add empty slots until there are at least `capacity`.
    pub fn grow_to(&mut self, capacity: usize) {
        let start = self.slots.len();
        self.slots.extend((start..capacity).map(TreeSlot::new));
    }

    /// Access a slot.
    pub fn slot(&self, index: usize) -> Result<&TreeSlot, EditError> {
        self.slots
            .get(index)
            .ok_or(EditError::InvalidSelection { slot: index })
    }

    /// Access a slot mutably.
    pub fn slot_mut(&mut self, index: usize) -> Result<&mut TreeSlot, EditError> {
        self.slots
            .get_mut(index)
            .ok_or(EditError::InvalidSelection { slot: index })
    }

    /// Access a slot whose tree is non-empty.
    pub fn occupied(&self, index: usize) -> Result<&TreeSlot, EditError> {
        self.slot(index)
            .ok()
            .filter(|s| !s.tree.is_empty())
            .ok_or(EditError::InvalidSelection { slot: index })
    }

    /// Iterate `(index, slot)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TreeSlot)> + '_ {
        self.slots.iter().enumerate()
    }

    /// Node count per slot, in slot order.
    pub fn counts(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.tree.len()).collect()
    }

    /// Total node count across slots.
    pub fn node_count(&self) -> usize {
        self.slots.iter().map(|s| s.tree.len()).sum()
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [TreeSlot] {
        &mut self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_six_distinct_slots() {
        let c = TreeCollection::default();
        assert_eq!(c.capacity(), 6);
        assert_eq!(c.slot(0).unwrap().marker.name, "Type 1");
        assert_ne!(c.slot(0).unwrap().marker.color, c.slot(1).unwrap().marker.color);
        assert!(matches!(
            c.slot(6),
            Err(EditError::InvalidSelection { slot: 6 })
        ));
        assert!(c.occupied(0).is_err(), "empty tree is not a selection");
    }

    #[test]
    fn grow_only_adds() {
        let mut c = TreeCollection::with_capacity(2);
        c.grow_to(1);
        assert_eq!(c.capacity(), 2);
        c.grow_to(8);
        assert_eq!(c.capacity(), 8);
        assert_eq!(c.slot(7).unwrap().marker.color, PALETTE[1]);
        assert_eq!(c.counts(), vec![0; 8]);
    }
}
