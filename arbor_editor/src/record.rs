// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializable form of a [`TreeCollection`].
//!
//! Each tree is stored as a flat node list with parent links, written in preorder so
//! that child order survives a reload. Node ids are kept, so a reloaded tree addresses
//! its nodes exactly as before.

use arbor_tree::{BranchType, ClassCaps, Classification, NeuriteTree, NodeData, NodeId, NodeType, VoxelPoint};
use serde::{Deserialize, Serialize};

use crate::collection::{MarkerType, TreeCollection};
use crate::error::PersistError;

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// One node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id.
    pub id: NodeId,
    /// Parent id; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Horizontal voxel coordinate.
    pub x: f64,
    /// Vertical voxel coordinate.
    pub y: f64,
    /// Depth plane.
    pub z: i32,
    /// Free-form label.
    pub node_type: NodeType,
    /// Neurite compartment.
    pub branch_type: BranchType,
    /// Classification capabilities.
    #[serde(default)]
    pub caps: ClassCaps,
}

/// One occupied slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Slot name and color.
    pub marker: MarkerType,
    /// Whether the slot is drawn.
    pub visible: bool,
    /// The slot's extension node.
    pub extension: Option<NodeId>,
    /// Nodes in depth-first preorder. Siblings appear in child-list order, which is how
    /// loading restores it.
    pub nodes: Vec<NodeRecord>,
}

/// A whole collection; empty slots are `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// Format version, see [`FORMAT_VERSION`].
    pub version: u32,
    /// One entry per slot.
    pub slots: Vec<Option<TreeRecord>>,
}

impl CollectionRecord {
    /// Capture the current state of `collection`.
    pub fn capture(collection: &TreeCollection) -> Self {
        let slots = collection
            .iter()
            .map(|(_, slot)| {
                (!slot.tree.is_empty()).then(|| TreeRecord {
                    marker: slot.marker.clone(),
                    visible: slot.visible,
                    extension: slot.extension(),
                    nodes: slot
                        .tree
                        .root()
                        .map(|root| slot.tree.subtree(root))
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|id| slot.tree.get(id).map(|node| (id, node)))
                        .map(|(id, node)| {
                            let pos = node.position();
                            let class = node.class();
                            NodeRecord {
                                id,
                                parent: node.parent(),
                                x: pos.x,
                                y: pos.y,
                                z: pos.z,
                                node_type: class.node_type.clone(),
                                branch_type: class.branch_type,
                                caps: class.caps,
                            }
                        })
                        .collect(),
                })
            })
            .collect();
        Self {
            version: FORMAT_VERSION,
            slots,
        }
    }

    /// Rebuild trees from this record, validating every one of them.
    ///
    /// Returns `(slot index, record, tree)` for each occupied slot.
    pub(crate) fn rebuild(&self) -> Result<Vec<(usize, &TreeRecord, NeuriteTree)>, PersistError> {
        if self.version != FORMAT_VERSION {
            return Err(PersistError::Version(self.version));
        }
        let mut out = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(record) = slot else {
                continue;
            };
            let tree = NeuriteTree::from_records(record.nodes.iter().map(|n| {
                let data = NodeData {
                    position: VoxelPoint::new(n.x, n.y, n.z),
                    class: Classification {
                        node_type: n.node_type.clone(),
                        branch_type: n.branch_type,
                        caps: n.caps,
                    },
                };
                (n.id, n.parent, data)
            }))
            .map_err(PersistError::Malformed)?;
            out.push((index, record, tree));
        }
        Ok(out)
    }

    /// Number of nodes across all slots.
    pub fn node_count(&self) -> usize {
        self.slots.iter().flatten().map(|t| t.nodes.len()).sum()
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }
}
