// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for neurite trees: node identifiers, positions, and classification data.

use alloc::borrow::Cow;
use core::fmt;
use core::num::NonZeroU32;

use kurbo::Point;

/// Identifier for a node in a [`NeuriteTree`](crate::NeuriteTree).
///
/// This is a small, copyable handle that stays stable across edits.
///
/// ## Semantics
///
/// - The first node of a tree is always [`NodeId::ROOT`] (index `1`).
/// - Every later insert receives the next unused index.
/// - Removing a node vacates its index; the index is never handed out again by the same tree.
///   A stale `NodeId` therefore never aliases a different live node.
/// - Rebuilding a tree from persisted records keeps the persisted indices.
///
/// Use [`NeuriteTree::contains`](crate::NeuriteTree::contains) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// The root of every non-empty tree.
    pub const ROOT: Self = Self(NonZeroU32::MIN);

    /// Build an id from its raw index. Returns `None` for `0`.
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// The raw index (`1` for the root).
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Arena slot of this id.
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node ids are 32-bit; a tree never holds more than u32::MAX nodes."
    )]
    pub(crate) fn from_slot(slot: usize) -> Self {
        Self(NonZeroU32::MIN.saturating_add(slot as u32))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.get())
    }
}

/// Position of a node in voxel coordinates.
///
/// `x` and `y` are continuous; `z` is the index of the depth plane the node was placed on.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Depth plane.
    pub z: i32,
}

impl VoxelPoint {
    /// Create a point from its components.
    pub const fn new(x: f64, y: f64, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Create a point from a plane-local position and a depth.
    pub const fn from_xy(xy: Point, z: i32) -> Self {
        Self::new(xy.x, xy.y, z)
    }

    /// The in-plane projection of this point.
    pub const fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Neurite compartment a node belongs to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BranchType {
    /// Not classified yet.
    #[default]
    Unset,
    /// Axonal arbor.
    Axon,
    /// Dendritic arbor.
    Dendrite,
    /// Cell body. Assigned to the root on creation.
    Soma,
}

impl BranchType {
    /// Lowercase name of the variant.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Axon => "axon",
            Self::Dendrite => "dendrite",
            Self::Soma => "soma",
        }
    }
}

/// Free-form node label.
///
/// The labels the annotation tool ships with are available as constants,
/// see [`NodeType::DEFAULTS`]; any other label is accepted as well.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeType(Cow<'static, str>);

impl NodeType {
    /// Regular traced point.
    pub const NORMAL: Self = Self::from_static("normal");
    /// Immature process.
    pub const PREMATURE: Self = Self::from_static("premature");
    /// Signal fading out.
    pub const FADING: Self = Self::from_static("fading");
    /// Unusually bright point.
    pub const BRIGHT: Self = Self::from_static("bright");
    /// Callosal projection.
    pub const CALLOSAL: Self = Self::from_static("callosal");
    /// Synaptic bouton.
    pub const BOUTON: Self = Self::from_static("bouton");

    /// The built-in label set, in menu order.
    pub const DEFAULTS: [Self; 6] = [
        Self::NORMAL,
        Self::PREMATURE,
        Self::FADING,
        Self::BRIGHT,
        Self::CALLOSAL,
        Self::BOUTON,
    ];

    /// A label backed by a static string.
    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    /// A user-defined label.
    pub fn custom(label: impl Into<alloc::string::String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeType {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

bitflags::bitflags! {
    /// Capabilities attached to a node's classification.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ClassCaps: u8 {
        /// The node type and branch type may be edited by the user.
        const EDITABLE = 0b0000_0001;
    }
}

impl Default for ClassCaps {
    fn default() -> Self {
        Self::EDITABLE
    }
}

/// Classification data carried by every node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Classification {
    /// Free-form label.
    pub node_type: NodeType,
    /// Neurite compartment.
    pub branch_type: BranchType,
    /// What the user may do with this classification.
    pub caps: ClassCaps,
}

impl Classification {
    /// True if the classification may be edited.
    pub fn is_editable(&self) -> bool {
        self.caps.contains(ClassCaps::EDITABLE)
    }
}

/// Per-node payload: where the node is and how it is classified.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeData {
    /// Voxel position.
    pub position: VoxelPoint,
    /// Classification fields.
    pub class: Classification,
}

impl NodeData {
    /// A `normal`, unset-branch node at `position`.
    pub fn at(position: VoxelPoint) -> Self {
        Self {
            position,
            class: Classification::default(),
        }
    }
}
