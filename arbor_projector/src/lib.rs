// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Projector: slices a neurite tree by the active depth plane.
//!
//! A tracer shows a volume one plane at a time. Drawing only the nodes that lie exactly on the
//! plane loses the continuity of a neurite that dives in and out of it, so this crate produces
//! a windowed view instead:
//!
//! - Nodes within a depth window around the plane are drawn, with marker sizes that fall off
//!   with depth distance.
//! - Nodes outside the window become gaps, so polylines break instead of interpolating.
//! - Where a visible run meets an out-of-window neighbour, a [`Stub`] points toward it,
//!   styled by whether the neighbour lies deeper or shallower, with a `Z:<depth>` label when
//!   its position is on screen.
//! - Leaves, the root, nodes on the plane, and the extension node get [`MarkerFlags`].
//!
//! The output is geometry and styling only; rasterization is left to the host.
//!
//! ## Minimal usage
//!
//! ```
//! use arbor_projector::{PlaneProjector, ViewParams, StubKind};
//! use arbor_tree::{NeuriteTree, NodeData, NodeId, VoxelPoint};
//! use kurbo::Rect;
//!
//! let mut tree = NeuriteTree::new();
//! let r = tree.add_child(NodeId::ROOT, NodeData::at(VoxelPoint::new(0.0, 0.0, 0))).unwrap();
//! let a = tree.add_child(r, NodeData::at(VoxelPoint::new(1.0, 1.0, 0))).unwrap();
//! let b = tree.add_child(a, NodeData::at(VoxelPoint::new(2.0, 2.0, 5))).unwrap();
//!
//! let view = ViewParams::new(0, 2.0, Rect::new(0.0, 0.0, 64.0, 64.0));
//! let projection = PlaneProjector::new(view).project(&tree, Some(a));
//!
//! let stub = projection.stubs().next().unwrap();
//! assert_eq!((stub.from, stub.to, stub.kind), (a, b, StubKind::Farther));
//! assert_eq!(stub.label.unwrap().to_string(), "Z:5");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod projector;
mod types;

pub use projector::PlaneProjector;
pub use types::{
    DepthLabel, MarkerFlags, MarkerSizing, ProjectedSegment, ProjectedVertex, Projection, Stub,
    StubKind, ViewParams,
};
