// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Tree: arena-backed neurite trees for manual neuron tracing.
//!
//! Arbor Tree is the data model behind an interactive tracer that places connected 3-D points
//! inside a volumetric image, one depth plane at a time.
//!
//! - Represents one neuron as a rooted tree of annotation points with stable [`NodeId`]s.
//! - Provides the structural edits an annotator needs (add, remove, prune, reparent),
//!   each of which either applies completely or fails with a [`TreeError`] and leaves the tree untouched.
//! - Splits a tree into unbranched [`Segment`]s for drawing.
//! - Finds the node nearest to a cursor on a single depth plane ([`query`]).
//!
//! ## Invariants
//!
//! A non-empty tree has exactly one root, [`NodeId::ROOT`], which stays the root for the
//! tree's lifetime. Every other node has exactly one parent and there are no cycles.
//! Child lists keep insertion order; "first child" always means the oldest attached child.
//! [`NeuriteTree::validate`] checks all of this and is used when rebuilding from records.
//!
//! ## API overview
//!
//! - [`NeuriteTree`]: the arena and its edits.
//! - [`NodeData`]: per-node payload ([`VoxelPoint`] position and [`Classification`]).
//! - [`Classification`]: free-form [`NodeType`], [`BranchType`], and [`ClassCaps`] capabilities.
//! - [`Segment`]: a maximal unbranched run.
//! - [`query::nearest_in_plane`] / [`query::find_nearest`]: in-plane proximity search.
//!
//! ## Minimal usage
//!
//! ```
//! use arbor_tree::{NeuriteTree, NodeData, NodeId, VoxelPoint};
//! use arbor_tree::query::find_nearest;
//! use kurbo::Point;
//!
//! let mut tree = NeuriteTree::new();
//! let soma = tree.add_child(NodeId::ROOT, NodeData::at(VoxelPoint::new(10.0, 10.0, 4))).unwrap();
//! let a = tree.add_child(soma, NodeData::at(VoxelPoint::new(20.0, 12.0, 4))).unwrap();
//! let b = tree.add_child(soma, NodeData::at(VoxelPoint::new(5.0, 25.0, 5))).unwrap();
//!
//! assert!(tree.is_branch_point(soma));
//! assert_eq!(tree.leaves(None), vec![a, b]);
//! assert_eq!(tree.segments().len(), 2);
//!
//! // Only plane 4 is searched, so `b` is never a candidate here.
//! assert_eq!(find_nearest(&tree, Point::new(19.0, 12.0), 4, 5.0), Some(a));
//!
//! // Cycles are rejected.
//! assert!(tree.reparent(soma, a).is_err());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
pub mod query;
mod segment;
mod tree;
mod types;

pub use error::TreeError;
pub use segment::Segment;
pub use tree::{Ancestors, NeuriteTree, Node};
pub use types::{BranchType, ClassCaps, Classification, NodeData, NodeId, NodeType, VoxelPoint};
