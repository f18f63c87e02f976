// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plane projection.
//!
//! Project a neurite that dives out of the active plane and print what a renderer would draw.
//!
//! Run:
//! - `cargo run -p arbor_demos --example plane_projection`

use arbor_projector::{MarkerFlags, PlaneProjector, StubKind, ViewParams};
use arbor_tree::{NeuriteTree, NodeData, NodeId, VoxelPoint};
use kurbo::{Affine, Rect};

fn main() {
    let mut tree = NeuriteTree::new();
    let r = tree
        .add_child(NodeId::ROOT, NodeData::at(VoxelPoint::new(0.0, 0.0, 0)))
        .unwrap();
    let a = tree
        .add_child(r, NodeData::at(VoxelPoint::new(10.0, 10.0, 1)))
        .unwrap();
    let b = tree
        .add_child(a, NodeData::at(VoxelPoint::new(20.0, 20.0, 6)))
        .unwrap();
    tree.add_child(b, NodeData::at(VoxelPoint::new(30.0, 30.0, 0)))
        .unwrap();

    // Plane 0, window radius 3, screen at 4x zoom.
    let view = ViewParams::new(0, 3.0, Rect::new(-5.0, -5.0, 40.0, 40.0))
        .with_screen_transform(Affine::scale(4.0));
    let projection = PlaneProjector::new(view).project(&tree, Some(a));

    for (i, segment) in projection.segments.iter().enumerate() {
        println!("segment {i}:");
        for v in &segment.vertices {
            match v.position {
                Some(p) => println!(
                    "  {} at ({:.0}, {:.0}) size {:.2} dz {} {:?}",
                    v.node, p.x, p.y, v.size, v.depth_delta, v.markers
                ),
                None => println!("  {} (gap)", v.node),
            }
        }
        for run in segment.runs() {
            println!("  polyline with {} points", run.len());
        }
    }
    for stub in projection.stubs() {
        let style = match stub.kind {
            StubKind::Farther => "dashed",
            StubKind::Closer => "dotted",
        };
        let label = stub.label.map(|l| l.to_string()).unwrap_or_default();
        println!("stub {} -> {} ({style}) {label}", stub.from, stub.to);
    }

    let root = projection.vertex(r).unwrap();
    assert!(root.markers.contains(MarkerFlags::ROOT | MarkerFlags::IN_PLANE));
    assert_eq!(projection.editable, Some(a));
}
