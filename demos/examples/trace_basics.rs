// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing basics.
//!
//! Place a few nodes, branch, refuse a branch-point delete, then prune a chain with a snapshot.
//!
//! Run:
//! - `cargo run -p arbor_demos --example trace_basics`

use arbor_editor::{
    EditorConfig, ErrorKind, MemoryStore, Modifiers, Notice, Session, SnapshotStore, Viewer,
};
use kurbo::Point;

/// Prints whatever the session asks of the viewer.
struct Console;

impl Viewer for Console {
    fn recenter(&mut self, x: f64, y: f64) {
        println!("  viewer: recenter on ({x:.1}, {y:.1})");
    }

    fn seek_depth(&mut self, z: i32) {
        println!("  viewer: seek to plane {z}");
    }

    fn notify(&mut self, notice: Notice, message: &str) {
        println!("  viewer: [{notice:?}] {message}");
    }
}

fn main() {
    let mut session = Session::new(EditorConfig::default(), MemoryStore::new());
    let mut viewer = Console;
    let none = Modifiers::empty();

    // A trunk along x, then a side branch from the second node.
    for x in [0.0, 20.0, 40.0, 60.0] {
        session
            .add_marker(0, Point::new(x, 0.0), 0, none, &mut viewer)
            .unwrap();
    }
    session.go_to_root(0, &mut viewer).unwrap();
    session.go_to_first_child(0, &mut viewer).unwrap();
    session
        .add_marker(0, Point::new(20.0, 20.0), 1, none, &mut viewer)
        .unwrap();
    println!("nodes per slot: {:?}", session.counts());

    // The second node now has two children.
    let err = session
        .delete_marker(0, Point::new(20.0, 0.0), 0, none, &mut viewer)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    let err = session
        .delete_marker(0, Point::new(20.0, 0.0), 0, Modifiers::STRUCTURAL, &mut viewer)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);

    // Shift+Alt prunes the third node and the trunk tip after snapshotting.
    let out = session
        .delete_marker(0, Point::new(40.0, 0.0), 0, Modifiers::STRUCTURAL, &mut viewer)
        .unwrap();
    assert_eq!(out.removed, 2);
    println!("pruned {} nodes, extension now {}", out.removed, out.extension);
    println!("snapshots: {:?}", session.store().keys());

    // Undo by restoring the snapshot.
    let key = session.store().keys()[0].clone();
    session.restore(&key).unwrap();
    println!("restored; nodes per slot: {:?}", session.counts());
    assert_eq!(session.counts()[0], 5);
    assert!(session.store().load(&key).is_ok());
}
