// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation.
//!
//! Walk a forked arbor by branch points and cycle through its leaves with calibrated
//! distance reports.
//!
//! Run:
//! - `cargo run -p arbor_demos --example navigate`

use arbor_editor::{
    Calibration, Direction, EditorConfig, MemoryStore, Modifiers, Notice, Session, Viewer,
    format_length,
};
use kurbo::Point;

#[derive(Default)]
struct Messages(Vec<String>);

impl Viewer for Messages {
    fn recenter(&mut self, _x: f64, _y: f64) {}

    fn seek_depth(&mut self, _z: i32) {}

    fn notify(&mut self, _notice: Notice, message: &str) {
        self.0.push(message.to_owned());
    }
}

fn main() {
    let config = EditorConfig {
        calibration: Calibration {
            pixel_width: 0.25,
            pixel_height: 0.25,
            plane_spacing: 1.5,
        },
        ..EditorConfig::default()
    };
    let mut session = Session::new(config, MemoryStore::new());
    let mut viewer = Messages::default();
    let none = Modifiers::empty();
    let add = |session: &mut Session<MemoryStore>, x: f64, y: f64, z: i32| {
        session
            .add_marker(0, Point::new(x, y), z, none, &mut Messages::default())
            .unwrap();
    };

    // Soma, a trunk, then two dendrites from the trunk's tip.
    add(&mut session, 0.0, 0.0, 0);
    add(&mut session, 40.0, 0.0, 0);
    add(&mut session, 80.0, 0.0, 2);
    add(&mut session, 120.0, 40.0, 3);
    session.go_to_parent(0, &mut viewer).unwrap();
    add(&mut session, 120.0, -40.0, 1);
    add(&mut session, 160.0, -80.0, 1);

    session.go_to_root(0, &mut viewer).unwrap();
    let branch = session.go_to_next_branch(0, &mut viewer).unwrap();
    println!("first branch point below the root: {branch:?}");

    for _ in 0..3 {
        let report = session.cycle_leaf(0, Direction::Next, &mut viewer).unwrap();
        println!(
            "leaf {} is {} from branch point {}",
            report.leaf,
            format_length(report.length),
            report.branch
        );
    }

    let report = session
        .go_to_previous_branch(0, true, &mut viewer)
        .unwrap()
        .unwrap();
    println!("path back to {}: {:?}", report.branch, report.path);
    println!("messages: {:#?}", viewer.0);
}
