// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Editor: an interactive neurite tracing session.
//!
//! A [`Session`] owns a fixed set of tree slots ([`TreeCollection`]), one neuron per slot,
//! each with its own marker type and *extension node*: the cursor new nodes attach below.
//! The host viewer feeds it cursor positions and depth planes and implements [`Viewer`] to
//! receive recenter requests and messages.
//!
//! - Editing: [`Session::add_marker`], [`Session::delete_marker`], [`Session::move_marker`].
//!   Holding [`Modifiers::STRUCTURAL`] turns them into reparent and prune.
//! - Navigation: root, parent, first child, previous and next branch point, leaf cycling.
//! - Rendering: [`Session::frame`] projects every visible slot with `arbor_projector`.
//! - Persistence: a [`SnapshotStore`] receives the whole collection before every
//!   reparent and prune, periodically while tracing, and on [`Session::save`].
//!
//! Refused requests never change the collection. They come back as [`EditError`] and are
//! also reported through [`Viewer::notify`].
//!
//! ## Minimal usage
//!
//! ```
//! use arbor_editor::{Direction, EditorConfig, Headless, MemoryStore, Modifiers, Session};
//! use kurbo::Point;
//!
//! let mut session = Session::new(EditorConfig::default(), MemoryStore::new());
//! let mut viewer = Headless;
//!
//! for x in [0.0, 10.0, 20.0] {
//!     session
//!         .add_marker(0, Point::new(x, 0.0), 0, Modifiers::empty(), &mut viewer)
//!         .unwrap();
//! }
//! assert_eq!(session.counts()[0], 3);
//!
//! // Back to the root, then to the only leaf.
//! session.go_to_root(0, &mut viewer).unwrap();
//! let report = session.cycle_leaf(0, Direction::Next, &mut viewer).unwrap();
//! assert_eq!(report.length, 20.0);
//! ```

mod collection;
mod config;
mod editor;
mod error;
mod host;
mod navigator;
mod record;
mod session;
mod store;

pub use collection::{Color, MarkerType, PALETTE, TreeCollection, TreeSlot};
pub use config::{AutosaveConfig, DEFAULT_CAPACITY, EditorConfig};
pub use editor::{AddOutcome, DeleteOutcome};
pub use error::{EditError, ErrorKind, PersistError};
pub use host::{Headless, Modifiers, Notice, Viewer};
pub use navigator::{
    BranchReport, Calibration, Direction, LeafReport, format_length, next_branch, path_length,
    previous_branch,
};
pub use record::{CollectionRecord, FORMAT_VERSION, NodeRecord, TreeRecord};
pub use session::{Session, SlotFrame};
pub use store::{FsStore, MemoryStore, SnapshotKind, SnapshotName, SnapshotStore};
