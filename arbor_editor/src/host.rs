// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a tracing session needs from the viewer that hosts it.

use bitflags::bitflags;

/// Severity of a transient user-facing message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Informational, e.g. a path length after leaf cycling.
    Info,
    /// A refused edit or failed snapshot.
    Error,
}

/// The viewer collaborator.
///
/// Cursor position, active plane and viewport are passed to each operation directly;
/// this trait covers the calls going the other way.
pub trait Viewer {
    /// Center the view on voxel `(x, y)`.
    fn recenter(&mut self, x: f64, y: f64);

    /// Make `z` the active depth plane.
    fn seek_depth(&mut self, z: i32);

    /// Show a transient message.
    fn notify(&mut self, notice: Notice, message: &str);
}

/// A viewer that ignores every request. Handy for batch edits and tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct Headless;

impl Viewer for Headless {
    fn recenter(&mut self, _x: f64, _y: f64) {}

    fn seek_depth(&mut self, _z: i32) {}

    fn notify(&mut self, _notice: Notice, _message: &str) {}
}

bitflags! {
    /// Modifier keys held during an edit.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control / Command.
        const CONTROL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Turns add into reparent and delete into prune.
        const STRUCTURAL = Self::SHIFT.bits() | Self::ALT.bits();
    }
}

impl Modifiers {
    /// True if the structural combination is held. Extra keys are ignored.
    pub fn is_structural(self) -> bool {
        self.contains(Self::STRUCTURAL)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Notice, Viewer};

    /// Records every request for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingViewer {
        pub(crate) centers: Vec<(f64, f64)>,
        pub(crate) depths: Vec<i32>,
        pub(crate) notices: Vec<(Notice, String)>,
    }

    impl RecordingViewer {
        pub(crate) fn errors(&self) -> usize {
            self.notices.iter().filter(|(n, _)| *n == Notice::Error).count()
        }

        pub(crate) fn last_message(&self) -> Option<&str> {
            self.notices.last().map(|(_, m)| m.as_str())
        }
    }

    impl Viewer for RecordingViewer {
        fn recenter(&mut self, x: f64, y: f64) {
            self.centers.push((x, y));
        }

        fn seek_depth(&mut self, z: i32) {
            self.depths.push(z);
        }

        fn notify(&mut self, notice: Notice, message: &str) {
            self.notices.push((notice, message.into()));
        }
    }
}
