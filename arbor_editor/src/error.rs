// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for editing and persistence.

use arbor_tree::{NodeId, TreeError};
use thiserror::Error;

/// Broad category of an [`EditError`].
///
/// None of these are fatal: the collection always stays in its last valid state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Branch-point deletion, root deletion, or a cycle-creating reparent.
    StructuralViolation,
    /// Nothing under the cursor.
    NotFound,
    /// A snapshot or autosave could not be written or read.
    PersistenceFailure,
    /// The request targets an empty or nonexistent slot, or a read-only node.
    InvalidSelection,
}

/// A rejected editor or navigator request.
#[derive(Debug, Error)]
pub enum EditError {
    /// The tree refused the edit.
    #[error(transparent)]
    Structural(#[from] TreeError),
    /// No node lies on the requested plane.
    #[error("no points in current depth (z = {depth})")]
    EmptyPlane {
        /// Plane that was searched.
        depth: i32,
    },
    /// The plane has nodes, but none close enough to the cursor.
    #[error("no point within {radius} voxels of the cursor")]
    NotFound {
        /// Search radius that was used.
        radius: f64,
    },
    /// The slot index is out of range or the slot's tree is empty.
    #[error("slot {slot} has no tree")]
    InvalidSelection {
        /// Requested slot.
        slot: usize,
    },
    /// The node's classification does not carry the editable capability.
    #[error("node {0} is read-only")]
    ReadOnly(NodeId),
    /// Reading or writing a snapshot failed.
    #[error(transparent)]
    Persistence(#[from] PersistError),
}

impl EditError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Structural(e) if e.is_structural_violation() => ErrorKind::StructuralViolation,
            Self::Structural(_) | Self::InvalidSelection { .. } | Self::ReadOnly(_) => {
                ErrorKind::InvalidSelection
            }
            Self::EmptyPlane { .. } | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
        }
    }
}

/// Failure to write or read a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem error.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding or decoding failed.
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The stored trees are not valid trees.
    #[error("snapshot holds an invalid tree: {0}")]
    Malformed(TreeError),
    /// The snapshot format version is not understood.
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    /// No snapshot by that name.
    #[error("no snapshot named {0:?}")]
    Missing(String),
}
