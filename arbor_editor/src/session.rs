// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracing session: owns the collection, the snapshot store, and the dirty flag.
//!
//! Editing lives in [`editor`](crate::editor) and navigation in
//! [`navigator`](crate::navigator); both are `impl` blocks on [`Session`].

use arbor_projector::{PlaneProjector, Projection, ViewParams};
use arbor_tree::{BranchType, Classification, NodeId, NodeType};
use tracing::{debug, info, warn};

use crate::collection::{Color, TreeCollection, TreeSlot};
use crate::config::EditorConfig;
use crate::error::{EditError, ErrorKind, PersistError};
use crate::host::{Notice, Viewer};
use crate::record::CollectionRecord;
use crate::store::{SnapshotKind, SnapshotName, SnapshotStore};

/// Renderable geometry of one slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotFrame {
    /// Slot index.
    pub slot: usize,
    /// Marker color of the slot.
    pub color: Color,
    /// Projected geometry.
    pub projection: Projection,
}

/// One interactive tracing session.
///
/// All mutation goes through `&mut self`, so edits are serialized by construction.
#[derive(Debug)]
pub struct Session<S> {
    pub(crate) collection: TreeCollection,
    pub(crate) config: EditorConfig,
    pub(crate) store: S,
    pub(crate) dirty: bool,
}

impl<S: SnapshotStore> Session<S> {
    /// Start a session with an empty collection sized by `config`.
    pub fn new(config: EditorConfig, store: S) -> Self {
        Self {
            collection: TreeCollection::with_capacity(config.capacity),
            config,
            store,
            dirty: false,
        }
    }

    /// The trees being edited.
    pub fn collection(&self) -> &TreeCollection {
        &self.collection
    }

    /// Active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Snapshot store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// True after any structural or metadata edit since the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Node count per slot, for the marker-type legend.
    pub fn counts(&self) -> Vec<usize> {
        self.collection.counts()
    }

    /// Rename a slot's marker type.
    pub fn rename(&mut self, slot: usize, name: impl Into<String>) -> Result<(), EditError> {
        self.collection.slot_mut(slot)?.marker.name = name.into();
        self.dirty = true;
        Ok(())
    }

    /// Change a slot's marker color.
    pub fn recolor(&mut self, slot: usize, color: Color) -> Result<(), EditError> {
        self.collection.slot_mut(slot)?.marker.color = color;
        self.dirty = true;
        Ok(())
    }

    /// Show or hide a slot.
    pub fn set_visible(&mut self, slot: usize, visible: bool) -> Result<(), EditError> {
        self.collection.slot_mut(slot)?.visible = visible;
        self.dirty = true;
        Ok(())
    }

    /// Discard a slot's tree.
    pub fn clear_slot(&mut self, slot: usize) -> Result<(), EditError> {
        let s = self.collection.slot_mut(slot)?;
        if !s.tree.is_empty() {
            s.clear();
            self.dirty = true;
            debug!(slot, "cleared slot");
        }
        Ok(())
    }

    /// Write a snapshot of the whole collection to the store.
    pub fn snapshot(&mut self, kind: SnapshotKind) -> Result<String, PersistError> {
        let name = SnapshotName::now(kind, self.collection.node_count());
        let record = CollectionRecord::capture(&self.collection);
        let key = self.store.save(&name, &record)?;
        info!(%key, "snapshot written");
        Ok(key)
    }

    /// Best-effort snapshot: failure is logged and reported, never returned.
    pub(crate) fn try_snapshot(&mut self, kind: SnapshotKind, host: &mut dyn Viewer) -> Option<String> {
        match self.snapshot(kind) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, kind = kind.as_str(), "snapshot failed");
                host.notify(Notice::Error, &e.to_string());
                None
            }
        }
    }

    /// Snapshot the collection, then run `edit` on slot `slot`.
    ///
    /// The snapshot is kept whether or not the edit succeeds, and a failed snapshot
    /// does not prevent the edit. An invalid slot fails before anything is written.
    pub fn with_snapshot<T>(
        &mut self,
        kind: SnapshotKind,
        slot: usize,
        host: &mut dyn Viewer,
        edit: impl FnOnce(&mut TreeSlot) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        self.collection.slot(slot)?;
        self.try_snapshot(kind, host);
        let out = edit(self.collection.slot_mut(slot)?);
        if out.is_ok() {
            self.dirty = true;
        }
        out
    }

    /// Write a manual snapshot and clear the dirty flag.
    pub fn save(&mut self) -> Result<String, PersistError> {
        let key = self.snapshot(SnapshotKind::Manual)?;
        self.dirty = false;
        Ok(key)
    }

    /// Replace every slot with the contents of `record`.
    ///
    /// The capacity grows if the record has more slots. Nothing changes if any tree
    /// in the record is invalid.
    pub fn load(&mut self, record: &CollectionRecord) -> Result<(), PersistError> {
        let rebuilt = record.rebuild()?;
        self.collection.grow_to(record.slots.len());
        for (index, slot) in self.collection.slots_mut().iter_mut().enumerate() {
            *slot = TreeSlot::new(index);
        }
        let slots = self.collection.slots_mut();
        for (index, tree_record, tree) in rebuilt {
            let slot = &mut slots[index];
            slot.marker = tree_record.marker.clone();
            slot.visible = tree_record.visible;
            slot.replace_tree(tree, tree_record.extension);
        }
        self.dirty = false;
        info!(nodes = record.node_count(), slots = record.slots.len(), "collection loaded");
        Ok(())
    }

    /// Load the snapshot stored under `key`.
    pub fn restore(&mut self, key: &str) -> Result<(), PersistError> {
        let record = self.store.load(key)?;
        self.load(&record)
    }

    /// Classification of the slot's extension node.
    pub fn extension_classification(&self, slot: usize) -> Result<Option<&Classification>, EditError> {
        let s = self.collection.slot(slot)?;
        Ok(s.extension().and_then(|e| s.tree.get(e)).map(|n| n.class()))
    }

    /// Set the node type of the slot's extension node.
    pub fn set_node_type(&mut self, slot: usize, node_type: NodeType) -> Result<NodeId, EditError> {
        self.edit_classification(slot, |c| c.node_type = node_type)
    }

    /// Set the branch type of the slot's extension node.
    pub fn set_branch_type(&mut self, slot: usize, branch_type: BranchType) -> Result<NodeId, EditError> {
        self.edit_classification(slot, |c| c.branch_type = branch_type)
    }

    fn edit_classification(
        &mut self,
        slot: usize,
        apply: impl FnOnce(&mut Classification),
    ) -> Result<NodeId, EditError> {
        let s = self.collection.slot_mut(slot)?;
        let ext = s.extension().ok_or(EditError::InvalidSelection { slot })?;
        let mut class = s.tree.node(ext)?.class().clone();
        if !class.is_editable() {
            return Err(EditError::ReadOnly(ext));
        }
        apply(&mut class);
        s.tree.set_classification(ext, class)?;
        self.dirty = true;
        Ok(ext)
    }

    /// Project one slot onto the active plane, highlighting its extension node.
    pub fn project(&self, slot: usize, view: &ViewParams) -> Result<Projection, EditError> {
        let s = self.collection.slot(slot)?;
        Ok(PlaneProjector::new(*view).project(&s.tree, s.extension()))
    }

    /// Projections of every visible, non-empty slot.
    ///
    /// Only `active` gets its extension node highlighted.
    pub fn frame(&self, view: &ViewParams, active: Option<usize>) -> Vec<SlotFrame> {
        let projector = PlaneProjector::new(*view);
        self.collection
            .iter()
            .filter(|(_, s)| s.visible && !s.tree.is_empty())
            .map(|(index, s)| {
                let extension = (active == Some(index)).then(|| s.extension()).flatten();
                SlotFrame {
                    slot: index,
                    color: s.marker.color,
                    projection: projector.project(&s.tree, extension),
                }
            })
            .collect()
    }
}

/// Log and report a refused request, then hand the result back.
pub(crate) fn reported<T>(host: &mut dyn Viewer, result: Result<T, EditError>) -> Result<T, EditError> {
    if let Err(e) = &result {
        let notice = match e.kind() {
            ErrorKind::NotFound => Notice::Info,
            _ => Notice::Error,
        };
        warn!(error = %e, "request refused");
        host.notify(notice, &e.to_string());
    }
    result
}
