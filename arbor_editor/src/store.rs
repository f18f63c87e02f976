// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Durable snapshot storage.
//!
//! Snapshots are named after the operation that triggered them, the node count, and a UTC
//! timestamp. Stores retain every snapshot; a name collision never overwrites an older one.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::PersistError;
use crate::record::CollectionRecord;

/// Why a snapshot was taken.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    /// Before moving a subtree.
    Reparent,
    /// Before deleting a subtree.
    Prune,
    /// Periodic, every N added nodes.
    Autosave,
    /// Requested by the user.
    Manual,
}

impl SnapshotKind {
    /// Lowercase name used in snapshot names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reparent => "reparent",
            Self::Prune => "prune",
            Self::Autosave => "autosave",
            Self::Manual => "manual",
        }
    }
}

/// Identifies one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotName {
    /// What triggered the snapshot.
    pub kind: SnapshotKind,
    /// Nodes in the snapshotted collection.
    pub node_count: usize,
    /// When it was taken.
    pub timestamp: DateTime<Utc>,
}

impl SnapshotName {
    /// A name stamped with the current time.
    pub fn now(kind: SnapshotKind, node_count: usize) -> Self {
        Self {
            kind,
            node_count,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}nodes-{}",
            self.kind.as_str(),
            self.node_count,
            self.timestamp.format("%Y%m%dT%H%M%S")
        )
    }
}

/// Somewhere snapshots can be written to and read back from.
pub trait SnapshotStore {
    /// Persist `record` under `name`, returning the key it was stored under.
    ///
    /// Must not overwrite an existing snapshot.
    fn save(&mut self, name: &SnapshotName, record: &CollectionRecord) -> Result<String, PersistError>;

    /// Read back the snapshot stored under `key`.
    fn load(&self, key: &str) -> Result<CollectionRecord, PersistError>;
}

/// Keeps snapshots in memory. Useful for tests and for hosts without a filesystem.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<String, CollectionRecord>,
    order: Vec<String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys in the order they were saved.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, name: &SnapshotName, record: &CollectionRecord) -> Result<String, PersistError> {
        let key = unique_key(&name.to_string(), |k| self.snapshots.contains_key(k));
        self.snapshots.insert(key.clone(), record.clone());
        self.order.push(key.clone());
        Ok(key)
    }

    fn load(&self, key: &str) -> Result<CollectionRecord, PersistError> {
        self.snapshots
            .get(key)
            .cloned()
            .ok_or_else(|| PersistError::Missing(key.to_owned()))
    }
}

/// Writes each snapshot as `<dir>/<name>.json`.
#[derive(Clone, Debug)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    /// Store snapshots in `dir`, created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FsStore {
    fn save(&mut self, name: &SnapshotName, record: &CollectionRecord) -> Result<String, PersistError> {
        fs::create_dir_all(&self.dir)?;
        let json = record.to_json()?;
        // Dropping the temp file on any error below deletes it, so a failed save never
        // leaves a partial `.json` behind.
        let mut tmp = tempfile::Builder::new()
            .prefix(".snapshot-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        let base = name.to_string();
        let mut n = 0_u32;
        loop {
            let key = if n == 0 { base.clone() } else { format!("{base}-{n}") };
            match tmp.persist_noclobber(self.path_for(&key)) {
                Ok(_) => return Ok(key),
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    tmp = e.file;
                    n += 1;
                }
                Err(e) => return Err(e.error.into()),
            }
        }
    }

    fn load(&self, key: &str) -> Result<CollectionRecord, PersistError> {
        let path = self.path_for(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PersistError::Missing(key.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        CollectionRecord::from_json(&json)
    }
}

fn unique_key(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_owned();
    }
    (1_u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|k| !taken(k))
        .unwrap_or_else(|| base.to_owned())
}
