// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.

use serde::Deserialize;

use crate::navigator::Calibration;

/// Default number of tree slots.
pub const DEFAULT_CAPACITY: usize = 6;

/// Periodic snapshot policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Whether periodic snapshots are taken at all.
    pub enabled: bool,
    /// Snapshot whenever a tree's node count reaches a multiple of this. `0` disables.
    pub interval: usize,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 50,
        }
    }
}

impl AutosaveConfig {
    /// True if a tree that just grew to `node_count` nodes should be snapshotted.
    pub fn due(&self, node_count: usize) -> bool {
        self.enabled && self.interval > 0 && node_count > 0 && node_count.is_multiple_of(self.interval)
    }
}

/// Tunables for a tracing [`Session`](crate::Session).
///
/// Every field has a default, so a JSON document only needs the keys it changes:
///
/// ```
/// use arbor_editor::EditorConfig;
///
/// let config = EditorConfig::from_json(r#"{ "autosave": { "interval": 10 } }"#).unwrap();
/// assert_eq!(config.autosave.interval, 10);
/// assert!(config.autosave.enabled);
/// assert_eq!(config.capacity, 6);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial number of tree slots.
    pub capacity: usize,
    /// Periodic snapshot policy.
    pub autosave: AutosaveConfig,
    /// Maximum XY distance (voxels) for picking a node under the cursor.
    pub pick_radius: f64,
    /// Physical voxel size for distance reports.
    pub calibration: Calibration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            autosave: AutosaveConfig::default(),
            pick_radius: 10.0,
            calibration: Calibration::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
