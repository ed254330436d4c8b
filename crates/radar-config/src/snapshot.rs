//! Snapshot summary settings.

use serde::{Deserialize, Serialize};

const fn default_new_window_days() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Entries created within this many days count as "new".
    #[serde(default = "default_new_window_days")]
    pub new_window_days: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            new_window_days: default_new_window_days(),
        }
    }
}
