use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::TechnologyEntry;
use crate::enums::{Quadrant, Ring};

/// A ring change between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RingMove {
    pub id: String,
    pub from: Ring,
    pub to: Ring,
}

/// Structural difference against the previous published snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotChanges {
    pub added: Vec<String>,
    pub moved: Vec<RingMove>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
}

impl SnapshotChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.moved.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
    }

    /// Whether `id` appears in any change list.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.added.iter().any(|a| a == id)
            || self.moved.iter().any(|m| m.id == id)
            || self.removed.iter().any(|r| r == id)
            || self.updated.iter().any(|u| u == id)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuadrantCounts {
    pub languages_frameworks: u32,
    pub tools: u32,
    pub platforms: u32,
    pub techniques: u32,
}

impl QuadrantCounts {
    pub const fn increment(&mut self, quadrant: Quadrant) {
        match quadrant {
            Quadrant::LanguagesFrameworks => self.languages_frameworks += 1,
            Quadrant::Tools => self.tools += 1,
            Quadrant::Platforms => self.platforms += 1,
            Quadrant::Techniques => self.techniques += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, quadrant: Quadrant) -> u32 {
        match quadrant {
            Quadrant::LanguagesFrameworks => self.languages_frameworks,
            Quadrant::Tools => self.tools,
            Quadrant::Platforms => self.platforms,
            Quadrant::Techniques => self.techniques,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RingCounts {
    pub adopt: u32,
    pub trial: u32,
    pub assess: u32,
    pub hold: u32,
}

impl RingCounts {
    pub const fn increment(&mut self, ring: Ring) {
        match ring {
            Ring::Adopt => self.adopt += 1,
            Ring::Trial => self.trial += 1,
            Ring::Assess => self.assess += 1,
            Ring::Hold => self.hold += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, ring: Ring) -> u32 {
        match ring {
            Ring::Adopt => self.adopt,
            Ring::Trial => self.trial,
            Ring::Assess => self.assess,
            Ring::Hold => self.hold,
        }
    }
}

/// Aggregate counts for a snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub total: u32,
    pub by_quadrant: QuadrantCounts,
    pub by_ring: RingCounts,
    /// Entries created within the trailing window (30 days by default).
    pub new_entries: u32,
    /// Entries whose deprecation status is not `active`.
    pub deprecated: u32,
}

/// Immutable point-in-time copy of the radar.
///
/// `published` flips from false to true at most once; `revision` tracks that
/// flip for compare-and-swap in the store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RadarSnapshot {
    pub id: String,
    /// `YYYY.MM.DD`, with a `-N` suffix for later snapshots on the same day.
    pub version: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub entries: Vec<TechnologyEntry>,
    pub changes: SnapshotChanges,
    pub summary: SnapshotSummary,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub revision: u64,
}
