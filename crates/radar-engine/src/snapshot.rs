//! Snapshot & diff engine.
//!
//! A snapshot copies every technology by value, diffs it against the latest
//! published snapshot and aggregates summary counts. Snapshots are never
//! edited afterwards; the only change they ever see is the one-way
//! `published` flip.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use radar_core::entities::{
    RadarSnapshot, RingMove, SnapshotChanges, SnapshotSummary, TechnologyEntry,
};
use radar_core::enums::EntityKind;
use radar_core::errors::RadarError;
use radar_core::events::DomainEvent;
use radar_core::ids::PREFIX_SNAPSHOT;
use tracing::{debug, info};

use crate::repos::technology::TechnologyFilter;
use crate::service::RadarService;
use crate::store::RadarStore;

/// Structural difference between a baseline and the current entries.
///
/// With no baseline every current entry is `added`. Matching is by id:
/// a different ring is a move, the same ring with a different version is an
/// update, and baseline ids missing from `current` are removals. Lists follow
/// the order of their source slice.
#[must_use]
pub fn diff(baseline: Option<&[TechnologyEntry]>, current: &[TechnologyEntry]) -> SnapshotChanges {
    let Some(baseline) = baseline else {
        return SnapshotChanges {
            added: current.iter().map(|e| e.id.clone()).collect(),
            ..Default::default()
        };
    };

    let previous: HashMap<&str, &TechnologyEntry> =
        baseline.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut changes = SnapshotChanges::default();

    for entry in current {
        match previous.get(entry.id.as_str()) {
            None => changes.added.push(entry.id.clone()),
            Some(old) if old.ring != entry.ring => changes.moved.push(RingMove {
                id: entry.id.clone(),
                from: old.ring,
                to: entry.ring,
            }),
            Some(old) if old.version != entry.version => changes.updated.push(entry.id.clone()),
            Some(_) => {}
        }
    }

    let present: HashSet<&str> = current.iter().map(|e| e.id.as_str()).collect();
    changes.removed = baseline
        .iter()
        .filter(|old| !present.contains(old.id.as_str()))
        .map(|old| old.id.clone())
        .collect();
    changes
}

/// Aggregate counts for `entries` as of `now`.
///
/// An entry counts as new if it was created within the trailing
/// `new_window_days`.
#[must_use]
pub fn summarize(entries: &[TechnologyEntry], now: DateTime<Utc>, new_window_days: u32) -> SnapshotSummary {
    let window_start = now - Duration::days(i64::from(new_window_days));
    let mut summary = SnapshotSummary::default();
    for entry in entries {
        summary.total += 1;
        summary.by_quadrant.increment(entry.quadrant);
        summary.by_ring.increment(entry.ring);
        if entry.created_at >= window_start && entry.created_at <= now {
            summary.new_entries += 1;
        }
        if entry.is_deprecated() {
            summary.deprecated += 1;
        }
    }
    summary
}

/// Version string for a snapshot taken on `date`.
///
/// The first snapshot of a day is `YYYY.MM.DD`; later ones get `-2`, `-3`, …
/// so versions stay unique and sort by creation within a day.
#[must_use]
pub fn snapshot_version<'a>(date: NaiveDate, existing: impl IntoIterator<Item = &'a str>) -> String {
    let base = date.format("%Y.%m.%d").to_string();
    let taken = existing
        .into_iter()
        .filter_map(|v| {
            let rest = v.strip_prefix(base.as_str())?;
            if rest.is_empty() {
                Some(1)
            } else {
                rest.strip_prefix('-')?.parse::<u32>().ok()
            }
        })
        .max();
    match taken {
        None => base,
        Some(n) => format!("{base}-{}", n + 1),
    }
}

impl<S: RadarStore> RadarService<S> {
    /// Materialize the live store into a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for a blank title, or a store error.
    pub async fn create_snapshot(
        &self,
        title: &str,
        actor: &str,
        publish: bool,
    ) -> Result<RadarSnapshot, RadarError> {
        self.create_snapshot_at(Utc::now(), title, actor, publish).await
    }

    /// [`Self::create_snapshot`] with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for a blank title, or a store error.
    pub async fn create_snapshot_at(
        &self,
        now: DateTime<Utc>,
        title: &str,
        actor: &str,
        publish: bool,
    ) -> Result<RadarSnapshot, RadarError> {
        if title.trim().is_empty() {
            return Err(RadarError::invalid("snapshot title is required"));
        }

        let entries = self.list_technologies(&TechnologyFilter::default()).await?;
        let baseline = self.latest_published_snapshot().await?;
        let changes = diff(baseline.as_ref().map(|s| s.entries.as_slice()), &entries);
        let summary = summarize(&entries, now, self.config().snapshot.new_window_days);

        let existing = self.list_records::<RadarSnapshot>().await?;
        let version = snapshot_version(now.date_naive(), existing.iter().map(|s| s.version.as_str()));

        let snapshot = RadarSnapshot {
            id: Self::generate_id(PREFIX_SNAPSHOT),
            version,
            title: title.trim().to_string(),
            created_at: now,
            created_by: actor.to_string(),
            entries,
            changes,
            summary,
            published: publish,
            published_at: publish.then_some(now),
            revision: 1,
        };
        self.insert_record(snapshot.clone()).await?;

        debug!(
            added = snapshot.changes.added.len(),
            moved = snapshot.changes.moved.len(),
            updated = snapshot.changes.updated.len(),
            removed = snapshot.changes.removed.len(),
            baseline = baseline.as_ref().map_or("none", |b| b.version.as_str()),
            "snapshot diff computed"
        );
        info!(
            id = %snapshot.id,
            version = %snapshot.version,
            total = snapshot.summary.total,
            published = snapshot.published,
            actor,
            "snapshot created"
        );
        if publish {
            self.emit(&DomainEvent::SnapshotPublished {
                id: snapshot.id.clone(),
                version: snapshot.version.clone(),
            });
        }
        Ok(snapshot)
    }

    /// Publish a snapshot, making it the baseline for the next diff.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::InvalidTransition` if it is already published,
    /// `RadarError::NotFound` for an unknown id, or `RadarError::Conflict` on
    /// a concurrent publish.
    pub async fn publish_snapshot(&self, id: &str) -> Result<RadarSnapshot, RadarError> {
        let current: RadarSnapshot = self.fetch(id).await?;
        if current.published {
            return Err(RadarError::InvalidTransition {
                entity: EntityKind::Snapshot,
                id: id.to_string(),
                from: "published".into(),
                to: "published".into(),
            });
        }

        let mut next = current.clone();
        next.published = true;
        next.published_at = Some(Utc::now());
        next.revision = current.revision + 1;
        self.swap(current.revision, next.clone()).await?;

        info!(id, version = %next.version, "snapshot published");
        self.emit(&DomainEvent::SnapshotPublished {
            id: next.id.clone(),
            version: next.version.clone(),
        });
        Ok(next)
    }

    /// # Errors
    ///
    /// Returns `RadarError::NotFound` if the id is unknown.
    pub async fn get_snapshot(&self, id: &str) -> Result<RadarSnapshot, RadarError> {
        self.fetch(id).await
    }

    /// All snapshots, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn list_snapshots(&self) -> Result<Vec<RadarSnapshot>, RadarError> {
        let mut snapshots = self.list_records::<RadarSnapshot>().await?;
        snapshots.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.version.cmp(&b.version))
        });
        Ok(snapshots)
    }

    /// The most recently published snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn latest_published_snapshot(&self) -> Result<Option<RadarSnapshot>, RadarError> {
        Ok(self
            .list_records::<RadarSnapshot>()
            .await?
            .into_iter()
            .filter(|s| s.published)
            .max_by(|a, b| {
                a.published_at
                    .cmp(&b.published_at)
                    .then_with(|| a.created_at.cmp(&b.created_at))
            }))
    }
}
