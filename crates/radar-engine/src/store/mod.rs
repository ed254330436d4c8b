//! Storage abstraction.
//!
//! The engine never touches a concrete database. It talks to a [`Store`] per
//! record type offering get / insert / list / compare-and-swap, which keeps
//! it storage-agnostic: tests bind it to [`MemoryStore`], production binds it
//! to a durable backend.

mod memory;

use std::future::Future;

use radar_core::entities::{ApiVersion, DeprecationNotice, RadarSnapshot, TechnologyEntry};
use radar_core::enums::EntityKind;
use radar_core::errors::RadarError;

pub use memory::MemoryStore;

/// A stored record with optimistic versioning.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Monotonic per-record counter checked by compare-and-swap.
    fn revision(&self) -> u64;
}

/// Keyed collection of one record type.
pub trait Store<T: Record>: Send + Sync {
    /// Fetch a record by id.
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<T>, RadarError>> + Send;

    /// Insert a new record. Fails with `Conflict` if the id is taken.
    fn insert(&self, record: T) -> impl Future<Output = Result<(), RadarError>> + Send;

    /// Replace a record only if the stored revision equals `expected_revision`.
    ///
    /// A stale write fails with `Conflict` and leaves the stored record untouched.
    fn compare_and_swap(
        &self,
        expected_revision: u64,
        record: T,
    ) -> impl Future<Output = Result<(), RadarError>> + Send;

    /// All records, in no particular order.
    fn list(&self) -> impl Future<Output = Result<Vec<T>, RadarError>> + Send;
}

/// Everything the radar service needs from a backing store.
pub trait RadarStore:
    Store<TechnologyEntry> + Store<ApiVersion> + Store<DeprecationNotice> + Store<RadarSnapshot>
{
}

impl<S> RadarStore for S where
    S: Store<TechnologyEntry>
        + Store<ApiVersion>
        + Store<DeprecationNotice>
        + Store<RadarSnapshot>
{
}

impl Record for TechnologyEntry {
    const KIND: EntityKind = EntityKind::Technology;

    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> u64 {
        self.version
    }
}

impl Record for ApiVersion {
    const KIND: EntityKind = EntityKind::ApiVersion;

    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> u64 {
        self.version
    }
}

impl Record for DeprecationNotice {
    const KIND: EntityKind = EntityKind::Notice;

    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

impl Record for RadarSnapshot {
    const KIND: EntityKind = EntityKind::Snapshot;

    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
