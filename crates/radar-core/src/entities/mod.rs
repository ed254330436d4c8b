//! Entity structs for all radar domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` so that a
//! persistence or transport collaborator can store and exchange them without
//! re-describing their shape.

mod api_version;
mod notice;
mod snapshot;
mod technology;

pub use api_version::{ApiVersion, NewApiVersion, UsageMetrics};
pub use notice::{Acknowledgment, DeprecationNotice, Recipient};
pub use snapshot::{QuadrantCounts, RadarSnapshot, RingCounts, RingMove, SnapshotChanges, SnapshotSummary};
pub use technology::{
    Assessment, BusinessImpact, DeprecationRecord, NewTechnology, Rationale, RationaleNote,
    Relationships, TeamUsage, TechnologyEntry,
};
