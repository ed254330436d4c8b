//! # radar-engine
//!
//! Lifecycle and snapshot engine for the technology radar.
//!
//! [`RadarService`] owns every mutation: adding technologies and API
//! versions, ring moves and deprecations, the periodic lifecycle sweep,
//! notice bookkeeping, and snapshot creation and publication. Storage is
//! abstracted behind [`store::Store`]; [`store::MemoryStore`] backs tests and
//! single-process use. Side effects leave the engine as
//! [`radar_core::events::DomainEvent`]s consumed by [`events::EventHandler`]s.
//!
//! The [`layout`] module turns a snapshot into canvas geometry.

pub mod events;
pub mod layout;
pub mod repos;
pub mod scheduler;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod transitions;
pub mod updates;

#[cfg(test)]
mod test_support;

pub use events::{EventHandler, EventLog, IncidentEscalation, IncidentSink, MemoryIncidentSink};
pub use layout::{LayoutEngine, RadarLayout};
pub use repos::api_version::{ApiDeprecation, ApiVersionFilter};
pub use repos::notice::{NoticeFilter, ReminderDue};
pub use repos::technology::{StatusFilter, TechnologyFilter};
pub use scheduler::{DeprecationSchedule, DeprecationScheduler};
pub use service::RadarService;
pub use store::{MemoryStore, RadarStore, Store};
pub use transitions::{Deprecation, DeprecationRequest, LifecycleChange, RingMoveOutcome};
pub use updates::technology::{RationaleAddition, TechnologyUpdate, TechnologyUpdateBuilder};
