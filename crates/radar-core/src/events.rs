//! Domain events emitted by the engine.
//!
//! Cross-module side effects (incident creation, outbound notifications) are
//! expressed as events so the engine never depends on a collaborator being
//! reachable. Handlers live in `radar-engine`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{DeprecationStatus, Ring, StrategicValue, TargetType};

/// Something that happened inside the engine that collaborators may care about.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A technology was moved to `hold` or explicitly deprecated.
    TechnologyDeprecated {
        id: String,
        name: String,
        strategic_value: StrategicValue,
        reason: String,
        notice_id: String,
    },
    /// An API version was explicitly deprecated.
    ApiVersionDeprecated {
        id: String,
        api_name: String,
        label: String,
        reason: String,
        notice_id: String,
    },
    /// A technology changed rings.
    RingMoved {
        id: String,
        from: Ring,
        to: Ring,
    },
    /// A scheduler sweep advanced a deprecation record.
    LifecycleAdvanced {
        target_type: TargetType,
        id: String,
        from: DeprecationStatus,
        to: DeprecationStatus,
        at: DateTime<Utc>,
    },
    /// A snapshot became the new diff baseline.
    SnapshotPublished { id: String, version: String },
}

impl DomainEvent {
    /// Short event name for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TechnologyDeprecated { .. } => "technology_deprecated",
            Self::ApiVersionDeprecated { .. } => "api_version_deprecated",
            Self::RingMoved { .. } => "ring_moved",
            Self::LifecycleAdvanced { .. } => "lifecycle_advanced",
            Self::SnapshotPublished { .. } => "snapshot_published",
        }
    }
}

/// Severity requested from the incident-management collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl From<StrategicValue> for IncidentSeverity {
    fn from(value: StrategicValue) -> Self {
        match value {
            StrategicValue::Low => Self::Low,
            StrategicValue::Medium => Self::Medium,
            StrategicValue::High => Self::High,
            StrategicValue::Critical => Self::Critical,
        }
    }
}

/// Request for the incident-management collaborator to open an incident.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IncidentRequest {
    pub title: String,
    pub description: String,
    pub severity: IncidentSeverity,
    pub source: String,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}
