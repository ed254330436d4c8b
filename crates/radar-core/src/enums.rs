//! Classification, lifecycle and notification enums for the radar.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Lifecycle enums provide `allowed_next_states()` so the transition engine can
//! reject backwards or skipping moves before anything is written.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Quadrant
// ---------------------------------------------------------------------------

/// Category axis of the radar. Each quadrant owns one 90° sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    LanguagesFrameworks,
    Tools,
    Platforms,
    Techniques,
}

impl Quadrant {
    /// Quadrants in clockwise sector order.
    pub const ALL: [Self; 4] = [
        Self::LanguagesFrameworks,
        Self::Tools,
        Self::Platforms,
        Self::Techniques,
    ];

    /// Zero-based sector position, clockwise.
    #[must_use]
    pub const fn sector_index(self) -> usize {
        match self {
            Self::LanguagesFrameworks => 0,
            Self::Tools => 1,
            Self::Platforms => 2,
            Self::Techniques => 3,
        }
    }

    /// Human-readable label for legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LanguagesFrameworks => "Languages & Frameworks",
            Self::Tools => "Tools",
            Self::Platforms => "Platforms",
            Self::Techniques => "Techniques",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LanguagesFrameworks => "languages_frameworks",
            Self::Tools => "tools",
            Self::Platforms => "platforms",
            Self::Techniques => "techniques",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ring
// ---------------------------------------------------------------------------

/// Adoption-confidence tier.
///
/// ```text
/// rank:  hold(0) < assess(1) < trial(2) < adopt(3)
/// band:  adopt (innermost) … hold (outermost)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Ring {
    Adopt,
    Trial,
    Assess,
    Hold,
}

impl Ring {
    /// Rings from the innermost band outwards.
    pub const ALL: [Self; 4] = [Self::Adopt, Self::Trial, Self::Assess, Self::Hold];

    /// Adoption rank; higher means more endorsed.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Hold => 0,
            Self::Assess => 1,
            Self::Trial => 2,
            Self::Adopt => 3,
        }
    }

    /// Outer radius of this ring's band as a fraction of the radar radius.
    #[must_use]
    pub const fn outer_fraction(self) -> f64 {
        match self {
            Self::Adopt => 0.25,
            Self::Trial => 0.50,
            Self::Assess => 0.75,
            Self::Hold => 1.00,
        }
    }

    /// Inner radius fraction, i.e. the previous ring's outer fraction.
    #[must_use]
    pub const fn inner_fraction(self) -> f64 {
        match self {
            Self::Adopt => 0.0,
            Self::Trial => Self::Adopt.outer_fraction(),
            Self::Assess => Self::Trial.outer_fraction(),
            Self::Hold => Self::Assess.outer_fraction(),
        }
    }

    /// Movement indicator for a ring change from `self` to `next`.
    #[must_use]
    pub fn movement_to(self, next: Self) -> Movement {
        match next.rank().cmp(&self.rank()) {
            std::cmp::Ordering::Greater => Movement::In,
            std::cmp::Ordering::Less => Movement::Out,
            std::cmp::Ordering::Equal => Movement::NoChange,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adopt => "adopt",
            Self::Trial => "trial",
            Self::Assess => "assess",
            Self::Hold => "hold",
        }
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Direction of the last ring change. Derived, never set by callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    In,
    Out,
    #[default]
    NoChange,
}

impl Movement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::NoChange => "no_change",
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeprecationStatus
// ---------------------------------------------------------------------------

/// Wind-down state of a deprecated technology or API version.
///
/// ```text
/// active → deprecated → sunset → removed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeprecationStatus {
    #[default]
    Active,
    Deprecated,
    Sunset,
    Removed,
}

impl DeprecationStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Deprecated],
            Self::Deprecated => &[Self::Sunset],
            Self::Sunset => &[Self::Removed],
            Self::Removed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deprecated => "deprecated",
            Self::Sunset => "sunset",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for DeprecationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApiLifecycleStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a versioned API surface.
///
/// ```text
/// development → beta → stable → deprecated → sunset → removed
/// development → stable
/// beta → deprecated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApiLifecycleStatus {
    Development,
    Beta,
    Stable,
    Deprecated,
    Sunset,
    Removed,
}

impl ApiLifecycleStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Development => &[Self::Beta, Self::Stable],
            Self::Beta => &[Self::Stable, Self::Deprecated],
            Self::Stable => &[Self::Deprecated],
            Self::Deprecated => &[Self::Sunset],
            Self::Sunset => &[Self::Removed],
            Self::Removed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// The deprecation phase this status corresponds to, if any.
    #[must_use]
    pub const fn deprecation_phase(self) -> Option<DeprecationStatus> {
        match self {
            Self::Deprecated => Some(DeprecationStatus::Deprecated),
            Self::Sunset => Some(DeprecationStatus::Sunset),
            Self::Removed => Some(DeprecationStatus::Removed),
            Self::Development | Self::Beta | Self::Stable => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Beta => "beta",
            Self::Stable => "stable",
            Self::Deprecated => "deprecated",
            Self::Sunset => "sunset",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ApiLifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VersioningStrategy
// ---------------------------------------------------------------------------

/// How an API surface expresses its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VersioningStrategy {
    Semantic,
    DateBased,
    Sequential,
    HeaderBased,
}

impl VersioningStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::DateBased => "date_based",
            Self::Sequential => "sequential",
            Self::HeaderBased => "header_based",
        }
    }
}

impl fmt::Display for VersioningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Business impact scales
// ---------------------------------------------------------------------------

/// Strategic value of a technology to the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategicValue {
    Low,
    Medium,
    High,
    Critical,
}

impl StrategicValue {
    /// Whether losing this technology warrants an operational incident.
    #[must_use]
    pub const fn warrants_incident(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for StrategicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adoption risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Cost of adopting or running a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CostImpact {
    Low,
    Medium,
    High,
}

/// How quickly a technology pays off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeToValue {
    Immediate,
    Short,
    Medium,
    Long,
}

/// A team's proficiency with a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

// ---------------------------------------------------------------------------
// ReviewCadence
// ---------------------------------------------------------------------------

/// How often radar entries are re-reviewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCadence {
    Monthly,
    #[default]
    Quarterly,
    Biannual,
    Annual,
}

impl ReviewCadence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Biannual => "biannual",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for ReviewCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// Severity of a deprecation notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Critical,
}

impl NoticeSeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for NoticeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity a deprecation notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Technology,
    ApiVersion,
}

impl TargetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::ApiVersion => "api_version",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery channel for a notice recipient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    #[default]
    Email,
    Chat,
    Webhook,
}

impl ChannelType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Chat => "chat",
            Self::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PlacementMode
// ---------------------------------------------------------------------------

/// How the layout engine places dots inside a ring/quadrant cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Fresh uniform placement on every call.
    #[default]
    Random,
    /// Placement seeded by the entity id; identical snapshots render identically.
    Deterministic,
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Stored record kinds. Used in error messages and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Technology,
    ApiVersion,
    Notice,
    Snapshot,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::ApiVersion => "api_version",
            Self::Notice => "notice",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
