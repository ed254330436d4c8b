use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{
    CostImpact, DeprecationStatus, ExperienceLevel, Movement, Quadrant, RiskLevel, Ring,
    StrategicValue, TimeToValue,
};

/// Seven assessment scores, each in `[1, 5]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Assessment {
    pub maturity: u8,
    pub community: u8,
    pub documentation: u8,
    pub performance: u8,
    pub security: u8,
    pub maintenance: u8,
    pub learning_curve: u8,
}

impl Assessment {
    /// Every score set to the same value.
    #[must_use]
    pub const fn uniform(score: u8) -> Self {
        Self {
            maturity: score,
            community: score,
            documentation: score,
            performance: score,
            security: score,
            maintenance: score,
            learning_curve: score,
        }
    }

    /// Named scores, in declaration order.
    #[must_use]
    pub const fn scores(&self) -> [(&'static str, u8); 7] {
        [
            ("maturity", self.maturity),
            ("community", self.community),
            ("documentation", self.documentation),
            ("performance", self.performance),
            ("security", self.security),
            ("maintenance", self.maintenance),
            ("learning_curve", self.learning_curve),
        ]
    }

    /// Overall score: arithmetic mean of the seven scores, rounded to one decimal.
    #[must_use]
    pub fn overall(&self) -> f64 {
        let sum: u32 = self.scores().iter().map(|(_, s)| u32::from(*s)).sum();
        let mean = f64::from(sum) / 7.0;
        (mean * 10.0).round() / 10.0
    }
}

/// Business impact of adopting (or dropping) a technology.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BusinessImpact {
    pub strategic_value: StrategicValue,
    pub risk_level: RiskLevel,
    pub cost_impact: CostImpact,
    pub time_to_value: TimeToValue,
}

/// Weak references to other technology ids. Lookups only, never ownership.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Relationships {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub supersedes: Vec<String>,
}

/// One team's use of a technology.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TeamUsage {
    pub team: String,
    #[serde(default)]
    pub projects: Vec<String>,
    pub adopted_at: DateTime<Utc>,
    pub experience: ExperienceLevel,
}

/// Wind-down record shared by technologies and API versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeprecationRecord {
    pub status: DeprecationStatus,
    pub deprecated_date: Option<DateTime<Utc>>,
    pub sunset_date: Option<DateTime<Utc>>,
    pub removal_date: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub migration_path: Option<String>,
    pub replacement_id: Option<String>,
}

/// A timestamped line in the rationale log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RationaleNote {
    pub at: DateTime<Utc>,
    pub actor: String,
    pub text: String,
}

/// Decision rationale. All lists are append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Rationale {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub tradeoffs: Vec<String>,
    #[serde(default)]
    pub decision_factors: Vec<String>,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    /// Chronological audit trail of ring moves and operator notes.
    #[serde(default)]
    pub log: Vec<RationaleNote>,
}

/// A technology tracked on the radar.
///
/// `ring`, `movement` and `deprecation` are only ever changed by the
/// transition engine. `version` increases by exactly one per mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TechnologyEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quadrant: Quadrant,
    pub ring: Ring,
    pub movement: Movement,
    pub assessment: Assessment,
    /// Always `assessment.overall()`.
    pub overall_score: f64,
    pub business_impact: BusinessImpact,
    pub relationships: Relationships,
    /// Percentage of the organization using it, `[0, 100]`.
    pub adoption_level: f64,
    pub team_usage: Vec<TeamUsage>,
    pub tags: Vec<String>,
    pub deprecation: Option<DeprecationRecord>,
    pub rationale: Rationale,
    pub next_review_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub version: u64,
}

impl TechnologyEntry {
    /// Deprecation status, treating a missing record as `Active`.
    #[must_use]
    pub fn deprecation_status(&self) -> DeprecationStatus {
        self.deprecation
            .as_ref()
            .map_or(DeprecationStatus::Active, |d| d.status)
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecation_status() != DeprecationStatus::Active
    }

    #[must_use]
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    #[must_use]
    pub const fn strategic_value(&self) -> StrategicValue {
        self.business_impact.strategic_value
    }
}

/// Draft submitted by an operator; the store assigns identity and bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewTechnology {
    pub name: String,
    pub description: String,
    pub quadrant: Quadrant,
    pub ring: Ring,
    pub assessment: Assessment,
    pub business_impact: BusinessImpact,
    #[serde(default)]
    pub relationships: Relationships,
    #[serde(default)]
    pub adoption_level: f64,
    #[serde(default)]
    pub team_usage: Vec<TeamUsage>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rationale: Rationale,
}

impl NewTechnology {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        quadrant: Quadrant,
        ring: Ring,
        assessment: Assessment,
        business_impact: BusinessImpact,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            quadrant,
            ring,
            assessment,
            business_impact,
            relationships: Relationships::default(),
            adoption_level: 0.0,
            team_usage: Vec::new(),
            tags: Vec::new(),
            rationale: Rationale::default(),
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_team_usage(mut self, usage: TeamUsage) -> Self {
        self.team_usage.push(usage);
        self
    }

    #[must_use]
    pub const fn with_adoption_level(mut self, level: f64) -> Self {
        self.adoption_level = level;
        self
    }
}
