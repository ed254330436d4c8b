//! Technology revision builders.
//!
//! Lifecycle fields (`ring`, `movement`, `deprecation`) are deliberately absent:
//! those only change through the transition engine.

use radar_core::entities::{Assessment, BusinessImpact, Relationships, TeamUsage};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TechnologyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_impact: Option<BusinessImpact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Relationships>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adoption_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Replaces the usage record of the same team, or appends a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_usage: Option<TeamUsage>,
}

impl TechnologyUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.assessment.is_none()
            && self.business_impact.is_none()
            && self.relationships.is_none()
            && self.adoption_level.is_none()
            && self.tags.is_none()
            && self.team_usage.is_none()
    }
}

pub struct TechnologyUpdateBuilder(TechnologyUpdate);

impl Default for TechnologyUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnologyUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TechnologyUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn assessment(mut self, assessment: Assessment) -> Self {
        self.0.assessment = Some(assessment);
        self
    }

    #[must_use]
    pub const fn business_impact(mut self, impact: BusinessImpact) -> Self {
        self.0.business_impact = Some(impact);
        self
    }

    #[must_use]
    pub fn relationships(mut self, relationships: Relationships) -> Self {
        self.0.relationships = Some(relationships);
        self
    }

    #[must_use]
    pub const fn adoption_level(mut self, level: f64) -> Self {
        self.0.adoption_level = Some(level);
        self
    }

    #[must_use]
    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.0.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn team_usage(mut self, usage: TeamUsage) -> Self {
        self.0.team_usage = Some(usage);
        self
    }

    #[must_use]
    pub fn build(self) -> TechnologyUpdate {
        self.0
    }
}

/// Additions to a technology's rationale. Nothing is ever removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RationaleAddition {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub tradeoffs: Vec<String>,
    pub decision_factors: Vec<String>,
    pub stakeholders: Vec<String>,
    /// Free-text line for the rationale log.
    pub note: Option<String>,
}

impl RationaleAddition {
    /// A plain log note.
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pros.is_empty()
            && self.cons.is_empty()
            && self.tradeoffs.is_empty()
            && self.decision_factors.is_empty()
            && self.stakeholders.is_empty()
            && self.note.as_deref().is_none_or(|n| n.trim().is_empty())
    }
}
