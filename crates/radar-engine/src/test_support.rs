//! Shared test utilities for radar-engine unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{Duration, Utc};
    use radar_config::{RadarConfig, RecipientConfig};
    use radar_core::entities::{
        Assessment, BusinessImpact, NewApiVersion, NewTechnology, Rationale, Relationships,
        TeamUsage, TechnologyEntry,
    };
    use radar_core::enums::{
        ApiLifecycleStatus, ChannelType, CostImpact, ExperienceLevel, Movement, Quadrant,
        RiskLevel, Ring, StrategicValue, TimeToValue, VersioningStrategy,
    };

    use crate::service::RadarService;
    use crate::store::MemoryStore;

    /// Default configuration plus one fixed warning recipient.
    pub fn test_config() -> RadarConfig {
        let mut config = RadarConfig::default();
        config.notifications.deprecation_warning_recipients = vec![RecipientConfig {
            channel: ChannelType::Email,
            address: "architecture@corp.internal".into(),
        }];
        config
    }

    /// In-memory service with no event handlers.
    pub fn test_service() -> RadarService<MemoryStore> {
        RadarService::new(MemoryStore::new(), test_config()).unwrap()
    }

    pub fn impact(strategic_value: StrategicValue) -> BusinessImpact {
        BusinessImpact {
            strategic_value,
            risk_level: RiskLevel::Low,
            cost_impact: CostImpact::Medium,
            time_to_value: TimeToValue::Short,
        }
    }

    /// A valid draft with uniform scores of 4.
    pub fn draft(
        name: &str,
        quadrant: Quadrant,
        ring: Ring,
        strategic_value: StrategicValue,
    ) -> NewTechnology {
        NewTechnology::new(
            name,
            format!("{name} as evaluated by the architecture group"),
            quadrant,
            ring,
            Assessment::uniform(4),
            impact(strategic_value),
        )
    }

    pub fn team_usage(team: &str) -> TeamUsage {
        TeamUsage {
            team: team.to_string(),
            projects: Vec::new(),
            adopted_at: Utc::now() - Duration::days(60),
            experience: ExperienceLevel::Intermediate,
        }
    }

    pub fn new_api(name: &str, major: u32, status: ApiLifecycleStatus) -> NewApiVersion {
        NewApiVersion {
            api_name: name.to_string(),
            strategy: VersioningStrategy::Semantic,
            major,
            minor: 0,
            patch: 0,
            status,
            consumer_teams: Vec::new(),
        }
    }

    /// A stored-shape entry for pure diff/summary/layout tests.
    pub fn entry(id: &str, name: &str, ring: Ring, version: u64) -> TechnologyEntry {
        let now = Utc::now();
        TechnologyEntry {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            quadrant: Quadrant::LanguagesFrameworks,
            ring,
            movement: Movement::NoChange,
            assessment: Assessment::uniform(3),
            overall_score: 3.0,
            business_impact: impact(StrategicValue::Medium),
            relationships: Relationships::default(),
            adoption_level: 10.0,
            team_usage: Vec::new(),
            tags: Vec::new(),
            deprecation: None,
            rationale: Rationale::default(),
            next_review_date: now + Duration::days(90),
            created_at: now,
            created_by: "test".into(),
            updated_at: now,
            updated_by: "test".into(),
            version,
        }
    }
}
