use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::DeprecationRecord;
use crate::enums::{ApiLifecycleStatus, VersioningStrategy};

/// Observed traffic for an API version.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UsageMetrics {
    pub active_clients: u64,
    pub requests_per_day: u64,
    /// Fraction of failed requests, `[0, 1]`.
    pub error_rate: f64,
    pub mean_latency_ms: f64,
}

/// A versioned API surface.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ApiVersion {
    pub id: String,
    pub api_name: String,
    pub strategy: VersioningStrategy,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub status: ApiLifecycleStatus,
    pub usage: UsageMetrics,
    /// Teams consuming this version; they receive deprecation notices.
    pub consumer_teams: Vec<String>,
    pub deprecation: Option<DeprecationRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl ApiVersion {
    /// Version label as clients see it.
    #[must_use]
    pub fn label(&self) -> String {
        match self.strategy {
            VersioningStrategy::Semantic => {
                format!("v{}.{}.{}", self.major, self.minor, self.patch)
            }
            VersioningStrategy::DateBased => {
                format!("{:04}-{:02}-{:02}", self.major, self.minor, self.patch)
            }
            VersioningStrategy::Sequential => format!("v{}", self.major),
            VersioningStrategy::HeaderBased => format!("v{}.{}", self.major, self.minor),
        }
    }
}

/// Draft for registering an API version.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewApiVersion {
    pub api_name: String,
    pub strategy: VersioningStrategy,
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub patch: u32,
    pub status: ApiLifecycleStatus,
    #[serde(default)]
    pub consumer_teams: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(strategy: VersioningStrategy) -> ApiVersion {
        let now = Utc::now();
        ApiVersion {
            id: "api-00000001".into(),
            api_name: "orders".into(),
            strategy,
            major: 2024,
            minor: 3,
            patch: 1,
            status: ApiLifecycleStatus::Stable,
            usage: UsageMetrics::default(),
            consumer_teams: Vec::new(),
            deprecation: None,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[test]
    fn labels_follow_strategy() {
        assert_eq!(api(VersioningStrategy::Semantic).label(), "v2024.3.1");
        assert_eq!(api(VersioningStrategy::DateBased).label(), "2024-03-01");
        assert_eq!(api(VersioningStrategy::Sequential).label(), "v2024");
        assert_eq!(api(VersioningStrategy::HeaderBased).label(), "v2024.3");
    }
}
