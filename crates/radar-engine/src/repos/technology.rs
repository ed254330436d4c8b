//! Technology repository: add, lookup, filtered listing, rationale appends.
//!
//! Ring and deprecation changes live in `transitions`; this module never
//! touches them.

use chrono::{DateTime, Utc};
use radar_core::entities::{NewTechnology, RationaleNote, TechnologyEntry};
use radar_core::enums::{DeprecationStatus, Movement, Quadrant, Ring};
use radar_core::errors::RadarError;
use radar_core::ids::PREFIX_TECHNOLOGY;
use radar_core::validation::validate_technology;
use tracing::info;

use crate::service::RadarService;
use crate::store::RadarStore;
use crate::updates::technology::RationaleAddition;

/// Deprecation-status filter for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Deprecation status is `active` (or no record).
    Active,
    /// Any status other than `active`.
    Deprecated,
    #[default]
    All,
}

/// Filter criteria for technology listings. Criteria combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TechnologyFilter {
    pub quadrant: Option<Quadrant>,
    pub ring: Option<Ring>,
    pub status: StatusFilter,
    /// Matches entries carrying at least one of these tags. Empty = no tag filter.
    pub tags: Vec<String>,
}

impl TechnologyFilter {
    #[must_use]
    pub fn ring(ring: Ring) -> Self {
        Self {
            ring: Some(ring),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn quadrant(quadrant: Quadrant) -> Self {
        Self {
            quadrant: Some(quadrant),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn matches(&self, entry: &TechnologyEntry) -> bool {
        if self.quadrant.is_some_and(|q| q != entry.quadrant) {
            return false;
        }
        if self.ring.is_some_and(|r| r != entry.ring) {
            return false;
        }
        let status_ok = match self.status {
            StatusFilter::Active => !entry.is_deprecated(),
            StatusFilter::Deprecated => entry.is_deprecated(),
            StatusFilter::All => true,
        };
        status_ok && (self.tags.is_empty() || entry.has_any_tag(&self.tags))
    }
}

impl<S: RadarStore> RadarService<S> {
    /// Validate and store a new technology.
    ///
    /// Assigns a fresh id, sets `version = 1`, derives the overall score and
    /// the first review date.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` with every violation, or a store error.
    pub async fn add_technology(
        &self,
        draft: NewTechnology,
        actor: &str,
    ) -> Result<TechnologyEntry, RadarError> {
        validate_technology(&draft).into_result()?;

        let now = Utc::now();
        let entry = TechnologyEntry {
            id: Self::generate_id(PREFIX_TECHNOLOGY),
            overall_score: draft.assessment.overall(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            quadrant: draft.quadrant,
            ring: draft.ring,
            movement: Movement::NoChange,
            assessment: draft.assessment,
            business_impact: draft.business_impact,
            relationships: draft.relationships,
            adoption_level: draft.adoption_level,
            team_usage: draft.team_usage,
            tags: draft.tags,
            deprecation: None,
            rationale: draft.rationale,
            next_review_date: self.next_review_after(now),
            created_at: now,
            created_by: actor.to_string(),
            updated_at: now,
            updated_by: actor.to_string(),
            version: 1,
        };

        self.insert_record(entry.clone()).await?;
        info!(
            id = %entry.id,
            name = %entry.name,
            quadrant = %entry.quadrant,
            ring = %entry.ring,
            "technology added"
        );
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns `RadarError::NotFound` if the id is unknown.
    pub async fn get_technology(&self, id: &str) -> Result<TechnologyEntry, RadarError> {
        self.fetch(id).await
    }

    /// List technologies matching `filter`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn list_technologies(
        &self,
        filter: &TechnologyFilter,
    ) -> Result<Vec<TechnologyEntry>, RadarError> {
        let mut entries: Vec<TechnologyEntry> = self
            .list_records::<TechnologyEntry>()
            .await?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    /// Append to a technology's rationale in place.
    ///
    /// Still a versioned mutation: the version is bumped and the write is a
    /// compare-and-swap on the version read.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` if the addition is empty,
    /// `RadarError::NotFound` for an unknown id, or `RadarError::Conflict` on
    /// a concurrent write.
    pub async fn append_rationale(
        &self,
        id: &str,
        addition: RationaleAddition,
        actor: &str,
    ) -> Result<TechnologyEntry, RadarError> {
        if addition.is_empty() {
            return Err(RadarError::invalid("rationale addition is empty"));
        }
        let current: TechnologyEntry = self.fetch(id).await?;
        let now = Utc::now();

        let mut next = current.clone();
        let rationale = &mut next.rationale;
        rationale.pros.extend(addition.pros);
        rationale.cons.extend(addition.cons);
        rationale.tradeoffs.extend(addition.tradeoffs);
        rationale.decision_factors.extend(addition.decision_factors);
        rationale.stakeholders.extend(addition.stakeholders);
        if let Some(text) = addition.note.filter(|n| !n.trim().is_empty()) {
            rationale.log.push(RationaleNote {
                at: now,
                actor: actor.to_string(),
                text,
            });
        }
        next.updated_at = now;
        next.updated_by = actor.to_string();
        next.version = current.version + 1;

        self.swap(current.version, next.clone()).await?;
        info!(id = %next.id, version = next.version, "rationale appended");
        Ok(next)
    }

    /// Technologies whose review date has passed, oldest first. Removed
    /// technologies are skipped.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn reviews_due(&self, now: DateTime<Utc>) -> Result<Vec<TechnologyEntry>, RadarError> {
        let mut due: Vec<TechnologyEntry> = self
            .list_records::<TechnologyEntry>()
            .await?
            .into_iter()
            .filter(|e| e.next_review_date <= now)
            .filter(|e| e.deprecation_status() != DeprecationStatus::Removed)
            .collect();
        due.sort_by_key(|e| e.next_review_date);
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{draft, test_service};
    use chrono::Duration;
    use radar_core::enums::StrategicValue;

    #[tokio::test]
    async fn add_assigns_identity_and_version() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Rust", Quadrant::LanguagesFrameworks, Ring::Adopt, StrategicValue::High), "arch")
            .await
            .unwrap();

        assert!(radar_core::ids::has_prefix(&entry.id, PREFIX_TECHNOLOGY));
        assert_eq!(entry.version, 1);
        assert_eq!(entry.movement, Movement::NoChange);
        assert_eq!(entry.created_by, "arch");
        assert_eq!(entry.next_review_date, entry.created_at + Duration::days(90));

        let fetched = svc.get_technology(&entry.id).await.unwrap();
        assert_eq!(fetched, entry);
    }

    #[tokio::test]
    async fn add_rejects_invalid_draft_with_all_errors() {
        let svc = test_service();
        let mut bad = draft("", Quadrant::Tools, Ring::Trial, StrategicValue::Low);
        bad.description = " ".into();
        bad.adoption_level = 101.0;

        let err = svc.add_technology(bad, "arch").await.unwrap_err();
        match err {
            RadarError::Validation { errors } => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(svc
            .list_technologies(&TechnologyFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let svc = test_service();
        let result = svc.get_technology("tec-ffffffff").await;
        assert!(matches!(result, Err(RadarError::NotFound { .. })));
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let svc = test_service();
        svc.add_technology(
            draft("Go", Quadrant::LanguagesFrameworks, Ring::Adopt, StrategicValue::High)
                .with_tags(["backend"]),
            "arch",
        )
        .await
        .unwrap();
        svc.add_technology(
            draft("Elm", Quadrant::LanguagesFrameworks, Ring::Assess, StrategicValue::Low)
                .with_tags(["frontend"]),
            "arch",
        )
        .await
        .unwrap();
        svc.add_technology(
            draft("Terraform", Quadrant::Tools, Ring::Adopt, StrategicValue::High)
                .with_tags(["infra", "backend"]),
            "arch",
        )
        .await
        .unwrap();

        let adopt = svc.list_technologies(&TechnologyFilter::ring(Ring::Adopt)).await.unwrap();
        assert_eq!(adopt.len(), 2);

        let filter = TechnologyFilter {
            quadrant: Some(Quadrant::LanguagesFrameworks),
            ring: Some(Ring::Adopt),
            ..Default::default()
        };
        let names: Vec<String> = svc
            .list_technologies(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Go"]);

        let tagged = TechnologyFilter {
            tags: vec!["backend".into(), "frontend".into()],
            ..Default::default()
        };
        let names: Vec<String> = svc
            .list_technologies(&tagged)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Elm", "Go", "Terraform"]);

        let none = TechnologyFilter {
            tags: vec!["mobile".into()],
            ..Default::default()
        };
        assert!(svc.list_technologies(&none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_filter_splits_active_and_deprecated() {
        let svc = test_service();
        let keep = svc
            .add_technology(draft("React", Quadrant::LanguagesFrameworks, Ring::Adopt, StrategicValue::High), "arch")
            .await
            .unwrap();
        let old = svc
            .add_technology(draft("Backbone", Quadrant::LanguagesFrameworks, Ring::Hold, StrategicValue::Low), "arch")
            .await
            .unwrap();
        svc.deprecate_technology(&old.id, crate::transitions::DeprecationRequest::new("unmaintained"), "arch")
            .await
            .unwrap();

        let active = svc
            .list_technologies(&TechnologyFilter {
                status: StatusFilter::Active,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, keep.id);

        let deprecated = svc
            .list_technologies(&TechnologyFilter {
                status: StatusFilter::Deprecated,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(deprecated.len(), 1);
        assert_eq!(deprecated[0].id, old.id);
    }

    #[tokio::test]
    async fn rationale_append_bumps_version_and_keeps_history() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Kotlin", Quadrant::LanguagesFrameworks, Ring::Trial, StrategicValue::Medium), "arch")
            .await
            .unwrap();

        let addition = RationaleAddition {
            pros: vec!["null safety".into()],
            note: Some("Android team reports good results".into()),
            ..Default::default()
        };
        let updated = svc.append_rationale(&entry.id, addition, "mobile-lead").await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.rationale.pros, vec!["null safety"]);
        assert_eq!(updated.rationale.log.len(), 1);
        assert_eq!(updated.rationale.log[0].actor, "mobile-lead");

        let again = svc
            .append_rationale(&entry.id, RationaleAddition::note("second note"), "arch")
            .await
            .unwrap();
        assert_eq!(again.version, 3);
        assert_eq!(again.rationale.log.len(), 2);
        assert_eq!(again.rationale.log[0].text, "Android team reports good results");
    }

    #[tokio::test]
    async fn empty_rationale_addition_is_rejected() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Scala", Quadrant::LanguagesFrameworks, Ring::Assess, StrategicValue::Low), "arch")
            .await
            .unwrap();
        let result = svc
            .append_rationale(&entry.id, RationaleAddition::note("  "), "arch")
            .await;
        assert!(matches!(result, Err(RadarError::Validation { .. })));
    }

    #[tokio::test]
    async fn reviews_due_after_cadence() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Docker", Quadrant::Platforms, Ring::Adopt, StrategicValue::High), "arch")
            .await
            .unwrap();

        assert!(svc.reviews_due(Utc::now()).await.unwrap().is_empty());
        let later = entry.created_at + Duration::days(91);
        let due = svc.reviews_due(later).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, entry.id);
    }
}
