//! State transition engine.
//!
//! Ring moves, explicit deprecation, detail revisions and the periodic
//! lifecycle sweep. Every method here is the only way its fields change:
//! `ring`, `movement` and `deprecation` are never written anywhere else.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use radar_core::entities::{ApiVersion, DeprecationNotice, RationaleNote, TechnologyEntry};
use radar_core::enums::{
    ApiLifecycleStatus, DeprecationStatus, EntityKind, Movement, NoticeSeverity, Ring, TargetType,
};
use radar_core::errors::RadarError;
use radar_core::events::DomainEvent;
use radar_core::validation::validate_entry;
use serde::Serialize;
use tracing::{debug, info};

use crate::repos::notice::NoticeDraft;
use crate::scheduler::{advance_record, build_recipients, deprecation_record};
use crate::service::RadarService;
use crate::store::RadarStore;
use crate::updates::technology::TechnologyUpdate;

/// Operator input for an explicit deprecation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeprecationRequest {
    pub reason: String,
    pub migration_path: Option<String>,
    /// Weak reference to the successor; not checked for existence.
    pub replacement_id: Option<String>,
}

impl DeprecationRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_migration_path(mut self, path: impl Into<String>) -> Self {
        self.migration_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_replacement(mut self, id: impl Into<String>) -> Self {
        self.replacement_id = Some(id.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), RadarError> {
        if self.reason.trim().is_empty() {
            return Err(RadarError::invalid("deprecation reason is required"));
        }
        Ok(())
    }
}

/// Result of deprecating a technology.
#[derive(Debug, Clone)]
pub struct Deprecation {
    pub entry: TechnologyEntry,
    pub notice: DeprecationNotice,
}

/// Result of a ring move. `notice` is set when the move entered `hold`.
#[derive(Debug, Clone)]
pub struct RingMoveOutcome {
    pub entry: TechnologyEntry,
    pub notice: Option<DeprecationNotice>,
}

/// One status step taken by [`RadarService::advance_lifecycles`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleChange {
    pub target_type: TargetType,
    pub id: String,
    pub from: DeprecationStatus,
    pub to: DeprecationStatus,
}

/// API status matching a deprecation phase.
const fn api_status_for(phase: DeprecationStatus) -> Option<ApiLifecycleStatus> {
    match phase {
        DeprecationStatus::Deprecated => Some(ApiLifecycleStatus::Deprecated),
        DeprecationStatus::Sunset => Some(ApiLifecycleStatus::Sunset),
        DeprecationStatus::Removed => Some(ApiLifecycleStatus::Removed),
        DeprecationStatus::Active => None,
    }
}

impl<S: RadarStore> RadarService<S> {
    /// Move a technology to `ring`.
    ///
    /// Records a rationale line, derives `movement` from the two ring ranks,
    /// pushes the next review date out by the configured cadence and bumps
    /// the version. For a technology that is not yet deprecated, entering
    /// `hold` from another ring issues an informational notice with the
    /// projected timeline and emits [`DomainEvent::TechnologyDeprecated`], and
    /// leaving `hold` withdraws that notice. The deprecation record itself is
    /// only written by [`Self::deprecate_technology`], and once it exists ring
    /// moves leave its notices alone.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::NotFound` for an unknown id,
    /// `RadarError::InvalidTransition` for a technology that has been removed,
    /// or `RadarError::Conflict` on a concurrent write.
    pub async fn move_technology(
        &self,
        id: &str,
        ring: Ring,
        rationale: &str,
        actor: &str,
    ) -> Result<RingMoveOutcome, RadarError> {
        let current: TechnologyEntry = self.fetch(id).await?;
        if current.deprecation_status() == DeprecationStatus::Removed {
            return Err(RadarError::InvalidTransition {
                entity: EntityKind::Technology,
                id: id.to_string(),
                from: DeprecationStatus::Removed.to_string(),
                to: ring.to_string(),
            });
        }

        let from = current.ring;
        let now = Utc::now();
        let active = current.deprecation_status() == DeprecationStatus::Active;
        let entering_hold = active && ring == Ring::Hold && from != Ring::Hold;
        let leaving_hold = active && from == Ring::Hold && ring != Ring::Hold;
        let schedule = if entering_hold {
            Some(self.scheduler().schedule(now)?)
        } else {
            None
        };

        let mut next = current.clone();
        next.ring = ring;
        next.movement = from.movement_to(ring);
        next.rationale.log.push(RationaleNote {
            at: now,
            actor: actor.to_string(),
            text: format!("Moved from {from} to {ring}: {rationale}"),
        });
        next.next_review_date = self.next_review_after(now);
        next.updated_at = now;
        next.updated_by = actor.to_string();
        next.version = current.version + 1;
        self.swap(current.version, next.clone()).await?;

        info!(
            id,
            from = %from,
            to = %ring,
            movement = %next.movement,
            version = next.version,
            actor,
            "technology moved"
        );
        if from != ring {
            self.emit(&DomainEvent::RingMoved {
                id: next.id.clone(),
                from,
                to: ring,
            });
        }
        if leaving_hold {
            self.withdraw_notices(&next.id).await?;
        }

        let notice = match schedule {
            Some(schedule) => {
                let recipients = build_recipients(
                    &self.config().notifications,
                    next.team_usage.iter().map(|u| u.team.as_str()),
                );
                let notice = self
                    .issue_notice(
                        NoticeDraft {
                            target_type: TargetType::Technology,
                            target_id: next.id.clone(),
                            target_name: next.name.clone(),
                            severity: NoticeSeverity::Info,
                            reason: Some(rationale.to_string()),
                            migration_guidance: None,
                            replacement_id: None,
                        },
                        &schedule,
                        recipients,
                    )
                    .await?;
                self.emit(&DomainEvent::TechnologyDeprecated {
                    id: next.id.clone(),
                    name: next.name.clone(),
                    strategic_value: next.strategic_value(),
                    reason: rationale.to_string(),
                    notice_id: notice.id.clone(),
                });
                Some(notice)
            }
            None => None,
        };

        Ok(RingMoveOutcome {
            entry: next,
            notice,
        })
    }

    /// Explicitly deprecate a technology.
    ///
    /// Forces `ring = hold` and `movement = out`, stamps deprecation, sunset
    /// and removal dates from the configured periods, and issues a warning
    /// notice to every configured address plus one per team using it. Any
    /// informational notice from an earlier move into `hold` is withdrawn.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for a blank reason,
    /// `RadarError::NotFound` for an unknown id,
    /// `RadarError::InvalidTransition` if it is already deprecated,
    /// `RadarError::SchedulingInconsistency` if the dates come out of order,
    /// or `RadarError::Conflict` on a concurrent write.
    pub async fn deprecate_technology(
        &self,
        id: &str,
        request: DeprecationRequest,
        actor: &str,
    ) -> Result<Deprecation, RadarError> {
        request.validate()?;
        let current: TechnologyEntry = self.fetch(id).await?;
        let status = current.deprecation_status();
        if !status.can_transition_to(DeprecationStatus::Deprecated) {
            return Err(RadarError::InvalidTransition {
                entity: EntityKind::Technology,
                id: id.to_string(),
                from: status.to_string(),
                to: DeprecationStatus::Deprecated.to_string(),
            });
        }

        let schedule = self.scheduler().schedule(Utc::now())?;
        let from = current.ring;
        let mut next = current.clone();
        next.ring = Ring::Hold;
        next.movement = Movement::Out;
        next.deprecation = Some(deprecation_record(
            &schedule,
            &request.reason,
            request.migration_path.as_deref(),
            request.replacement_id.as_deref(),
        ));
        next.rationale.log.push(RationaleNote {
            at: schedule.deprecated_at,
            actor: actor.to_string(),
            text: format!("Deprecated: {}", request.reason),
        });
        next.updated_at = schedule.deprecated_at;
        next.updated_by = actor.to_string();
        next.version = current.version + 1;
        self.swap(current.version, next.clone()).await?;
        self.withdraw_notices(&next.id).await?;

        let recipients = build_recipients(
            &self.config().notifications,
            next.team_usage.iter().map(|u| u.team.as_str()),
        );
        let notice = self
            .issue_notice(
                NoticeDraft {
                    target_type: TargetType::Technology,
                    target_id: next.id.clone(),
                    target_name: next.name.clone(),
                    severity: NoticeSeverity::Warning,
                    reason: Some(request.reason.clone()),
                    migration_guidance: request.migration_path,
                    replacement_id: request.replacement_id,
                },
                &schedule,
                recipients,
            )
            .await?;

        info!(
            id,
            name = %next.name,
            sunset = %schedule.sunset_at,
            removal = %schedule.removal_at,
            actor,
            "technology deprecated"
        );
        if from != Ring::Hold {
            self.emit(&DomainEvent::RingMoved {
                id: next.id.clone(),
                from,
                to: Ring::Hold,
            });
        }
        self.emit(&DomainEvent::TechnologyDeprecated {
            id: next.id.clone(),
            name: next.name.clone(),
            strategic_value: next.strategic_value(),
            reason: request.reason,
            notice_id: notice.id.clone(),
        });

        Ok(Deprecation {
            entry: next,
            notice,
        })
    }

    /// Apply a detail revision to non-lifecycle fields.
    ///
    /// The caller passes the version it read; a mismatch fails with
    /// `Conflict` before anything is written. The overall score is
    /// recomputed from the assessment and the result is validated as a whole.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for an empty update or an invalid
    /// result, `RadarError::Conflict` for a stale version, or
    /// `RadarError::NotFound` for an unknown id.
    pub async fn revise_technology(
        &self,
        id: &str,
        expected_version: u64,
        update: TechnologyUpdate,
        actor: &str,
    ) -> Result<TechnologyEntry, RadarError> {
        if update.is_empty() {
            return Err(RadarError::invalid("update carries no changes"));
        }
        let current: TechnologyEntry = self.fetch(id).await?;
        if current.version != expected_version {
            return Err(RadarError::Conflict {
                entity: EntityKind::Technology,
                id: id.to_string(),
                expected: expected_version,
                actual: current.version,
            });
        }

        let mut next = current;
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(assessment) = update.assessment {
            next.assessment = assessment;
        }
        if let Some(impact) = update.business_impact {
            next.business_impact = impact;
        }
        if let Some(relationships) = update.relationships {
            next.relationships = relationships;
        }
        if let Some(level) = update.adoption_level {
            next.adoption_level = level;
        }
        if let Some(tags) = update.tags {
            next.tags = tags;
        }
        if let Some(usage) = update.team_usage {
            match next.team_usage.iter_mut().find(|u| u.team == usage.team) {
                Some(existing) => *existing = usage,
                None => next.team_usage.push(usage),
            }
        }
        next.overall_score = next.assessment.overall();
        validate_entry(&next).into_result()?;

        next.updated_at = Utc::now();
        next.updated_by = actor.to_string();
        next.version = expected_version + 1;
        self.swap(expected_version, next.clone()).await?;
        info!(id, version = next.version, actor, "technology revised");
        Ok(next)
    }

    /// Advance every deprecation record as far as `now` allows.
    ///
    /// `deprecated → sunset` once `now >= sunset_date`, `sunset → removed`
    /// once `now >= removal_date`; both steps may happen in one call. API
    /// statuses follow their records. Open notices of every target stored as
    /// removed are retired, including targets removed by an earlier sweep
    /// that stopped on a conflict.
    /// Calling again with the same `now` changes nothing.
    ///
    /// # Errors
    ///
    /// Returns a store error, or `RadarError::Conflict` if a record changed
    /// concurrently (the sweep can simply be re-run).
    pub async fn advance_lifecycles(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<LifecycleChange>, RadarError> {
        let mut changes = Vec::new();

        for entry in self.list_records::<TechnologyEntry>().await? {
            let Some(mut record) = entry.deprecation.clone() else {
                continue;
            };
            let steps = advance_record(&mut record, now);
            if steps.is_empty() {
                continue;
            }
            let mut next = entry.clone();
            next.deprecation = Some(record);
            next.updated_at = now;
            next.version = entry.version + 1;
            self.swap(entry.version, next).await?;
            self.record_steps(TargetType::Technology, &entry.id, &steps, now, &mut changes);
        }

        for api in self.list_records::<ApiVersion>().await? {
            let Some(mut record) = api.deprecation.clone() else {
                continue;
            };
            let steps = advance_record(&mut record, now);
            if steps.is_empty() {
                continue;
            }
            let mut next = api.clone();
            if let Some(status) = api_status_for(record.status) {
                next.status = status;
            }
            next.deprecation = Some(record);
            next.updated_at = now;
            next.version = api.version + 1;
            self.swap(api.version, next).await?;
            self.record_steps(TargetType::ApiVersion, &api.id, &steps, now, &mut changes);
        }

        self.retire_notices().await?;
        debug!(steps = changes.len(), "lifecycle sweep finished");
        Ok(changes)
    }

    fn record_steps(
        &self,
        target_type: TargetType,
        id: &str,
        steps: &[(DeprecationStatus, DeprecationStatus)],
        at: DateTime<Utc>,
        changes: &mut Vec<LifecycleChange>,
    ) {
        for &(from, to) in steps {
            info!(%target_type, id, from = %from, to = %to, "lifecycle advanced");
            self.emit(&DomainEvent::LifecycleAdvanced {
                target_type,
                id: id.to_string(),
                from,
                to,
                at,
            });
            changes.push(LifecycleChange {
                target_type,
                id: id.to_string(),
                from,
                to,
            });
        }
    }

    async fn retire_notices(&self) -> Result<(), RadarError> {
        let mut removed: HashSet<String> = self
            .list_records::<TechnologyEntry>()
            .await?
            .into_iter()
            .filter(|e| e.deprecation_status() == DeprecationStatus::Removed)
            .map(|e| e.id)
            .collect();
        removed.extend(
            self.list_records::<ApiVersion>()
                .await?
                .into_iter()
                .filter(|a| a.status == ApiLifecycleStatus::Removed)
                .map(|a| a.id),
        );
        if removed.is_empty() {
            return Ok(());
        }
        for notice in self.list_records::<DeprecationNotice>().await? {
            if !notice.is_open() || !removed.contains(&notice.target_id) {
                continue;
            }
            let mut next = notice.clone();
            next.retired = true;
            next.revision = notice.revision + 1;
            self.swap(notice.revision, next).await?;
            debug!(id = %notice.id, target = %notice.target_id, "notice retired");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLog, MemoryIncidentSink};
    use crate::test_support::helpers::{draft, new_api, team_usage, test_service};
    use crate::updates::technology::TechnologyUpdateBuilder;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use radar_core::entities::Assessment;
    use radar_core::enums::{Quadrant, StrategicValue};
    use std::sync::Arc;

    #[tokio::test]
    async fn move_records_movement_and_rationale() {
        let log = Arc::new(EventLog::new());
        let svc = test_service().with_handler(log.clone());
        let entry = svc
            .add_technology(draft("Deno", Quadrant::Platforms, Ring::Assess, StrategicValue::Medium), "arch")
            .await
            .unwrap();

        let outcome = svc
            .move_technology(&entry.id, Ring::Trial, "two teams piloting", "arch")
            .await
            .unwrap();
        let moved = outcome.entry;
        assert_eq!(moved.ring, Ring::Trial);
        assert_eq!(moved.movement, Movement::In);
        assert_eq!(moved.version, 2);
        assert!(outcome.notice.is_none());
        assert_eq!(
            moved.rationale.log.last().map(|n| n.text.as_str()),
            Some("Moved from assess to trial: two teams piloting")
        );
        assert!(moved.next_review_date > entry.next_review_date);

        let events = log.events();
        assert_eq!(
            events,
            vec![DomainEvent::RingMoved {
                id: entry.id.clone(),
                from: Ring::Assess,
                to: Ring::Trial,
            }]
        );
    }

    #[tokio::test]
    async fn same_ring_move_is_no_change_but_still_versioned() {
        let log = Arc::new(EventLog::new());
        let svc = test_service().with_handler(log.clone());
        let entry = svc
            .add_technology(draft("Nix", Quadrant::Tools, Ring::Assess, StrategicValue::Low), "arch")
            .await
            .unwrap();

        let moved = svc
            .move_technology(&entry.id, Ring::Assess, "re-reviewed", "arch")
            .await
            .unwrap()
            .entry;
        assert_eq!(moved.movement, Movement::NoChange);
        assert_eq!(moved.version, 2);
        assert!(log.events().is_empty());
    }

    #[tokio::test]
    async fn move_to_hold_issues_info_notice_and_escalates() {
        let sink = Arc::new(MemoryIncidentSink::new());
        let svc = test_service().with_incident_sink(sink.clone());
        let entry = svc
            .add_technology(
                draft("Kafka", Quadrant::Platforms, Ring::Adopt, StrategicValue::Critical)
                    .with_team_usage(team_usage("streaming")),
                "arch",
            )
            .await
            .unwrap();

        let outcome = svc
            .move_technology(&entry.id, Ring::Hold, "operational cost", "arch")
            .await
            .unwrap();
        assert_eq!(outcome.entry.movement, Movement::Out);
        assert!(outcome.entry.deprecation.is_none());

        let notice = outcome.notice.unwrap();
        assert_eq!(notice.severity, NoticeSeverity::Info);
        assert_eq!(notice.sunset_date, notice.deprecation_date + Duration::days(180));
        assert!(notice.recipients.iter().any(|r| r.address == "#streaming"));

        let requests = sink.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].metadata["notice_id"], notice.id);
    }

    #[tokio::test]
    async fn hold_to_hold_does_not_escalate() {
        let sink = Arc::new(MemoryIncidentSink::new());
        let svc = test_service().with_incident_sink(sink.clone());
        let entry = svc
            .add_technology(draft("Flash", Quadrant::Platforms, Ring::Hold, StrategicValue::High), "arch")
            .await
            .unwrap();

        let outcome = svc
            .move_technology(&entry.id, Ring::Hold, "still on hold", "arch")
            .await
            .unwrap();
        assert!(outcome.notice.is_none());
        assert!(sink.requests().is_empty());
    }

    #[tokio::test]
    async fn low_value_hold_does_not_escalate() {
        let sink = Arc::new(MemoryIncidentSink::new());
        let svc = test_service().with_incident_sink(sink.clone());
        let entry = svc
            .add_technology(draft("Grunt", Quadrant::Tools, Ring::Trial, StrategicValue::Low), "arch")
            .await
            .unwrap();
        let outcome = svc
            .move_technology(&entry.id, Ring::Hold, "replaced by npm scripts", "arch")
            .await
            .unwrap();
        assert!(outcome.notice.is_some());
        assert!(sink.requests().is_empty());
    }

    #[tokio::test]
    async fn deprecate_stamps_ordered_dates() {
        let svc = test_service();
        let entry = svc
            .add_technology(
                draft("Moment.js", Quadrant::LanguagesFrameworks, Ring::Trial, StrategicValue::Medium)
                    .with_team_usage(team_usage("web"))
                    .with_team_usage(team_usage("admin")),
                "arch",
            )
            .await
            .unwrap();

        let result = svc
            .deprecate_technology(
                &entry.id,
                DeprecationRequest::new("in maintenance mode")
                    .with_migration_path("Use date-fns")
                    .with_replacement("tec-0000beef"),
                "arch",
            )
            .await
            .unwrap();

        let deprecated = result.entry;
        assert_eq!(deprecated.ring, Ring::Hold);
        assert_eq!(deprecated.movement, Movement::Out);
        assert_eq!(deprecated.version, 2);
        let record = deprecated.deprecation.unwrap();
        assert_eq!(record.status, DeprecationStatus::Deprecated);
        let (d, s, r) = (
            record.deprecated_date.unwrap(),
            record.sunset_date.unwrap(),
            record.removal_date.unwrap(),
        );
        assert!(s > d && r > s);
        assert_eq!(r, d + Duration::days(365));
        assert_eq!(record.replacement_id.as_deref(), Some("tec-0000beef"));

        let notice = result.notice;
        assert_eq!(notice.severity, NoticeSeverity::Warning);
        assert_eq!(notice.migration_guidance.as_deref(), Some("Use date-fns"));
        let addresses: Vec<&str> = notice.recipients.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["architecture@corp.internal", "#web", "#admin"]);
    }

    #[tokio::test]
    async fn deprecating_twice_is_invalid() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Bower", Quadrant::Tools, Ring::Hold, StrategicValue::Low), "arch")
            .await
            .unwrap();
        svc.deprecate_technology(&entry.id, DeprecationRequest::new("dead"), "arch")
            .await
            .unwrap();
        let again = svc
            .deprecate_technology(&entry.id, DeprecationRequest::new("still dead"), "arch")
            .await;
        assert!(matches!(again, Err(RadarError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn deprecate_unknown_is_not_found() {
        let svc = test_service();
        let result = svc
            .deprecate_technology("tec-ffffffff", DeprecationRequest::new("gone"), "arch")
            .await;
        assert!(matches!(result, Err(RadarError::NotFound { .. })));
    }

    #[tokio::test]
    async fn blank_reason_is_rejected() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Gulp", Quadrant::Tools, Ring::Assess, StrategicValue::Low), "arch")
            .await
            .unwrap();
        let result = svc
            .deprecate_technology(&entry.id, DeprecationRequest::new("   "), "arch")
            .await;
        assert!(matches!(result, Err(RadarError::Validation { .. })));
        assert_eq!(svc.get_technology(&entry.id).await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn revision_recomputes_overall_and_checks_version() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Svelte", Quadrant::LanguagesFrameworks, Ring::Assess, StrategicValue::Medium), "arch")
            .await
            .unwrap();

        let update = TechnologyUpdateBuilder::new()
            .assessment(Assessment::uniform(5))
            .tags(["frontend"])
            .build();
        let revised = svc
            .revise_technology(&entry.id, 1, update.clone(), "web-lead")
            .await
            .unwrap();
        assert_eq!(revised.version, 2);
        assert!((revised.overall_score - 5.0).abs() < f64::EPSILON);
        assert_eq!(revised.tags, vec!["frontend"]);
        assert_eq!(revised.ring, Ring::Assess);

        let stale = svc.revise_technology(&entry.id, 1, update, "web-lead").await;
        assert!(matches!(
            stale,
            Err(RadarError::Conflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        assert_eq!(svc.get_technology(&entry.id).await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn invalid_revision_is_not_applied() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Vue", Quadrant::LanguagesFrameworks, Ring::Trial, StrategicValue::Medium), "arch")
            .await
            .unwrap();
        let update = TechnologyUpdateBuilder::new()
            .description(" ")
            .adoption_level(150.0)
            .build();
        let result = svc.revise_technology(&entry.id, 1, update, "arch").await;
        match result {
            Err(RadarError::Validation { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(svc.get_technology(&entry.id).await.unwrap(), entry);
    }

    #[tokio::test]
    async fn team_usage_revision_replaces_same_team() {
        let svc = test_service();
        let entry = svc
            .add_technology(
                draft("Jest", Quadrant::Tools, Ring::Adopt, StrategicValue::Medium)
                    .with_team_usage(team_usage("web")),
                "arch",
            )
            .await
            .unwrap();
        let mut usage = team_usage("web");
        usage.projects = vec!["storefront".into()];
        let revised = svc
            .revise_technology(
                &entry.id,
                1,
                TechnologyUpdateBuilder::new().team_usage(usage).build(),
                "arch",
            )
            .await
            .unwrap();
        assert_eq!(revised.team_usage.len(), 1);
        assert_eq!(revised.team_usage[0].projects, vec!["storefront"]);
    }

    #[tokio::test]
    async fn sweep_advances_and_is_idempotent() {
        let log = Arc::new(EventLog::new());
        let svc = test_service().with_handler(log.clone());
        let entry = svc
            .add_technology(draft("CoffeeScript", Quadrant::LanguagesFrameworks, Ring::Hold, StrategicValue::Low), "arch")
            .await
            .unwrap();
        let deprecation = svc
            .deprecate_technology(&entry.id, DeprecationRequest::new("superseded by TypeScript"), "arch")
            .await
            .unwrap();
        let record = deprecation.entry.deprecation.clone().unwrap();
        log.drain();

        let early = record.sunset_date.unwrap() - Duration::days(1);
        assert!(svc.advance_lifecycles(early).await.unwrap().is_empty());

        let after_sunset = record.sunset_date.unwrap() + Duration::days(1);
        let changes = svc.advance_lifecycles(after_sunset).await.unwrap();
        assert_eq!(
            changes,
            vec![LifecycleChange {
                target_type: TargetType::Technology,
                id: entry.id.clone(),
                from: DeprecationStatus::Deprecated,
                to: DeprecationStatus::Sunset,
            }]
        );
        assert!(svc.advance_lifecycles(after_sunset).await.unwrap().is_empty());
        assert_eq!(svc.get_technology(&entry.id).await.unwrap().version, 3);

        let after_removal = record.removal_date.unwrap();
        let changes = svc.advance_lifecycles(after_removal).await.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].to, DeprecationStatus::Removed);
        assert_eq!(log.events().len(), 2);

        let notice = svc.get_notice(&deprecation.notice.id).await.unwrap();
        assert!(notice.retired);

        let moved = svc
            .move_technology(&entry.id, Ring::Assess, "revived", "arch")
            .await;
        assert!(matches!(moved, Err(RadarError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn sweep_moves_api_status_with_record() {
        let svc = test_service();
        let api = svc
            .add_api_version(new_api("inventory", 1, ApiLifecycleStatus::Stable), "platform")
            .await
            .unwrap();
        let deprecated = svc
            .deprecate_api_version(&api.id, DeprecationRequest::new("v2 is live"), "platform")
            .await
            .unwrap();
        let removal = deprecated
            .api_version
            .deprecation
            .as_ref()
            .and_then(|d| d.removal_date)
            .unwrap();

        let changes = svc.advance_lifecycles(removal).await.unwrap();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.target_type == TargetType::ApiVersion));

        let swept = svc.get_api_version(&api.id).await.unwrap();
        assert_eq!(swept.status, ApiLifecycleStatus::Removed);
        assert_eq!(swept.version, deprecated.api_version.version + 1);
    }

    #[tokio::test]
    async fn leaving_hold_withdraws_projected_notice() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Go", Quadrant::LanguagesFrameworks, Ring::Adopt, StrategicValue::Medium), "arch")
            .await
            .unwrap();
        let notice = svc
            .move_technology(&entry.id, Ring::Hold, "hiring pool", "arch")
            .await
            .unwrap()
            .notice
            .unwrap();

        let back = svc
            .move_technology(&entry.id, Ring::Adopt, "hiring recovered", "arch")
            .await
            .unwrap();
        assert!(back.notice.is_none());
        assert!(back.entry.deprecation.is_none());

        let removal = notice.removal_date;
        assert!(svc.reminders_due(removal - Duration::days(7)).await.unwrap().is_empty());
        assert!(svc.overdue_notices(removal + Duration::days(1)).await.unwrap().is_empty());
        assert!(svc.get_notice(&notice.id).await.unwrap().withdrawn);
    }

    #[tokio::test]
    async fn deprecation_supersedes_projected_notice() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Mercurial", Quadrant::Tools, Ring::Trial, StrategicValue::Low), "arch")
            .await
            .unwrap();
        let projected = svc
            .move_technology(&entry.id, Ring::Hold, "git everywhere", "arch")
            .await
            .unwrap()
            .notice
            .unwrap();
        let deprecation = svc
            .deprecate_technology(&entry.id, DeprecationRequest::new("migrate to git"), "arch")
            .await
            .unwrap();

        let open = svc
            .list_notices(&crate::repos::notice::NoticeFilter::for_target(entry.id.clone()))
            .await
            .unwrap();
        assert_eq!(open, vec![deprecation.notice.clone()]);
        assert!(svc.get_notice(&projected.id).await.unwrap().withdrawn);
    }

    #[tokio::test]
    async fn deprecated_hold_reentry_keeps_existing_timeline() {
        let sink = Arc::new(MemoryIncidentSink::new());
        let svc = test_service().with_incident_sink(sink.clone());
        let entry = svc
            .add_technology(draft("Perl", Quadrant::LanguagesFrameworks, Ring::Hold, StrategicValue::High), "arch")
            .await
            .unwrap();
        let deprecation = svc
            .deprecate_technology(&entry.id, DeprecationRequest::new("no maintainers"), "arch")
            .await
            .unwrap();
        assert_eq!(sink.requests().len(), 1);

        svc.move_technology(&entry.id, Ring::Assess, "one team still on it", "arch")
            .await
            .unwrap();
        let again = svc
            .move_technology(&entry.id, Ring::Hold, "that team moved on", "arch")
            .await
            .unwrap();
        assert!(again.notice.is_none());
        assert_eq!(again.entry.deprecation, deprecation.entry.deprecation);
        assert_eq!(sink.requests().len(), 1);

        let notice = svc.get_notice(&deprecation.notice.id).await.unwrap();
        assert!(notice.is_open());
    }

    #[tokio::test]
    async fn sweep_retires_notices_of_already_removed_targets() {
        let svc = test_service();
        let entry = svc
            .add_technology(draft("Bower", Quadrant::Tools, Ring::Hold, StrategicValue::Low), "arch")
            .await
            .unwrap();
        let deprecation = svc
            .deprecate_technology(&entry.id, DeprecationRequest::new("npm covers it"), "arch")
            .await
            .unwrap();
        let mut record = deprecation.entry.deprecation.clone().unwrap();
        let removal = record.removal_date.unwrap();

        // A previous sweep stored the removal, then stopped before retiring.
        assert_eq!(advance_record(&mut record, removal).len(), 2);
        let mut removed = deprecation.entry.clone();
        removed.deprecation = Some(record);
        removed.version += 1;
        svc.swap(deprecation.entry.version, removed).await.unwrap();
        assert!(svc.get_notice(&deprecation.notice.id).await.unwrap().is_open());

        assert!(svc.advance_lifecycles(removal).await.unwrap().is_empty());
        let notice = svc.get_notice(&deprecation.notice.id).await.unwrap();
        assert!(notice.retired);
        assert_eq!(svc.overdue_notices(removal).await.unwrap(), vec![notice]);
    }
}
