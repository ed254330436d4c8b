//! API version repository: registration, lifecycle transitions,
//! deprecation and usage reporting.

use chrono::Utc;
use radar_core::entities::{ApiVersion, DeprecationNotice, NewApiVersion, UsageMetrics};
use radar_core::enums::{ApiLifecycleStatus, EntityKind, NoticeSeverity, TargetType};
use radar_core::errors::RadarError;
use radar_core::events::DomainEvent;
use radar_core::ids::PREFIX_API_VERSION;
use radar_core::validation::{validate_api_version, validate_usage};
use tracing::info;

use super::notice::NoticeDraft;
use crate::scheduler::{build_recipients, deprecation_record};
use crate::service::RadarService;
use crate::store::RadarStore;
use crate::transitions::DeprecationRequest;

#[derive(Debug, Clone, Default)]
pub struct ApiVersionFilter {
    pub api_name: Option<String>,
    pub status: Option<ApiLifecycleStatus>,
}

impl ApiVersionFilter {
    #[must_use]
    pub fn api(name: impl Into<String>) -> Self {
        Self {
            api_name: Some(name.into()),
            ..Default::default()
        }
    }

    fn matches(&self, api: &ApiVersion) -> bool {
        self.api_name.as_deref().is_none_or(|n| n == api.api_name)
            && self.status.is_none_or(|s| s == api.status)
    }
}

/// Result of deprecating an API version.
#[derive(Debug, Clone)]
pub struct ApiDeprecation {
    pub api_version: ApiVersion,
    pub notice: DeprecationNotice,
}

fn invalid_transition(api: &ApiVersion, to: ApiLifecycleStatus) -> RadarError {
    RadarError::InvalidTransition {
        entity: EntityKind::ApiVersion,
        id: api.id.clone(),
        from: api.status.to_string(),
        to: to.to_string(),
    }
}

impl<S: RadarStore> RadarService<S> {
    /// Register an API version.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` if the draft is invalid or starts in a
    /// deprecation phase.
    pub async fn add_api_version(
        &self,
        draft: NewApiVersion,
        actor: &str,
    ) -> Result<ApiVersion, RadarError> {
        let mut report = validate_api_version(&draft);
        if draft.status.deprecation_phase().is_some() {
            report.errors.push(format!(
                "an API version cannot be registered as {}",
                draft.status
            ));
            report.valid = false;
        }
        report.into_result()?;

        let now = Utc::now();
        let api = ApiVersion {
            id: Self::generate_id(PREFIX_API_VERSION),
            api_name: draft.api_name.trim().to_string(),
            strategy: draft.strategy,
            major: draft.major,
            minor: draft.minor,
            patch: draft.patch,
            status: draft.status,
            usage: UsageMetrics::default(),
            consumer_teams: draft.consumer_teams,
            deprecation: None,
            created_at: now,
            updated_at: now,
            version: 1,
        };
        self.insert_record(api.clone()).await?;
        info!(
            id = %api.id,
            api = %api.api_name,
            label = %api.label(),
            status = %api.status,
            actor,
            "api version registered"
        );
        Ok(api)
    }

    /// # Errors
    ///
    /// Returns `RadarError::NotFound` if the id is unknown.
    pub async fn get_api_version(&self, id: &str) -> Result<ApiVersion, RadarError> {
        self.fetch(id).await
    }

    /// API versions matching `filter`, ordered by name then version number.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn list_api_versions(
        &self,
        filter: &ApiVersionFilter,
    ) -> Result<Vec<ApiVersion>, RadarError> {
        let mut apis: Vec<ApiVersion> = self
            .list_records::<ApiVersion>()
            .await?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        apis.sort_by(|a, b| {
            a.api_name
                .cmp(&b.api_name)
                .then_with(|| (a.major, a.minor, a.patch).cmp(&(b.major, b.minor, b.patch)))
        });
        Ok(apis)
    }

    /// Move an API version forward through its pre-deprecation lifecycle.
    ///
    /// Deprecation phases are not reachable here: `deprecated` goes through
    /// [`Self::deprecate_api_version`], later phases through
    /// [`Self::advance_lifecycles`].
    ///
    /// # Errors
    ///
    /// Returns `RadarError::InvalidTransition` for a disallowed edge,
    /// `RadarError::NotFound` for an unknown id, or `RadarError::Conflict` on a
    /// concurrent write.
    pub async fn transition_api_version(
        &self,
        id: &str,
        to: ApiLifecycleStatus,
        actor: &str,
    ) -> Result<ApiVersion, RadarError> {
        let current: ApiVersion = self.fetch(id).await?;
        if to.deprecation_phase().is_some() || !current.status.can_transition_to(to) {
            return Err(invalid_transition(&current, to));
        }

        let mut next = current.clone();
        next.status = to;
        next.updated_at = Utc::now();
        next.version = current.version + 1;
        self.swap(current.version, next.clone()).await?;
        info!(id, from = %current.status, to = %to, actor, "api version transitioned");
        Ok(next)
    }

    /// Deprecate an API version and notify its consumers.
    ///
    /// Dates and recipient rules match technology deprecation; team
    /// recipients come from `consumer_teams`.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for a blank reason,
    /// `RadarError::InvalidTransition` if the version cannot be deprecated from
    /// its current status, `RadarError::NotFound` for an unknown id, or
    /// `RadarError::Conflict` on a concurrent write.
    pub async fn deprecate_api_version(
        &self,
        id: &str,
        request: DeprecationRequest,
        actor: &str,
    ) -> Result<ApiDeprecation, RadarError> {
        request.validate()?;
        let current: ApiVersion = self.fetch(id).await?;
        if !current
            .status
            .can_transition_to(ApiLifecycleStatus::Deprecated)
        {
            return Err(invalid_transition(&current, ApiLifecycleStatus::Deprecated));
        }

        let schedule = self.scheduler().schedule(Utc::now())?;
        let mut next = current.clone();
        next.status = ApiLifecycleStatus::Deprecated;
        next.deprecation = Some(deprecation_record(
            &schedule,
            &request.reason,
            request.migration_path.as_deref(),
            request.replacement_id.as_deref(),
        ));
        next.updated_at = schedule.deprecated_at;
        next.version = current.version + 1;
        self.swap(current.version, next.clone()).await?;

        let recipients = build_recipients(
            &self.config().notifications,
            next.consumer_teams.iter().map(String::as_str),
        );
        let notice = self
            .issue_notice(
                NoticeDraft {
                    target_type: TargetType::ApiVersion,
                    target_id: next.id.clone(),
                    target_name: format!("{} {}", next.api_name, next.label()),
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
            api = %next.api_name,
            label = %next.label(),
            sunset = %schedule.sunset_at,
            removal = %schedule.removal_at,
            actor,
            "api version deprecated"
        );
        self.emit(&DomainEvent::ApiVersionDeprecated {
            id: next.id.clone(),
            api_name: next.api_name.clone(),
            label: next.label(),
            reason: request.reason,
            notice_id: notice.id.clone(),
        });

        Ok(ApiDeprecation {
            api_version: next,
            notice,
        })
    }

    /// Replace the usage metrics of an API version.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for out-of-range metrics,
    /// `RadarError::Conflict` if `expected_version` is stale, or
    /// `RadarError::NotFound` for an unknown id.
    pub async fn record_api_usage(
        &self,
        id: &str,
        expected_version: u64,
        metrics: UsageMetrics,
    ) -> Result<ApiVersion, RadarError> {
        validate_usage(&metrics).into_result()?;
        let current: ApiVersion = self.fetch(id).await?;
        if current.version != expected_version {
            return Err(RadarError::Conflict {
                entity: EntityKind::ApiVersion,
                id: id.to_string(),
                expected: expected_version,
                actual: current.version,
            });
        }

        let mut next = current;
        next.usage = metrics;
        next.updated_at = Utc::now();
        next.version = expected_version + 1;
        self.swap(expected_version, next.clone()).await?;
        Ok(next)
    }
}
