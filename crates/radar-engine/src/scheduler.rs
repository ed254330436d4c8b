//! Deprecation scheduler.
//!
//! Turns the configured lifecycle periods into absolute dates, builds
//! recipient lists, and advances deprecation records by wall-clock
//! comparison. Nothing here self-schedules: a periodic caller passes `now`,
//! and repeating a call with the same `now` is a no-op.

use chrono::{DateTime, Duration, Utc};
use radar_config::{LifecycleConfig, NotificationConfig};
use radar_core::entities::{DeprecationRecord, Recipient};
use radar_core::enums::{DeprecationStatus, NoticeSeverity};
use radar_core::errors::RadarError;
use serde::Serialize;

/// Computed timeline for one deprecation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecationSchedule {
    pub deprecated_at: DateTime<Utc>,
    pub sunset_at: DateTime<Utc>,
    pub removal_at: DateTime<Utc>,
    /// Re-send points, latest offset first.
    pub reminders: Vec<ScheduledReminder>,
}

/// A "warn N days before removal" point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledReminder {
    pub offset_days: u32,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DeprecationScheduler {
    sunset_period: Duration,
    removal_period: Duration,
    /// Sorted descending, deduplicated.
    warn_offsets: Vec<u32>,
}

impl DeprecationScheduler {
    /// Build a scheduler from lifecycle configuration.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::SchedulingInconsistency` if the periods would put
    /// sunset at or before deprecation, removal at or before sunset, or a
    /// reminder outside the removal window.
    pub fn new(config: &LifecycleConfig) -> Result<Self, RadarError> {
        if config.sunset_period_days == 0 {
            return Err(RadarError::SchedulingInconsistency(
                "sunset period must be positive; sunset would not follow deprecation".into(),
            ));
        }
        if config.removal_period_days <= config.sunset_period_days {
            return Err(RadarError::SchedulingInconsistency(format!(
                "removal period ({} days) must exceed sunset period ({} days)",
                config.removal_period_days, config.sunset_period_days
            )));
        }
        if let Some(bad) = config
            .warn_before_removal_days
            .iter()
            .find(|d| **d == 0 || **d > config.removal_period_days)
        {
            return Err(RadarError::SchedulingInconsistency(format!(
                "reminder offset {bad} days falls outside the {} day removal window",
                config.removal_period_days
            )));
        }

        let mut warn_offsets = config.warn_before_removal_days.clone();
        warn_offsets.sort_unstable_by(|a, b| b.cmp(a));
        warn_offsets.dedup();

        Ok(Self {
            sunset_period: Duration::days(i64::from(config.sunset_period_days)),
            removal_period: Duration::days(i64::from(config.removal_period_days)),
            warn_offsets,
        })
    }

    #[must_use]
    pub fn warn_offsets(&self) -> &[u32] {
        &self.warn_offsets
    }

    /// Compute deprecation, sunset and removal dates starting at `now`.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::SchedulingInconsistency` if the computed dates are
    /// not strictly increasing (e.g. on date arithmetic overflow).
    pub fn schedule(&self, now: DateTime<Utc>) -> Result<DeprecationSchedule, RadarError> {
        let overflow =
            || RadarError::SchedulingInconsistency(format!("date overflow scheduling from {now}"));
        let sunset_at = now.checked_add_signed(self.sunset_period).ok_or_else(overflow)?;
        let removal_at = now
            .checked_add_signed(self.removal_period)
            .ok_or_else(overflow)?;

        if sunset_at <= now {
            return Err(RadarError::SchedulingInconsistency(format!(
                "sunset {sunset_at} does not follow deprecation {now}"
            )));
        }
        if removal_at <= sunset_at {
            return Err(RadarError::SchedulingInconsistency(format!(
                "removal {removal_at} does not follow sunset {sunset_at}"
            )));
        }

        Ok(DeprecationSchedule {
            deprecated_at: now,
            sunset_at,
            removal_at,
            reminders: self.reminders_for(removal_at),
        })
    }

    /// Reminder points for a given removal date.
    #[must_use]
    pub fn reminders_for(&self, removal_at: DateTime<Utc>) -> Vec<ScheduledReminder> {
        self.warn_offsets
            .iter()
            .map(|offset| ScheduledReminder {
                offset_days: *offset,
                at: removal_at - Duration::days(i64::from(*offset)),
            })
            .collect()
    }
}

/// Severity of the reminder sent `offset_days` before removal, given the
/// notice's configured offsets.
///
/// The last reminder before removal is critical; earlier ones never drop
/// below warning.
#[must_use]
pub fn reminder_severity(offsets: &[u32], offset_days: u32, base: NoticeSeverity) -> NoticeSeverity {
    if offsets.iter().min() == Some(&offset_days) {
        NoticeSeverity::Critical
    } else {
        base.max(NoticeSeverity::Warning)
    }
}

/// Build a deprecation record from a computed schedule.
#[must_use]
pub fn deprecation_record(
    schedule: &DeprecationSchedule,
    reason: &str,
    migration_path: Option<&str>,
    replacement_id: Option<&str>,
) -> DeprecationRecord {
    DeprecationRecord {
        status: DeprecationStatus::Deprecated,
        deprecated_date: Some(schedule.deprecated_at),
        sunset_date: Some(schedule.sunset_at),
        removal_date: Some(schedule.removal_at),
        reason: Some(reason.to_string()),
        migration_path: migration_path.map(String::from),
        replacement_id: replacement_id.map(String::from),
    }
}

/// Configured warning addresses plus one address per team, deduplicated by
/// address in first-seen order.
pub fn build_recipients<'a>(
    config: &NotificationConfig,
    teams: impl IntoIterator<Item = &'a str>,
) -> Vec<Recipient> {
    let mut recipients: Vec<Recipient> = Vec::new();
    let fixed = config
        .deprecation_warning_recipients
        .iter()
        .map(|r| Recipient::pending(r.channel, r.address.clone()));
    let per_team = teams
        .into_iter()
        .map(|team| Recipient::pending(config.team_channel, config.team_address(team)));

    for recipient in fixed.chain(per_team) {
        if !recipients.iter().any(|r| r.address == recipient.address) {
            recipients.push(recipient);
        }
    }
    recipients
}

/// Advance a deprecation record as far as `now` allows.
///
/// Returns each step taken, in order. `active` records are never touched:
/// that edge is operator-initiated. A phase whose date is missing is not
/// advanced.
pub fn advance_record(
    record: &mut DeprecationRecord,
    now: DateTime<Utc>,
) -> Vec<(DeprecationStatus, DeprecationStatus)> {
    let mut steps = Vec::new();
    loop {
        let due = match record.status {
            DeprecationStatus::Deprecated => record.sunset_date.is_some_and(|d| now >= d),
            DeprecationStatus::Sunset => record.removal_date.is_some_and(|d| now >= d),
            DeprecationStatus::Active | DeprecationStatus::Removed => false,
        };
        if !due {
            break;
        }
        let from = record.status;
        let Some(&to) = from.allowed_next_states().first() else {
            break;
        };
        record.status = to;
        steps.push((from, to));
    }
    steps
}
