//! Deprecation notice repository: issuing, delivery reports,
//! acknowledgments and reminder bookkeeping.

use chrono::{DateTime, Duration, Utc};
use radar_core::entities::{Acknowledgment, DeprecationNotice, Recipient};
use radar_core::enums::{NoticeSeverity, TargetType};
use radar_core::errors::RadarError;
use radar_core::ids::PREFIX_NOTICE;
use serde::Serialize;
use tracing::{info, warn};

use crate::scheduler::{DeprecationSchedule, reminder_severity};
use crate::service::RadarService;
use crate::store::RadarStore;

/// Target and wording of a notice about to be issued.
pub(crate) struct NoticeDraft {
    pub target_type: TargetType,
    pub target_id: String,
    pub target_name: String,
    pub severity: NoticeSeverity,
    pub reason: Option<String>,
    pub migration_guidance: Option<String>,
    pub replacement_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NoticeFilter {
    pub target_type: Option<TargetType>,
    pub target_id: Option<String>,
    /// Include retired and withdrawn notices.
    pub include_retired: bool,
}

impl NoticeFilter {
    #[must_use]
    pub fn for_target(target_id: impl Into<String>) -> Self {
        Self {
            target_id: Some(target_id.into()),
            ..Default::default()
        }
    }

    fn matches(&self, notice: &DeprecationNotice) -> bool {
        self.target_type.is_none_or(|t| t == notice.target_type)
            && self
                .target_id
                .as_deref()
                .is_none_or(|id| id == notice.target_id)
            && (self.include_retired || notice.is_open())
    }
}

/// A reminder threshold that has been crossed but not yet reported as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderDue {
    pub notice_id: String,
    pub target_id: String,
    pub offset_days: u32,
    pub due_at: DateTime<Utc>,
    pub severity: NoticeSeverity,
}

impl<S: RadarStore> RadarService<S> {
    /// Store a new notice for `schedule`.
    pub(crate) async fn issue_notice(
        &self,
        draft: NoticeDraft,
        schedule: &DeprecationSchedule,
        recipients: Vec<Recipient>,
    ) -> Result<DeprecationNotice, RadarError> {
        let notice = DeprecationNotice {
            id: Self::generate_id(PREFIX_NOTICE),
            target_type: draft.target_type,
            target_id: draft.target_id,
            target_name: draft.target_name,
            severity: draft.severity,
            reason: draft.reason,
            notice_date: schedule.deprecated_at,
            deprecation_date: schedule.deprecated_at,
            sunset_date: schedule.sunset_at,
            removal_date: schedule.removal_at,
            recipients,
            migration_guidance: draft.migration_guidance,
            replacement_id: draft.replacement_id,
            reminder_offsets_days: schedule.reminders.iter().map(|r| r.offset_days).collect(),
            reminders_sent: Vec::new(),
            acknowledgments: Vec::new(),
            retired: false,
            withdrawn: false,
            revision: 1,
        };
        self.insert_record(notice.clone()).await?;
        info!(
            id = %notice.id,
            target = %notice.target_id,
            severity = %notice.severity,
            recipients = notice.recipients.len(),
            "deprecation notice issued"
        );
        Ok(notice)
    }

    /// Withdraw every open notice about `target_id`, returning how many
    /// were withdrawn.
    pub(crate) async fn withdraw_notices(&self, target_id: &str) -> Result<usize, RadarError> {
        let mut withdrawn = 0;
        for notice in self.list_records::<DeprecationNotice>().await? {
            if notice.target_id != target_id || !notice.is_open() {
                continue;
            }
            let mut next = notice.clone();
            next.withdrawn = true;
            next.revision = notice.revision + 1;
            self.swap(notice.revision, next).await?;
            info!(id = %notice.id, target = target_id, "notice withdrawn");
            withdrawn += 1;
        }
        Ok(withdrawn)
    }

    /// # Errors
    ///
    /// Returns `RadarError::NotFound` if the id is unknown.
    pub async fn get_notice(&self, id: &str) -> Result<DeprecationNotice, RadarError> {
        self.fetch(id).await
    }

    /// Notices matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn list_notices(
        &self,
        filter: &NoticeFilter,
    ) -> Result<Vec<DeprecationNotice>, RadarError> {
        let mut notices: Vec<DeprecationNotice> = self
            .list_records::<DeprecationNotice>()
            .await?
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect();
        notices.sort_by(|a, b| a.notice_date.cmp(&b.notice_date).then_with(|| a.id.cmp(&b.id)));
        Ok(notices)
    }

    /// Append an acknowledgment. The log is append-only; the same actor may
    /// acknowledge more than once.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` for a blank actor,
    /// `RadarError::NotFound` for an unknown notice, or `RadarError::Conflict`
    /// on a concurrent write.
    pub async fn acknowledge_notice(
        &self,
        id: &str,
        actor: &str,
        comment: Option<&str>,
    ) -> Result<DeprecationNotice, RadarError> {
        if actor.trim().is_empty() {
            return Err(RadarError::invalid("acknowledging actor is required"));
        }
        let current: DeprecationNotice = self.fetch(id).await?;
        let mut next = current.clone();
        next.acknowledgments.push(Acknowledgment {
            actor: actor.to_string(),
            at: Utc::now(),
            comment: comment.map(String::from),
        });
        next.revision = current.revision + 1;
        self.swap(current.revision, next.clone()).await?;
        info!(id, actor, "notice acknowledged");
        Ok(next)
    }

    /// Record a successful delivery reported by the notification collaborator.
    ///
    /// Reporting the same delivery twice keeps the first timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` if `address` is not a recipient of the
    /// notice, `RadarError::NotFound` for an unknown notice, or
    /// `RadarError::Conflict` on a concurrent write.
    pub async fn mark_recipient_sent(
        &self,
        id: &str,
        address: &str,
        at: DateTime<Utc>,
    ) -> Result<DeprecationNotice, RadarError> {
        let current: DeprecationNotice = self.fetch(id).await?;
        let Some(index) = current.recipients.iter().position(|r| r.address == address) else {
            return Err(RadarError::invalid(format!(
                "{address} is not a recipient of notice {id}"
            )));
        };
        if current.recipients[index].sent {
            return Ok(current);
        }

        let mut next = current.clone();
        let recipient = &mut next.recipients[index];
        recipient.sent = true;
        recipient.sent_at = Some(at);
        next.revision = current.revision + 1;
        self.swap(current.revision, next.clone()).await?;
        info!(id, address, "notice delivered");
        Ok(next)
    }

    /// Record that the reminder for `offset_days` went out.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` if the notice has no such offset,
    /// `RadarError::NotFound` for an unknown notice, or `RadarError::Conflict`
    /// on a concurrent write.
    pub async fn mark_reminder_sent(
        &self,
        id: &str,
        offset_days: u32,
    ) -> Result<DeprecationNotice, RadarError> {
        let current: DeprecationNotice = self.fetch(id).await?;
        if !current.reminder_offsets_days.contains(&offset_days) {
            return Err(RadarError::invalid(format!(
                "notice {id} has no reminder {offset_days} days before removal"
            )));
        }
        if current.reminders_sent.contains(&offset_days) {
            return Ok(current);
        }

        let mut next = current.clone();
        next.reminders_sent.push(offset_days);
        next.revision = current.revision + 1;
        self.swap(current.revision, next.clone()).await?;
        info!(id, offset_days, "reminder sent");
        Ok(next)
    }

    /// Crossed, unsent reminder thresholds across all open notices,
    /// earliest first. Nothing is reported once the removal date has passed;
    /// see [`Self::overdue_notices`].
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn reminders_due(&self, now: DateTime<Utc>) -> Result<Vec<ReminderDue>, RadarError> {
        let mut due = Vec::new();
        for notice in self.list_records::<DeprecationNotice>().await? {
            if !notice.is_open() || now >= notice.removal_date {
                continue;
            }
            for &offset in &notice.reminder_offsets_days {
                if notice.reminders_sent.contains(&offset) {
                    continue;
                }
                let due_at = notice.removal_date - Duration::days(i64::from(offset));
                if due_at <= now {
                    due.push(ReminderDue {
                        notice_id: notice.id.clone(),
                        target_id: notice.target_id.clone(),
                        offset_days: offset,
                        due_at,
                        severity: reminder_severity(
                            &notice.reminder_offsets_days,
                            offset,
                            notice.severity,
                        ),
                    });
                }
            }
        }
        due.sort_by(|a, b| {
            a.due_at
                .cmp(&b.due_at)
                .then_with(|| a.notice_id.cmp(&b.notice_id))
        });
        Ok(due)
    }

    /// Unacknowledged notices past their removal date. A reportable
    /// condition, never an error.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn overdue_notices(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeprecationNotice>, RadarError> {
        let mut overdue: Vec<DeprecationNotice> = self
            .list_records::<DeprecationNotice>()
            .await?
            .into_iter()
            .filter(|n| n.is_overdue(now))
            .collect();
        overdue.sort_by_key(|n| n.removal_date);
        for notice in &overdue {
            warn!(
                id = %notice.id,
                target = %notice.target_id,
                removal = %notice.removal_date,
                "notice unacknowledged past removal date"
            );
        }
        Ok(overdue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{draft, test_service};
    use crate::transitions::DeprecationRequest;
    use radar_core::enums::{Quadrant, Ring, StrategicValue};

    async fn deprecated_notice(
        svc: &RadarService<crate::store::MemoryStore>,
    ) -> DeprecationNotice {
        let entry = svc
            .add_technology(draft("AngularJS", Quadrant::LanguagesFrameworks, Ring::Hold, StrategicValue::Low), "arch")
            .await
            .unwrap();
        svc.deprecate_technology(&entry.id, DeprecationRequest::new("end of life"), "arch")
            .await
            .unwrap()
            .notice
    }

    #[tokio::test]
    async fn acknowledgments_append() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;

        let once = svc
            .acknowledge_notice(&notice.id, "web-lead", Some("migrating in Q3"))
            .await
            .unwrap();
        assert_eq!(once.acknowledgments.len(), 1);
        assert_eq!(once.revision, notice.revision + 1);

        let twice = svc.acknowledge_notice(&notice.id, "web-lead", None).await.unwrap();
        assert_eq!(twice.acknowledgments.len(), 2);
        assert_eq!(twice.acknowledgments[0].comment.as_deref(), Some("migrating in Q3"));
    }

    #[tokio::test]
    async fn acknowledge_unknown_notice_is_not_found() {
        let svc = test_service();
        let result = svc.acknowledge_notice("ntc-ffffffff", "someone", None).await;
        assert!(matches!(result, Err(RadarError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delivery_reports_mark_recipients() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;
        let address = notice.recipients[0].address.clone();
        let at = Utc::now();

        let updated = svc.mark_recipient_sent(&notice.id, &address, at).await.unwrap();
        assert!(updated.recipients[0].sent);
        assert_eq!(updated.recipients[0].sent_at, Some(at));

        let repeat = svc
            .mark_recipient_sent(&notice.id, &address, at + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(repeat.recipients[0].sent_at, Some(at));
        assert_eq!(repeat.revision, updated.revision);

        let unknown = svc
            .mark_recipient_sent(&notice.id, "nobody@corp.internal", at)
            .await;
        assert!(matches!(unknown, Err(RadarError::Validation { .. })));
    }

    #[tokio::test]
    async fn reminders_follow_offsets() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;

        let early = notice.removal_date - Duration::days(100);
        assert!(svc.reminders_due(early).await.unwrap().is_empty());

        let at_30 = notice.removal_date - Duration::days(30);
        let due = svc.reminders_due(at_30).await.unwrap();
        let offsets: Vec<u32> = due.iter().map(|r| r.offset_days).collect();
        assert_eq!(offsets, vec![90, 30]);
        assert!(due.iter().all(|r| r.severity == NoticeSeverity::Warning));

        svc.mark_reminder_sent(&notice.id, 90).await.unwrap();
        let at_7 = notice.removal_date - Duration::days(7);
        let due = svc.reminders_due(at_7).await.unwrap();
        let offsets: Vec<u32> = due.iter().map(|r| r.offset_days).collect();
        assert_eq!(offsets, vec![30, 7]);
        assert_eq!(due[1].severity, NoticeSeverity::Critical);

        assert!(svc.reminders_due(notice.removal_date).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_reminder_offset_is_rejected() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;
        let result = svc.mark_reminder_sent(&notice.id, 45).await;
        assert!(matches!(result, Err(RadarError::Validation { .. })));
    }

    #[tokio::test]
    async fn overdue_until_acknowledged() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;
        let after = notice.removal_date + Duration::days(1);

        assert!(svc.overdue_notices(notice.removal_date - Duration::days(1)).await.unwrap().is_empty());
        let overdue = svc.overdue_notices(after).await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, notice.id);

        svc.acknowledge_notice(&notice.id, "web-lead", None).await.unwrap();
        assert!(svc.overdue_notices(after).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_target() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;
        deprecated_notice(&svc).await;

        let all = svc.list_notices(&NoticeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        let one = svc
            .list_notices(&NoticeFilter::for_target(notice.target_id.clone()))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, notice.id);
        assert_eq!(svc.get_notice(&notice.id).await.unwrap(), notice);
    }

    #[tokio::test]
    async fn removed_target_notice_stays_overdue() {
        let svc = test_service();
        let notice = deprecated_notice(&svc).await;
        let after = notice.removal_date + Duration::days(1);

        svc.advance_lifecycles(after).await.unwrap();
        let retired = svc.get_notice(&notice.id).await.unwrap();
        assert!(retired.retired);
        assert!(svc.list_notices(&NoticeFilter::default()).await.unwrap().is_empty());
        assert_eq!(svc.overdue_notices(after).await.unwrap(), vec![retired]);

        svc.acknowledge_notice(&notice.id, "web-lead", Some("already migrated"))
            .await
            .unwrap();
        assert!(svc.overdue_notices(after).await.unwrap().is_empty());
    }
}
