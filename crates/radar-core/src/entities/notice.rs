use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ChannelType, NoticeSeverity, TargetType};

/// A single delivery target for a notice.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Recipient {
    pub channel: ChannelType,
    pub address: String,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Recipient {
    pub fn pending(channel: ChannelType, address: impl Into<String>) -> Self {
        Self {
            channel,
            address: address.into(),
            sent: false,
            sent_at: None,
        }
    }
}

/// Someone confirming they have read a notice.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Acknowledgment {
    pub actor: String,
    pub at: DateTime<Utc>,
    pub comment: Option<String>,
}

/// Generated communication describing an entity's wind-down timeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub id: String,
    pub target_type: TargetType,
    pub target_id: String,
    pub target_name: String,
    pub severity: NoticeSeverity,
    pub reason: Option<String>,
    pub notice_date: DateTime<Utc>,
    pub deprecation_date: DateTime<Utc>,
    pub sunset_date: DateTime<Utc>,
    pub removal_date: DateTime<Utc>,
    pub recipients: Vec<Recipient>,
    pub migration_guidance: Option<String>,
    pub replacement_id: Option<String>,
    /// Days-before-removal thresholds at which reminders go out.
    pub reminder_offsets_days: Vec<u32>,
    /// Offsets for which the notifier has already sent a reminder.
    pub reminders_sent: Vec<u32>,
    /// Append-only.
    pub acknowledgments: Vec<Acknowledgment>,
    /// Set once the target reaches `removed`. An unacknowledged retired
    /// notice is still overdue.
    pub retired: bool,
    /// Set when the timeline no longer applies: the target left `hold`
    /// before being deprecated, or an explicit deprecation replaced it.
    #[serde(default)]
    pub withdrawn: bool,
    pub revision: u64,
}

impl DeprecationNotice {
    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        !self.acknowledgments.is_empty()
    }

    /// Neither retired nor withdrawn; reminders still go out.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.retired && !self.withdrawn
    }

    /// Unacknowledged and past its removal date. Retirement does not clear
    /// this; withdrawal does.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.withdrawn && !self.is_acknowledged() && now >= self.removal_date
    }

    #[must_use]
    pub fn pending_recipients(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter().filter(|r| !r.sent)
    }
}
