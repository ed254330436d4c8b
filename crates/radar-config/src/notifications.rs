//! Deprecation notice recipients and incident escalation settings.

use radar_core::enums::ChannelType;
use serde::{Deserialize, Serialize};

fn default_team_address_template() -> String {
    "#{team}".to_string()
}

const fn default_team_channel() -> ChannelType {
    ChannelType::Chat
}

fn default_incident_source() -> String {
    "tech-radar".to_string()
}

/// A fixed address that receives every deprecation warning.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecipientConfig {
    #[serde(default)]
    pub channel: ChannelType,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NotificationConfig {
    #[serde(default)]
    pub deprecation_warning_recipients: Vec<RecipientConfig>,

    /// Channel used for per-team recipients.
    #[serde(default = "default_team_channel")]
    pub team_channel: ChannelType,

    /// Address pattern for per-team recipients; `{team}` is substituted.
    #[serde(default = "default_team_address_template")]
    pub team_address_template: String,

    /// `source` field on incident requests.
    #[serde(default = "default_incident_source")]
    pub incident_source: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            deprecation_warning_recipients: Vec::new(),
            team_channel: default_team_channel(),
            team_address_template: default_team_address_template(),
            incident_source: default_incident_source(),
        }
    }
}

impl NotificationConfig {
    /// Address for a team's recipient.
    #[must_use]
    pub fn team_address(&self, team: &str) -> String {
        self.team_address_template.replace("{team}", team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_address_substitutes_placeholder() {
        let config = NotificationConfig::default();
        assert_eq!(config.team_address("payments"), "#payments");

        let config = NotificationConfig {
            team_address_template: "{team}-leads@corp.internal".into(),
            ..Default::default()
        };
        assert_eq!(config.team_address("web"), "web-leads@corp.internal");
    }
}
