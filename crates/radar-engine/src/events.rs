//! Domain event handlers.
//!
//! The service emits [`DomainEvent`]s after a mutation has been stored. Each
//! registered [`EventHandler`] sees every event synchronously; handlers must
//! not fail the mutation that produced the event, so they log and move on.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use radar_core::events::{DomainEvent, IncidentRequest, IncidentSeverity};
use tracing::{info, warn};

/// Consumer of domain events.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &DomainEvent);
}

/// Incident-management collaborator.
pub trait IncidentSink: Send + Sync {
    /// Open an incident.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator is unreachable or rejects the request.
    fn create_incident(&self, request: IncidentRequest) -> anyhow::Result<()>;
}

/// Opens an operational incident when a strategically important technology
/// is deprecated or put on hold.
pub struct IncidentEscalation {
    sink: Arc<dyn IncidentSink>,
    source: String,
}

impl IncidentEscalation {
    pub fn new(sink: Arc<dyn IncidentSink>, source: impl Into<String>) -> Self {
        Self {
            sink,
            source: source.into(),
        }
    }

    /// The incident request for `event`, if it warrants one.
    #[must_use]
    pub fn request_for(&self, event: &DomainEvent) -> Option<IncidentRequest> {
        let DomainEvent::TechnologyDeprecated {
            id,
            name,
            strategic_value,
            reason,
            notice_id,
        } = event
        else {
            return None;
        };
        if !strategic_value.warrants_incident() {
            return None;
        }

        Some(IncidentRequest {
            title: format!("{strategic_value} value technology deprecated: {name}"),
            description: format!(
                "{name} ({id}) has been moved to hold or deprecated. Reason: {reason}. \
                 Teams depending on it need a migration plan."
            ),
            severity: IncidentSeverity::from(*strategic_value),
            source: self.source.clone(),
            tags: vec![
                "tech-radar".to_string(),
                "deprecation".to_string(),
                format!("strategic-value:{strategic_value}"),
            ],
            metadata: BTreeMap::from([
                ("technology_id".to_string(), id.clone()),
                ("technology_name".to_string(), name.clone()),
                ("notice_id".to_string(), notice_id.clone()),
                ("strategic_value".to_string(), strategic_value.to_string()),
            ]),
        })
    }
}

impl EventHandler for IncidentEscalation {
    fn handle(&self, event: &DomainEvent) {
        let Some(request) = self.request_for(event) else {
            return;
        };
        let title = request.title.clone();
        match self.sink.create_incident(request) {
            Ok(()) => info!(%title, "incident requested"),
            Err(error) => warn!(%title, error = %error, "incident creation failed"),
        }
    }
}

/// Records every event it sees. Useful as an outbox or in tests.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<DomainEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events seen so far.
    #[must_use]
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all events seen so far.
    pub fn drain(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventHandler for EventLog {
    fn handle(&self, event: &DomainEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Incident sink that keeps requests in memory.
#[derive(Default)]
pub struct MemoryIncidentSink {
    requests: Mutex<Vec<IncidentRequest>>,
}

impl MemoryIncidentSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<IncidentRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl IncidentSink for MemoryIncidentSink {
    fn create_incident(&self, request: IncidentRequest) -> anyhow::Result<()> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(())
    }
}
