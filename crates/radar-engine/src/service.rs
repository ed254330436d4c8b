//! Service layer orchestrating radar mutations with versioning and events.
//!
//! `RadarService` wraps a [`RadarStore`] (storage), the
//! [`DeprecationScheduler`] (date computation) and a list of
//! [`EventHandler`]s (side effects). All repo methods are implemented as
//! `impl RadarService` blocks in `repos/`, `transitions`, and `snapshot`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use radar_config::{ConfigError, RadarConfig};
use radar_core::errors::RadarError;
use radar_core::events::DomainEvent;
use radar_core::ids::format_id;
use tracing::debug;

use crate::events::{EventHandler, IncidentEscalation, IncidentSink};
use crate::layout::LayoutEngine;
use crate::scheduler::DeprecationScheduler;
use crate::store::{RadarStore, Record, Store};

/// Orchestrates radar mutations.
///
/// Every mutation method follows this protocol:
/// 1. Fetch the current record
/// 2. Validate and compute the next state (including any schedule)
/// 3. Compare-and-swap on the fetched version
/// 4. Persist derived records (notices)
/// 5. Emit domain events
pub struct RadarService<S> {
    store: S,
    config: RadarConfig,
    scheduler: DeprecationScheduler,
    layout: LayoutEngine,
    handlers: Vec<Arc<dyn EventHandler>>,
}

/// Keep the offending field in the report details.
fn config_error(err: ConfigError) -> RadarError {
    match err {
        ConfigError::InvalidValue { field, reason } => RadarError::Validation {
            errors: vec![format!("{field}: {reason}")],
        },
        other @ ConfigError::Figment(_) => RadarError::invalid(other.to_string()),
    }
}

impl<S: RadarStore> RadarService<S> {
    /// Create a service over `store`.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::SchedulingInconsistency` if the lifecycle periods
    /// are out of order, or `RadarError::Validation` for other invalid
    /// configuration values.
    pub fn new(store: S, config: RadarConfig) -> Result<Self, RadarError> {
        let scheduler = DeprecationScheduler::new(&config.lifecycle)?;
        config.validate().map_err(config_error)?;
        let layout = LayoutEngine::from_config(&config.layout);
        Ok(Self {
            store,
            config,
            scheduler,
            layout,
            handlers: Vec::new(),
        })
    }

    /// Register an event handler.
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Register the incident-escalation handler for `sink`, using the
    /// configured incident source.
    #[must_use]
    pub fn with_incident_sink(self, sink: Arc<dyn IncidentSink>) -> Self {
        let source = self.config.notifications.incident_source.clone();
        self.with_handler(Arc::new(IncidentEscalation::new(sink, source)))
    }

    /// Access the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &RadarConfig {
        &self.config
    }

    #[must_use]
    pub const fn scheduler(&self) -> &DeprecationScheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Next review date from the configured cadence.
    pub(crate) fn next_review_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(i64::from(self.config.review.interval_days()))
    }

    pub(crate) fn emit(&self, event: &DomainEvent) {
        debug!(event = event.name(), handlers = self.handlers.len(), "emitting domain event");
        for handler in &self.handlers {
            handler.handle(event);
        }
    }

    pub(crate) fn generate_id(prefix: &str) -> String {
        format_id(prefix, rand::random::<u32>())
    }

    /// Fetch a record, mapping absence to `NotFound`.
    pub(crate) async fn fetch<T: Record>(&self, id: &str) -> Result<T, RadarError>
    where
        S: Store<T>,
    {
        Store::<T>::get(&self.store, id)
            .await?
            .ok_or_else(|| RadarError::not_found(T::KIND, id))
    }

    pub(crate) async fn insert_record<T: Record>(&self, record: T) -> Result<(), RadarError>
    where
        S: Store<T>,
    {
        Store::<T>::insert(&self.store, record).await
    }

    pub(crate) async fn swap<T: Record>(
        &self,
        expected_revision: u64,
        record: T,
    ) -> Result<(), RadarError>
    where
        S: Store<T>,
    {
        Store::<T>::compare_and_swap(&self.store, expected_revision, record).await
    }

    pub(crate) async fn list_records<T: Record>(&self) -> Result<Vec<T>, RadarError>
    where
        S: Store<T>,
    {
        Store::<T>::list(&self.store).await
    }
}
