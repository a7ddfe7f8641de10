//! Observer - passive handlers for phases this process does not own.
//!
//! Observers see `started` / `status.changed` / `finished` events of other
//! services' tasks. They get no session: they never emit anything.

use async_trait::async_trait;

use crate::domain::{Envelope, EventData, EventType, HandlerError};

#[async_trait]
pub trait Observer: Send + Sync {
    async fn observe(&self, event_type: &EventType, event: &Envelope) -> Result<(), HandlerError>;
}

/// Logs the event and its common data at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

#[async_trait]
impl Observer for LoggingObserver {
    async fn observe(&self, event_type: &EventType, event: &Envelope) -> Result<(), HandlerError> {
        let data = EventData::from_envelope(event);
        tracing::info!(
            task = event_type.task(),
            phase = %event_type.phase(),
            event_id = %event.id(),
            source = event.source(),
            project = data.project.as_str(),
            stage = data.stage.as_str(),
            service = data.service.as_str(),
            status = ?data.status,
            "observed event"
        );
        Ok(())
    }
}
