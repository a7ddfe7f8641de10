//! Correlation context - who is this event about, for logs and outgoing events.

use tracing::Span;

use crate::domain::{CorrelationId, Envelope, EventId};

/// Extension attribute carrying the correlation id.
pub const CONTEXT_EXTENSION: &str = "shkeptncontext";

/// Extension attribute pointing an outgoing event at its trigger.
pub const TRIGGERED_ID_EXTENSION: &str = "triggeredid";

/// Per-trigger correlation data. Derived from the envelope, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationContext {
    correlation_id: CorrelationId,
    event_id: EventId,
    service: String,
}

impl CorrelationContext {
    /// Always succeeds: a missing or non-string `shkeptncontext` only costs
    /// traceability, so it degrades to an empty correlation id.
    pub fn extract(envelope: &Envelope, service: &str) -> Self {
        let correlation_id = envelope
            .extension(CONTEXT_EXTENSION)
            .and_then(|v| v.as_str())
            .map(CorrelationId::new)
            .unwrap_or_else(CorrelationId::empty);

        Self {
            correlation_id,
            event_id: envelope.id().clone(),
            service: service.to_string(),
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn span(&self) -> Span {
        tracing::info_span!(
            "task_event",
            shkeptncontext = %self.correlation_id,
            event_id = %self.event_id,
            service = %self.service,
        )
    }
}
