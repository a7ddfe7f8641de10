//! TaskSession - one triggering event and the lifecycle events it owes.
//!
//! # ライフサイクル
//! ```text
//! triggered ──► started ──► [status.changed]* ──► finished
//! ```
//! - `started` is sent at most once and never after `finished`.
//! - `finished` is sent at most once; the router sends it on every exit path
//!   of a handler unless the handler already did.
//!
//! A session lives for one inbound request and is never shared between
//! requests. The `Publisher` it holds is shared, but is read-only.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::Span;

use crate::context::{CONTEXT_EXTENSION, CorrelationContext, TRIGGERED_ID_EXTENSION};
use crate::domain::{
    Envelope, EventData, EventType, Outcome, Phase, SessionError, TransportError,
};
use crate::ports::{Clock, EventSink, IdGenerator, ResourceScope, SystemClock, UlidGenerator};

/// Everything needed to put an envelope on the bus.
///
/// Built once at startup and cloned into every session.
#[derive(Clone)]
pub struct Publisher {
    sink: Arc<dyn EventSink>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    namespace: String,
}

impl Publisher {
    pub fn new(sink: Arc<dyn EventSink>, namespace: impl Into<String>) -> Self {
        Self {
            sink,
            ids: Arc::new(UlidGenerator::new(SystemClock)),
            clock: Arc::new(SystemClock),
            namespace: namespace.into(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

pub struct TaskSession {
    context: CorrelationContext,
    trigger: EventData,
    publisher: Publisher,
    span: Span,
    started: AtomicBool,
    finished: AtomicBool,
}

impl TaskSession {
    pub fn open(context: CorrelationContext, trigger: &Envelope, publisher: Publisher) -> Self {
        let span = context.span();
        Self {
            trigger: EventData::from_envelope(trigger),
            context,
            publisher,
            span,
            started: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &CorrelationContext {
        &self.context
    }

    /// Span tagged with correlation id, event id and service name.
    pub fn logger(&self) -> &Span {
        &self.span
    }

    /// Common fields of the triggering event's payload.
    pub fn trigger_data(&self) -> &EventData {
        &self.trigger
    }

    pub fn resource_scope(&self) -> ResourceScope {
        self.trigger.resource_scope()
    }

    /// Namespace of the lifecycle events this session emits.
    pub fn namespace(&self) -> &str {
        self.publisher.namespace()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Sends `<namespace>.event.<task>.started`. A repeated call, or a call
    /// after `finished`, is a no-op.
    pub async fn emit_started(&self, task: &str) -> Result<(), TransportError> {
        if self.is_finished() {
            tracing::warn!(parent: &self.span, task, "started requested after finished; skipped");
            return Ok(());
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let data = self.trigger.scope_only();
        self.emit(task, Phase::Started, to_value(&data))
            .await
            .inspect_err(|err| {
                tracing::warn!(parent: &self.span, task, error = %err, "failed to send started event");
            })
    }

    /// Sends `<namespace>.event.<task>.status.changed`; skipped after `finished`.
    pub async fn emit_status_changed(
        &self,
        task: &str,
        message: impl Into<String>,
    ) -> Result<(), TransportError> {
        if self.is_finished() {
            tracing::warn!(parent: &self.span, task, "status.changed requested after finished; skipped");
            return Ok(());
        }

        let data = self.trigger.scope_only().with_message(message);
        self.emit(task, Phase::StatusChanged, to_value(&data))
            .await
            .inspect_err(|err| {
                tracing::warn!(parent: &self.span, task, error = %err, "failed to send status.changed event");
            })
    }

    /// Sends `<namespace>.event.<task>.finished` exactly once.
    ///
    /// # Errors
    /// - `SessionError::AlreadyFinished` on any call after the first; nothing is sent.
    /// - `SessionError::Transport` when the bus did not take the envelope. The
    ///   session still counts as finished.
    pub async fn emit_finished(&self, task: &str, outcome: &Outcome) -> Result<(), SessionError> {
        if self.finished.swap(true, Ordering::SeqCst) {
            tracing::warn!(parent: &self.span, task, "finished already emitted; ignoring");
            return Err(SessionError::AlreadyFinished(task.to_string()));
        }

        let mut data = to_value(&self.trigger.finished_with(outcome));
        if let (Some(extra), Value::Object(fields)) = (&outcome.data, &mut data) {
            if EventData::FIELD_NAMES.contains(&task) {
                tracing::warn!(parent: &self.span, task, "task name shadows a common field; outcome data dropped");
            } else {
                fields.insert(task.to_string(), extra.clone());
            }
        }

        match self.emit(task, Phase::Finished, data).await {
            Ok(()) => {
                tracing::info!(parent: &self.span, task, status = ?outcome.status, "task finished");
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    parent: &self.span,
                    task,
                    critical = true,
                    error = %err,
                    "failed to send finished event; consumers will see the task as stuck"
                );
                Err(err.into())
            }
        }
    }

    async fn emit(&self, task: &str, phase: Phase, data: Value) -> Result<(), TransportError> {
        let envelope = self.build(task, phase, data);
        tracing::debug!(
            parent: &self.span,
            event_type = envelope.event_type(),
            outgoing_id = %envelope.id(),
            "sending lifecycle event"
        );
        self.publisher.sink.send(&envelope).await
    }

    fn build(&self, task: &str, phase: Phase, data: Value) -> Envelope {
        let event_type = EventType::new(self.publisher.namespace.as_str(), task, phase);
        Envelope::new(
            self.publisher.ids.next_event_id(),
            event_type.to_string(),
            self.context.service(),
        )
        .with_time(self.publisher.clock.now())
        .with_extension(CONTEXT_EXTENSION, self.context.correlation_id().as_str())
        .with_extension(TRIGGERED_ID_EXTENSION, self.context.event_id().as_str())
        .with_data(data)
    }
}

fn to_value(data: &EventData) -> Value {
    // EventData only holds strings, maps of strings and unit enums.
    serde_json::to_value(data).unwrap_or(Value::Null)
}
