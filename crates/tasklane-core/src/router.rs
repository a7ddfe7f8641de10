//! Router - event type から handler を選んで実行する
//!
//! # ルーティング
//! 1. `type` を `(namespace, task, phase)` に parse（失敗 → ignored）
//!    - namespace が publisher と異なる → ignored
//! 2. `(task, phase)` の binding を引く（なし → ignored, not an error）
//! 3. observer binding → observer に渡すだけ
//! 4. task binding → started → handler → finished
//!
//! Every event type reaches every subscriber, so an unknown type is a filter
//! miss and never fails the request.

use std::any::Any;
use std::error::Error as _;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;

use crate::domain::{DispatchError, Envelope, EventType, Outcome, Phase, TaskStatus};
use crate::session::TaskSession;
use crate::typed::{DynHandler, HandlerRegistry, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The type string does not follow the naming convention.
    Unroutable,
    /// A non-triggered phase nobody observes.
    NotTriggered,
    /// A triggered phase for a task this process does not own.
    NoHandler,
    /// The namespace differs from the one this deployment publishes in.
    ForeignNamespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteResult {
    Ignored { reason: IgnoreReason },
    Observed,
    Completed { status: TaskStatus },
}

/// Router dispatches one envelope to its registered handler.
pub struct Router {
    registry: Arc<HandlerRegistry>,
}

impl Router {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub async fn route(&self, session: &TaskSession, envelope: &Envelope) -> RouteResult {
        let span = session.logger();
        let event_type = match EventType::parse(envelope.event_type()) {
            Ok(event_type) => event_type,
            Err(err) => {
                tracing::info!(parent: span, error = %err, "unroutable event type; ignoring");
                return RouteResult::Ignored {
                    reason: IgnoreReason::Unroutable,
                };
            }
        };

        if event_type.namespace() != session.namespace() {
            tracing::info!(
                parent: span,
                event_type = %event_type,
                namespace = session.namespace(),
                "event from another namespace; ignoring"
            );
            return RouteResult::Ignored {
                reason: IgnoreReason::ForeignNamespace,
            };
        }

        tracing::info!(parent: span, event_type = %event_type, "received event");

        match self.registry.get(event_type.task(), event_type.phase()) {
            None => {
                let reason = if event_type.phase() == Phase::Triggered {
                    IgnoreReason::NoHandler
                } else {
                    IgnoreReason::NotTriggered
                };
                tracing::info!(parent: span, event_type = %event_type, ?reason, "no binding; ignoring");
                RouteResult::Ignored { reason }
            }
            Some(Route::Observe(observer)) => {
                let observation =
                    AssertUnwindSafe(observer.observe(&event_type, envelope)).catch_unwind();
                match observation.await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => tracing::warn!(parent: span, error = %err, "observer failed"),
                    Err(panic) => {
                        let message = panic_message(panic.as_ref());
                        tracing::warn!(parent: span, panic = %message, "observer panicked");
                    }
                }
                RouteResult::Observed
            }
            Some(Route::Task(handler)) => {
                self.run(handler.as_ref(), session, envelope, event_type.task())
                    .await
            }
        }
    }

    async fn run(
        &self,
        handler: &dyn DynHandler,
        session: &TaskSession,
        envelope: &Envelope,
        task: &str,
    ) -> RouteResult {
        let span = session.logger();

        // Best-effort: the session logs a failed send.
        let _ = session.emit_started(task).await;

        let invocation = AssertUnwindSafe(handler.handle_dyn(session, envelope)).catch_unwind();
        let outcome = match invocation.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(DispatchError::Payload(err))) => {
                tracing::warn!(parent: span, task, error = %err, "payload does not match task");
                Outcome::errored(err.to_string())
            }
            Ok(Err(DispatchError::Handler(err))) => {
                tracing::error!(
                    parent: span,
                    task,
                    error = %err,
                    cause = ?err.source(),
                    "handler failed"
                );
                Outcome::errored(format!("handler fault: {err}"))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(parent: span, task, panic = %message, "handler panicked");
                Outcome::errored(format!("handler panicked: {message}"))
            }
        };

        if !session.is_finished() {
            // Failure is logged as critical by the session.
            let _ = session.emit_finished(task, &outcome).await;
        }

        RouteResult::Completed {
            status: outcome.status,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
