//! Handler trait - Task を実行する Handler の定義
//!
//! - `Handler<T>`: what task code implements, receives a decoded `T`
//! - `DynHandler`: object-safe form stored in the registry
//! - `TypedHandler<T, H>`: adapter that decodes the payload, then calls `H`

use super::task::Task;
use crate::domain::{DispatchError, Envelope, HandlerError, Outcome};
use crate::session::TaskSession;
use async_trait::async_trait;
use std::marker::PhantomData;

/// Handler は Task を実行して Outcome を返す
///
/// # 使用例
/// ```ignore
/// struct MonacoHandler;
///
/// #[async_trait]
/// impl Handler<MonacoTask> for MonacoHandler {
///     async fn handle(
///         &self,
///         session: &TaskSession,
///         event: &Envelope,
///         task: MonacoTask,
///     ) -> Result<Outcome, HandlerError> {
///         Ok(Outcome::success(format!("configured {}", task.event.project)))
///     }
/// }
/// ```
///
/// Returning `Err` (or panicking) finishes the task as `errored`.
#[async_trait]
pub trait Handler<T: Task>: Send + Sync {
    async fn handle(
        &self,
        session: &TaskSession,
        event: &Envelope,
        task: T,
    ) -> Result<Outcome, HandlerError>;
}

/// DynHandler は object-safe な Handler の抽象化
#[async_trait]
pub trait DynHandler: Send + Sync {
    async fn handle_dyn(
        &self,
        session: &TaskSession,
        event: &Envelope,
    ) -> Result<Outcome, DispatchError>;

    fn task_name(&self) -> &'static str;
}

pub struct TypedHandler<T: Task, H: Handler<T>> {
    handler: H,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Task, H: Handler<T>> TypedHandler<T, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Task, H: Handler<T>> DynHandler for TypedHandler<T, H> {
    async fn handle_dyn(
        &self,
        session: &TaskSession,
        event: &Envelope,
    ) -> Result<Outcome, DispatchError> {
        let task: T = event.data_as()?;
        Ok(self.handler.handle(session, event, task).await?)
    }

    fn task_name(&self) -> &'static str {
        T::NAME
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{CountHandler, ProjectHandler};
    use super::*;
    use crate::context::CorrelationContext;
    use crate::domain::{EventId, TaskStatus};
    use crate::impls::MemoryEventSink;
    use crate::session::Publisher;
    use crate::typed::task::fixtures::{CountTask, MonacoTask};
    use serde_json::json;
    use std::sync::Arc;

    fn session_for(envelope: &Envelope) -> TaskSession {
        let publisher = Publisher::new(Arc::new(MemoryEventSink::new()), "x");
        TaskSession::open(CorrelationContext::extract(envelope, "svc"), envelope, publisher)
    }

    #[tokio::test]
    async fn typed_handler_decodes_payload() {
        let handler = TypedHandler::<MonacoTask, _>::new(ProjectHandler);
        let envelope = Envelope::new(EventId::new("1"), "x.event.monaco.triggered", "test")
            .with_data(json!({"project": "p1"}));
        let session = session_for(&envelope);

        let outcome = handler.handle_dyn(&session, &envelope).await.unwrap();
        assert_eq!(outcome.status, TaskStatus::Succeeded);
        assert_eq!(outcome.message, "configured p1");
        assert_eq!(handler.task_name(), "monaco");
    }

    #[tokio::test]
    async fn typed_handler_reports_payload_mismatch() {
        let handler = TypedHandler::<CountTask, _>::new(CountHandler);
        let envelope = Envelope::new(EventId::new("1"), "x.event.count.triggered", "test")
            .with_data(json!({"count": "many"}));
        let session = session_for(&envelope);

        let err = handler.handle_dyn(&session, &envelope).await.unwrap_err();
        assert!(matches!(err, DispatchError::Payload(_)));
    }
}
