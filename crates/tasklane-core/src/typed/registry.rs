//! HandlerRegistry - (task, phase) から handler への対応表
//!
//! Built once during startup, then wrapped in an `Arc` and only read. No
//! locks: concurrent requests share it immutably.
//!
//! # Binding の種類
//! - `(task, triggered)` → task handler (`register`)
//! - `(task, started | status.changed | finished)` → passive observer (`observe`)

use super::handler::{DynHandler, Handler, TypedHandler};
use super::observer::Observer;
use super::task::Task;
use crate::domain::{EventData, Phase};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub task: String,
    pub phase: Phase,
}

impl Binding {
    pub fn new(task: impl Into<String>, phase: Phase) -> Self {
        Self {
            task: task.into(),
            phase,
        }
    }
}

/// What a binding resolves to.
#[derive(Clone)]
pub enum Route {
    Task(Arc<dyn DynHandler>),
    Observe(Arc<dyn Observer>),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("a handler for task '{task}' phase '{phase}' is already registered")]
    AlreadyRegistered { task: String, phase: Phase },

    #[error("observers cannot be bound to the triggered phase (task '{0}')")]
    ObserverOnTriggered(String),

    #[error("task name '{0}' collides with a common event data field")]
    ReservedTaskName(String),
}

#[derive(Default)]
pub struct HandlerRegistry {
    routes: HashMap<Binding, Route>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `H` to `(T::NAME, triggered)`.
    pub fn register<T: Task, H: Handler<T> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        if EventData::FIELD_NAMES.contains(&T::NAME) {
            return Err(RegistryError::ReservedTaskName(T::NAME.to_string()));
        }
        let binding = Binding::new(T::NAME, Phase::Triggered);
        self.insert(binding, Route::Task(Arc::new(TypedHandler::new(handler))))
    }

    pub fn observe(
        &mut self,
        task: impl Into<String>,
        phase: Phase,
        observer: Arc<dyn Observer>,
    ) -> Result<(), RegistryError> {
        let task = task.into();
        if phase == Phase::Triggered {
            return Err(RegistryError::ObserverOnTriggered(task));
        }
        self.insert(Binding::new(task, phase), Route::Observe(observer))
    }

    fn insert(&mut self, binding: Binding, route: Route) -> Result<(), RegistryError> {
        if self.routes.contains_key(&binding) {
            return Err(RegistryError::AlreadyRegistered {
                task: binding.task,
                phase: binding.phase,
            });
        }
        self.routes.insert(binding, route);
        Ok(())
    }

    pub fn get(&self, task: &str, phase: Phase) -> Option<&Route> {
        self.routes.get(&Binding::new(task, phase))
    }

    pub fn handler(&self, task: &str) -> Option<Arc<dyn DynHandler>> {
        match self.get(task, Phase::Triggered) {
            Some(Route::Task(handler)) => Some(handler.clone()),
            _ => None,
        }
    }

    /// Task names with a triggered handler, sorted.
    pub fn registered_tasks(&self) -> Vec<String> {
        let mut tasks: Vec<String> = self
            .routes
            .iter()
            .filter(|(binding, route)| {
                binding.phase == Phase::Triggered && matches!(route, Route::Task(_))
            })
            .map(|(binding, _)| binding.task.clone())
            .collect();
        tasks.sort();
        tasks
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::handler::fixtures::{CountHandler, FailingHandler, ProjectHandler};
    use crate::typed::observer::LoggingObserver;
    use crate::typed::task::fixtures::{CountTask, MonacoTask};

    #[test]
    fn test_register_and_get() {
        let mut registry = HandlerRegistry::new();
        registry.register::<MonacoTask, _>(ProjectHandler).unwrap();

        let handler = registry.handler(MonacoTask::NAME).unwrap();
        assert_eq!(handler.task_name(), "monaco");
        assert!(registry.handler("deployment").is_none());
    }

    #[test]
    fn test_double_registration() {
        let mut registry = HandlerRegistry::new();
        registry.register::<MonacoTask, _>(ProjectHandler).unwrap();
        let result = registry.register::<MonacoTask, _>(FailingHandler);
        assert!(matches!(
            result,
            Err(RegistryError::AlreadyRegistered { task, phase: Phase::Triggered }) if task == "monaco"
        ));
    }

    #[test]
    fn test_registered_tasks_excludes_observers() {
        let mut registry = HandlerRegistry::new();
        registry.register::<MonacoTask, _>(ProjectHandler).unwrap();
        registry.register::<CountTask, _>(CountHandler).unwrap();
        registry
            .observe("project.create", Phase::Finished, Arc::new(LoggingObserver))
            .unwrap();

        assert_eq!(registry.registered_tasks(), vec!["count", "monaco"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_observer_on_triggered_is_rejected() {
        let mut registry = HandlerRegistry::new();
        let result = registry.observe("monaco", Phase::Triggered, Arc::new(LoggingObserver));
        assert!(matches!(result, Err(RegistryError::ObserverOnTriggered(_))));
        assert!(registry.is_empty());
    }

    #[derive(serde::Deserialize)]
    struct StatusTask {}

    impl Task for StatusTask {
        const NAME: &'static str = "status";
    }

    struct StatusHandler;

    #[async_trait::async_trait]
    impl Handler<StatusTask> for StatusHandler {
        async fn handle(
            &self,
            _: &crate::session::TaskSession,
            _: &crate::domain::Envelope,
            _: StatusTask,
        ) -> Result<crate::domain::Outcome, crate::domain::HandlerError> {
            Ok(crate::domain::Outcome::success("ok"))
        }
    }

    #[test]
    fn test_task_name_colliding_with_event_data_is_rejected() {
        let mut registry = HandlerRegistry::new();
        let result = registry.register::<StatusTask, _>(StatusHandler);
        assert!(matches!(result, Err(RegistryError::ReservedTaskName(name)) if name == "status"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_task_different_phases() {
        let mut registry = HandlerRegistry::new();
        registry
            .observe("service.create", Phase::Started, Arc::new(LoggingObserver))
            .unwrap();
        registry
            .observe("service.create", Phase::Finished, Arc::new(LoggingObserver))
            .unwrap();

        assert!(matches!(
            registry.get("service.create", Phase::Started),
            Some(Route::Observe(_))
        ));
        assert!(registry.get("service.create", Phase::StatusChanged).is_none());
    }
}
