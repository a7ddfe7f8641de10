//! AppBuilder - handler の登録と Router の構築
//!
//! # Fail-fast 設計
//! - `expect_tasks()` で必須の task 名を宣言
//! - `build()` 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば `BuildError` を返す（起動失敗）

use std::sync::Arc;

use crate::domain::Phase;
use crate::router::Router;
use crate::typed::{Handler, HandlerRegistry, Observer, RegistryError, Task};

/// AppBuilder は Router を構築
///
/// # 使用例
/// ```ignore
/// let router = AppBuilder::new()
///     .register::<MonacoTask, _>(MonacoHandler::new(fetcher))?
///     .observe("project.create", Phase::Finished, Arc::new(LoggingObserver))?
///     .expect_tasks(&["monaco"])
///     .build()?;
/// ```
pub struct AppBuilder {
    registry: HandlerRegistry,
    expected_tasks: Option<Vec<String>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing task handlers: {0:?}. These tasks were expected but not registered.")]
    MissingTasks(Vec<String>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            expected_tasks: None,
        }
    }

    pub fn register<T: Task, H: Handler<T> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register::<T, H>(handler)?;
        Ok(self)
    }

    pub fn observe(
        mut self,
        task: impl Into<String>,
        phase: Phase,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, RegistryError> {
        self.registry.observe(task, phase, observer)?;
        Ok(self)
    }

    pub fn expect_tasks(mut self, tasks: &[&str]) -> Self {
        self.expected_tasks = Some(tasks.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Freezes the registry; it is read-only from here on.
    pub fn build(self) -> Result<Router, BuildError> {
        if let Some(expected_tasks) = &self.expected_tasks {
            let registered = self.registry.registered_tasks();
            let missing: Vec<String> = expected_tasks
                .iter()
                .filter(|t| !registered.contains(t))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingTasks(missing));
            }
        }

        tracing::info!(
            tasks = ?self.registry.registered_tasks(),
            bindings = self.registry.len(),
            "handler registry ready"
        );
        Ok(Router::new(Arc::new(self.registry)))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::LoggingObserver;
    use crate::typed::handler::fixtures::ProjectHandler;
    use crate::typed::task::fixtures::MonacoTask;

    #[test]
    fn test_build_success() {
        let router = AppBuilder::new()
            .register::<MonacoTask, _>(ProjectHandler)
            .unwrap()
            .expect_tasks(&[MonacoTask::NAME])
            .build();
        assert!(router.is_ok());
    }

    #[test]
    fn test_build_missing_tasks() {
        let router = AppBuilder::new()
            .register::<MonacoTask, _>(ProjectHandler)
            .unwrap()
            .expect_tasks(&[MonacoTask::NAME, "deployment"])
            .build();
        assert!(matches!(
            router,
            Err(BuildError::MissingTasks(missing)) if missing == vec!["deployment".to_string()]
        ));
    }

    #[test]
    fn test_observers_do_not_satisfy_expected_tasks() {
        let router = AppBuilder::new()
            .observe("monaco", Phase::Finished, Arc::new(LoggingObserver))
            .unwrap()
            .expect_tasks(&["monaco"])
            .build();
        assert!(matches!(router, Err(BuildError::MissingTasks(_))));
    }

    #[test]
    fn test_build_no_expect_tasks() {
        let router = AppBuilder::new().build().unwrap();
        assert!(router.registry().is_empty());
    }
}
