//! Task handlers shipped with the service, and the router that binds them.

pub mod configure_monitoring;
pub mod monaco;

use std::sync::Arc;

use tasklane_core::ports::ResourceFetcher;
use tasklane_core::typed::{LoggingObserver, RegistryError, Task};
use tasklane_core::{AppBuilder, BuildError, Phase, Router};

pub use self::configure_monitoring::{ConfigureMonitoringHandler, ConfigureMonitoringTask};
pub use self::monaco::{MonacoHandler, MonacoTask};

/// Tasks whose lifecycle events are only logged.
const OBSERVED_TASKS: [&str; 2] = ["project.create", "service.create"];

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

pub fn build_router(fetcher: Arc<dyn ResourceFetcher>) -> Result<Router, SetupError> {
    let mut builder = AppBuilder::new()
        .register::<MonacoTask, _>(MonacoHandler::new(fetcher))?
        .register::<ConfigureMonitoringTask, _>(ConfigureMonitoringHandler)?;

    for task in OBSERVED_TASKS {
        for phase in [Phase::Started, Phase::Finished] {
            builder = builder.observe(task, phase, Arc::new(LoggingObserver))?;
        }
    }

    let router = builder
        .expect_tasks(&[MonacoTask::NAME, ConfigureMonitoringTask::NAME])
        .build()?;
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklane_core::impls::LocalResourceFetcher;
    use tasklane_core::typed::Route;

    #[test]
    fn binds_tasks_and_observers() {
        let router = build_router(Arc::new(LocalResourceFetcher::new("."))).unwrap();
        let registry = router.registry();

        assert_eq!(
            registry.registered_tasks(),
            vec!["configure-monitoring".to_string(), "monaco".to_string()]
        );
        assert!(matches!(
            registry.get("project.create", Phase::Finished),
            Some(Route::Observe(_))
        ));
        assert!(matches!(
            registry.get("service.create", Phase::Started),
            Some(Route::Observe(_))
        ));
        assert!(registry.get("service.create", Phase::Triggered).is_none());
        assert_eq!(registry.len(), 6);
    }
}
