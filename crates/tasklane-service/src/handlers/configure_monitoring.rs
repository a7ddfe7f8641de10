//! `configure-monitoring` task: acknowledge the requested monitoring provider.

use async_trait::async_trait;
use serde::Deserialize;

use tasklane_core::domain::HandlerError;
use tasklane_core::typed::{Handler, Task};
use tasklane_core::{Envelope, EventData, Outcome, TaskSession};

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureMonitoringTask {
    #[serde(flatten)]
    pub event: EventData,

    /// Monitoring provider, e.g. `dynatrace`.
    #[serde(rename = "type", default)]
    pub monitoring_type: String,
}

impl Task for ConfigureMonitoringTask {
    const NAME: &'static str = "configure-monitoring";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigureMonitoringHandler;

#[async_trait]
impl Handler<ConfigureMonitoringTask> for ConfigureMonitoringHandler {
    async fn handle(
        &self,
        session: &TaskSession,
        _event: &Envelope,
        task: ConfigureMonitoringTask,
    ) -> Result<Outcome, HandlerError> {
        tracing::info!(
            parent: session.logger(),
            project = task.event.project.as_str(),
            service = task.event.service.as_str(),
            monitoring = task.monitoring_type.as_str(),
            "configure-monitoring acknowledged"
        );

        let provider = if task.monitoring_type.is_empty() {
            "default"
        } else {
            task.monitoring_type.as_str()
        };
        Ok(Outcome::success(format!(
            "monitoring ({provider}) configured for project {}",
            task.event.project
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tasklane_core::domain::EventId;
    use tasklane_core::impls::MemoryEventSink;
    use tasklane_core::session::Publisher;
    use tasklane_core::{CorrelationContext, TaskStatus};

    #[tokio::test]
    async fn acknowledges_with_success() {
        let envelope = Envelope::new(
            EventId::new("t-1"),
            "sh.keptn.event.configure-monitoring.triggered",
            "shipyard",
        )
        .with_data(json!({"project": "sockshop", "service": "carts", "type": "dynatrace"}));
        let context = CorrelationContext::extract(&envelope, "monaco-service");
        let publisher = Publisher::new(Arc::new(MemoryEventSink::new()), "sh.keptn");
        let session = TaskSession::open(context, &envelope, publisher);

        let task: ConfigureMonitoringTask = envelope.data_as().unwrap();
        assert_eq!(task.monitoring_type, "dynatrace");

        let outcome = ConfigureMonitoringHandler
            .handle(&session, &envelope, task)
            .await
            .unwrap();
        assert_eq!(outcome.status, TaskStatus::Succeeded);
        assert!(outcome.message.contains("dynatrace"));
        assert!(outcome.message.contains("sockshop"));
    }
}
