//! `monaco` task: locate and validate the monaco manifest of a project.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use tasklane_core::domain::{FetchError, HandlerError};
use tasklane_core::ports::ResourceFetcher;
use tasklane_core::typed::{Handler, Task};
use tasklane_core::{Envelope, EventData, Outcome, TaskSession};

pub const DEFAULT_MANIFEST: &str = "monaco/manifest.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct MonacoTask {
    #[serde(flatten)]
    pub event: EventData,

    #[serde(default)]
    pub monaco: MonacoSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonacoSettings {
    #[serde(default)]
    pub manifest: Option<String>,
}

impl Task for MonacoTask {
    const NAME: &'static str = "monaco";
}

impl MonacoTask {
    pub fn manifest(&self) -> &str {
        self.monaco
            .manifest
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MANIFEST)
    }
}

pub struct MonacoHandler {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl MonacoHandler {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Handler<MonacoTask> for MonacoHandler {
    async fn handle(
        &self,
        session: &TaskSession,
        _event: &Envelope,
        task: MonacoTask,
    ) -> Result<Outcome, HandlerError> {
        let manifest = task.manifest();
        let project = task.event.project.as_str();

        let _ = session
            .emit_status_changed(MonacoTask::NAME, format!("loading {manifest}"))
            .await;

        match self.fetcher.fetch(&session.resource_scope(), manifest).await {
            Ok(bytes) => {
                tracing::info!(
                    parent: session.logger(),
                    project,
                    manifest,
                    bytes = bytes.len(),
                    "monaco manifest found"
                );
                Ok(Outcome::success(format!("monaco manifest {manifest} loaded"))
                    .with_data(json!({ "manifest": manifest, "bytes": bytes.len() })))
            }
            Err(FetchError::NotFound(_)) => {
                tracing::info!(parent: session.logger(), project, manifest, "no monaco manifest");
                Ok(Outcome::failure(format!(
                    "no monaco manifest at {manifest} for project {project}"
                )))
            }
            Err(err) => Err(HandlerError::with_source(format!("reading {manifest}"), err)),
        }
    }
}
