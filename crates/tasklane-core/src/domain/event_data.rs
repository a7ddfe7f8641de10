//! Common event data shared by every task event payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::envelope::Envelope;
use super::outcome::{Outcome, TaskResult, TaskStatus};
use crate::ports::ResourceScope;

/// The fields every task event carries, whatever its task.
///
/// Task payloads embed this with `#[serde(flatten)]`:
/// ```ignore
/// #[derive(Deserialize)]
/// struct DeploymentTask {
///     #[serde(flatten)]
///     event: EventData,
///     deployment: DeploymentSettings,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stage: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EventData {
    /// Top-level keys of a serialized `EventData`.
    pub const FIELD_NAMES: [&'static str; 7] = [
        "project", "stage", "service", "labels", "status", "result", "message",
    ];

    /// Reads the common fields of an envelope, falling back to empty ones.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        envelope.data_as().unwrap_or_default()
    }

    /// Project/stage/service/labels only, as carried by `started` and
    /// `status.changed` events.
    pub fn scope_only(&self) -> Self {
        Self {
            project: self.project.clone(),
            stage: self.stage.clone(),
            service: self.service.clone(),
            labels: self.labels.clone(),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Scope fields plus the outcome's status, result and message.
    pub fn finished_with(&self, outcome: &Outcome) -> Self {
        Self {
            status: Some(outcome.status),
            result: Some(outcome.result),
            message: Some(outcome.message.clone()),
            ..self.scope_only()
        }
    }

    pub fn resource_scope(&self) -> ResourceScope {
        ResourceScope {
            project: self.project.clone(),
            stage: self.stage.clone(),
            service: self.service.clone(),
        }
    }
}
