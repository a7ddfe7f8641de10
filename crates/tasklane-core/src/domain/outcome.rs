//! Outcome model: what a task handler reports back.
//!
//! The router turns an `Outcome` into the `finished` event of the task, so
//! everything here maps one-to-one onto fields of that event.

use serde::{Deserialize, Serialize};

/// Final status of a task, as carried by its `finished` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Succeeded,
    Failed,
    Errored,
}

/// Quality verdict of a finished task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskResult {
    Pass,
    Warning,
    Fail,
}

/// A common result format for one handled trigger.
///
/// - `succeeded`: the task did its work.
/// - `failed`: the task ran but could not do its work (bad input, missing config).
/// - `errored`: the task could not run at all (fault, panic, payload mismatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: TaskStatus,
    pub result: TaskResult,
    pub message: String,

    /// Task-specific result data, nested under the task name in `finished`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_status(TaskStatus::Succeeded, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::with_status(TaskStatus::Failed, message)
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self::with_status(TaskStatus::Errored, message)
    }

    fn with_status(status: TaskStatus, message: impl Into<String>) -> Self {
        let result = match status {
            TaskStatus::Succeeded => TaskResult::Pass,
            TaskStatus::Failed | TaskStatus::Errored => TaskResult::Fail,
        };
        Self {
            status,
            result,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_result(mut self, result: TaskResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
