//! EventType - event type naming convention
//!
//! # 命名規約
//! - `{namespace}.event.{task}.triggered`
//! - `{namespace}.event.{task}.started`
//! - `{namespace}.event.{task}.status.changed`
//! - `{namespace}.event.{task}.finished`
//!
//! 例: `sh.keptn.event.monaco.triggered`
//!
//! Task names are taken verbatim from between the `.event.` marker and the
//! phase suffix, so dotted names such as `project.create` survive parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EVENT_MARKER: &str = ".event.";
const STATUS_CHANGED_SUFFIX: &str = ".status.changed";

/// Lifecycle phase, encoded as the suffix of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Triggered,
    Started,
    StatusChanged,
    Finished,
}

impl Phase {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Triggered => "triggered",
            Self::Started => "started",
            Self::StatusChanged => "status.changed",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventTypeError {
    #[error("event type '{0}' has no '.event.' segment")]
    MissingEventMarker(String),

    #[error("event type '{0}' has an empty namespace")]
    EmptyNamespace(String),

    #[error("event type '{0}' has an empty task name")]
    EmptyTaskName(String),

    #[error("event type '{raw}' ends in unknown phase '{phase}'")]
    UnknownPhase { raw: String, phase: String },
}

/// A parsed `<namespace>.event.<task>.<phase>` type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventType {
    namespace: String,
    task: String,
    phase: Phase,
}

impl EventType {
    pub fn new(namespace: impl Into<String>, task: impl Into<String>, phase: Phase) -> Self {
        Self {
            namespace: namespace.into(),
            task: task.into(),
            phase,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EventTypeError> {
        let (namespace, rest) = raw
            .split_once(EVENT_MARKER)
            .ok_or_else(|| EventTypeError::MissingEventMarker(raw.to_string()))?;
        if namespace.is_empty() {
            return Err(EventTypeError::EmptyNamespace(raw.to_string()));
        }

        let (task, phase) = match rest.strip_suffix(STATUS_CHANGED_SUFFIX) {
            Some(task) => (task, Phase::StatusChanged),
            None => {
                let (task, suffix) = rest
                    .rsplit_once('.')
                    .ok_or_else(|| EventTypeError::EmptyTaskName(raw.to_string()))?;
                let phase = match suffix {
                    "triggered" => Phase::Triggered,
                    "started" => Phase::Started,
                    "finished" => Phase::Finished,
                    other => {
                        return Err(EventTypeError::UnknownPhase {
                            raw: raw.to_string(),
                            phase: other.to_string(),
                        });
                    }
                };
                (task, phase)
            }
        };

        if task.is_empty() {
            return Err(EventTypeError::EmptyTaskName(raw.to_string()));
        }

        Ok(Self::new(namespace, task, phase))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Same namespace and task, different phase.
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self {
            namespace: self.namespace.clone(),
            task: self.task.clone(),
            phase,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}.{}",
            self.namespace, EVENT_MARKER, self.task, self.phase
        )
    }
}

impl FromStr for EventType {
    type Err = EventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
