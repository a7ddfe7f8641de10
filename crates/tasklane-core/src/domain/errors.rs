//! Errors - エラー型と分類
//!
//! One type per failure boundary:
//! - `DecodeError`: the request body is not a usable envelope (no session is built)
//! - `PayloadMismatch`: a matched envelope carries data of the wrong shape
//! - `HandlerError`: the task handler itself failed
//! - `DispatchError`: either of the two above, as seen by the router
//! - `TransportError`: an outgoing envelope did not reach the bus
//! - `FetchError`: a resource could not be read
//! - `SessionError`: a lifecycle emission was refused or failed

use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("envelope must be a JSON object")]
    NotAnObject,

    #[error("envelope is missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("envelope attribute '{0}' must be a non-empty string")]
    InvalidAttribute(&'static str),
}

#[derive(Debug, thiserror::Error)]
#[error("payload of '{event_type}' does not match the expected structure: {source}")]
pub struct PayloadMismatch {
    pub event_type: String,
    #[source]
    pub source: serde_json::Error,
}

/// HandlerError はタスク handler の失敗
///
/// Returned by handlers for unexpected faults. A business-level "the task did
/// not succeed" is an `Outcome::failure`, not an error.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FetchError> for HandlerError {
    fn from(err: FetchError) -> Self {
        Self::with_source("resource fetch failed", err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Payload(#[from] PayloadMismatch),

    #[error("handler fault: {0}")]
    Handler(#[from] HandlerError),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("event bus unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("event bus rejected envelope with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("resource '{0}' not found")]
    NotFound(String),

    #[error("failed to read resource '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration service returned status {status} for '{path}'")]
    Status { path: String, status: u16 },

    #[error("resource '{path}' could not be decoded: {reason}")]
    Decode { path: String, reason: String },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("task '{0}' was already finished for this trigger")]
    AlreadyFinished(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
