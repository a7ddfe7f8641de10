//! MemoryEventSink - 開発・テスト用の event sink
//!
//! Records every envelope instead of sending it anywhere. Can be told to
//! reject envelopes whose type ends with a given suffix, to exercise the
//! transport failure paths.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Envelope, TransportError};
use crate::ports::EventSink;

#[derive(Debug, Default)]
pub struct MemoryEventSink {
    sent: Mutex<Vec<Envelope>>,
    reject_suffix: Option<String>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects envelopes whose type ends with `suffix`; `""` rejects all.
    pub fn rejecting(suffix: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject_suffix: Some(suffix.into()),
        }
    }

    /// Snapshot of everything delivered so far, in emission order.
    pub async fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_types(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|e| e.event_type().to_string())
            .collect()
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        if let Some(suffix) = &self.reject_suffix
            && envelope.event_type().ends_with(suffix.as_str())
        {
            return Err(TransportError::Unavailable(format!(
                "memory sink rejects '{}'",
                envelope.event_type()
            )));
        }
        self.sent.lock().await.push(envelope.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventId;

    fn envelope(event_type: &str) -> Envelope {
        Envelope::new(EventId::new("1"), event_type, "test")
    }

    #[tokio::test]
    async fn records_in_order() {
        let sink = MemoryEventSink::new();
        sink.send(&envelope("x.event.a.started")).await.unwrap();
        sink.send(&envelope("x.event.a.finished")).await.unwrap();

        assert_eq!(
            sink.sent_types().await,
            vec!["x.event.a.started", "x.event.a.finished"]
        );
    }

    #[tokio::test]
    async fn rejects_matching_suffix_only() {
        let sink = MemoryEventSink::rejecting(".finished");
        sink.send(&envelope("x.event.a.started")).await.unwrap();
        let err = sink.send(&envelope("x.event.a.finished")).await.unwrap_err();

        assert!(matches!(err, TransportError::Unavailable(_)));
        assert_eq!(sink.sent().await.len(), 1);
    }
}
