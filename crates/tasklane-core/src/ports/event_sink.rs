//! EventSink port - the bus client
//!
//! Sessions emit their `started` / `status.changed` / `finished` envelopes
//! through this trait.
//!
//! # 実装
//! - `HttpEventSink`: POST to the event broker（本番用）
//! - `MemoryEventSink`: records envelopes（テスト用）

use async_trait::async_trait;

use crate::domain::{Envelope, TransportError};

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError>;
}
