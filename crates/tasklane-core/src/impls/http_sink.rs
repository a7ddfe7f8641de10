//! HttpEventSink - POSTs envelopes to the event broker.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::codec::{self, STRUCTURED_CONTENT_TYPE};
use crate::domain::{Envelope, TransportError};
use crate::ports::EventSink;

/// Delivers envelopes in structured mode to a single broker URL.
///
/// No retry happens here: the broker side is responsible for redelivery.
#[derive(Debug, Clone)]
pub struct HttpEventSink {
    client: Client,
    url: String,
}

impl HttpEventSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let body = codec::encode(envelope)?;
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, STRUCTURED_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            event_type = envelope.event_type(),
            event_id = %envelope.id(),
            "envelope delivered"
        );
        Ok(())
    }
}
