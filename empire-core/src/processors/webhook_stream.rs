//! WebhookEventStream.
//!
//! The WebhookEventStream is responsible for:
//! - Serializing each event into an [`EventPayload`]
//! - Signing the body when a secret is configured
//! - Sending one HTTP POST per event
//!
//! Non-2xx responses are reported as errors. There are no retries; put the
//! stream behind an `AsyncEventStream` to keep slow endpoints off the
//! request path.

use crate::config::WebhookConfig;
use crate::events::{Event, EventStream, EventStreamError};
use crate::signature::{SIGNATURE_HEADER, sign_body};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Body of a webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload<'a> {
    /// Unique id of this delivery.
    pub id: Uuid,
    /// Event kind, e.g. `deploy`.
    pub event: &'static str,
    /// Human readable description.
    pub message: String,
    /// Unix timestamp (seconds) at which the payload was built.
    pub timestamp: i64,
    /// The structured event fields.
    pub data: &'a Event,
}

impl<'a> EventPayload<'a> {
    pub fn new(event: &'a Event) -> Self {
        Self {
            id: Uuid::now_v7(),
            event: event.kind(),
            message: event.description(),
            timestamp: time::OffsetDateTime::now_utc().unix_timestamp(),
            data: event,
        }
    }
}

/// Delivers events to a webhook endpoint.
pub struct WebhookEventStream {
    url: Url,
    secret: Option<Box<[u8]>>,
    http_client: reqwest::Client,
}

impl WebhookEventStream {
    /// Create a new WebhookEventStream.
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            url: config.url.clone(),
            secret: config.secret.clone(),
            http_client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Send the webhook HTTP request.
    async fn send_webhook(&self, body: String) -> Result<(), EventStreamError> {
        let mut request = self
            .http_client
            .post(self.url.clone())
            .header("Content-Type", "application/json");

        if let Some(secret) = self.secret.as_deref() {
            request = request.header(SIGNATURE_HEADER, sign_body(&body, secret));
        }

        let response = request.body(body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(EventStreamError::DeliveryFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl EventStream for WebhookEventStream {
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError> {
        let payload = EventPayload::new(&event);
        let body = serde_json::to_string(&payload)?;

        match self.send_webhook(body).await {
            Ok(()) => {
                debug!(id = %payload.id, event = payload.event, "Webhook delivered");
                Ok(())
            }
            Err(e) => {
                warn!(
                    id = %payload.id,
                    event = payload.event,
                    error = %e,
                    "Webhook delivery failed"
                );
                Err(e)
            }
        }
    }
}
