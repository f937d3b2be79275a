//! Webhook delivery configuration.

use std::time::Duration;
use url::Url;

/// Default per-request timeout for webhook deliveries.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how the webhook stream delivers events.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint that receives one `POST` per event.
    pub url: Url,
    /// Secret key bytes for HMAC signing. Deliveries are unsigned without it.
    pub secret: Option<Box<[u8]>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WebhookConfig {
    /// Create a new WebhookConfig with the default timeout.
    pub fn new(url: Url, secret: Option<Box<[u8]>>) -> Self {
        Self {
            url,
            secret,
            timeout: DEFAULT_WEBHOOK_TIMEOUT,
        }
    }

    /// Get the secret key bytes for HMAC signing, if any.
    pub fn secret_bytes(&self) -> Option<&[u8]> {
        self.secret.as_deref()
    }
}
