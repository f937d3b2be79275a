//! TOML file configuration structures.
//!
//! These structs directly map to the `empire.toml` file format.

use empire_core::config::{DEFAULT_WEBHOOK_TIMEOUT, EventBackend};
use empire_core::events::DEFAULT_EVENT_BUFFER;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Events configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Where events are delivered: `null`, `log` or `webhook`.
    #[serde(default)]
    pub backend: EventBackend,
    /// Deliver events from a background worker instead of the request path.
    #[serde(default = "default_async", rename = "async")]
    pub asynchronous: bool,
    /// Number of events buffered before publishers wait.
    #[serde(default = "default_buffer")]
    pub buffer: usize,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            backend: EventBackend::default(),
            asynchronous: default_async(),
            buffer: default_buffer(),
            webhook: None,
        }
    }
}

fn default_async() -> bool {
    true
}

fn default_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

/// Webhook backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint receiving one POST per event.
    pub url: String,
    /// Optional HMAC secret; deliveries carry an `Empire-Signature` header when set.
    #[serde(default)]
    pub secret: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT.as_secs()
}
