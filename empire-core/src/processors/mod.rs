//! Event stream backends.
//!
//! - `LogEventStream`: writes events to the application log
//! - `WebhookEventStream`: POSTs events to an HTTP endpoint
//!
//! [`build_event_stream`] turns an [`EventsConfig`] into the stream API
//! handlers publish to.

pub mod log_stream;
pub mod webhook_stream;

pub use log_stream::LogEventStream;
pub use webhook_stream::{EventPayload, WebhookEventStream};

use crate::config::{EventBackend, EventsConfig, EventsConfigError};
use crate::events::{AsyncEventStream, EventStream, NullEventStream};
use std::sync::Arc;
use tracing::info;

/// Build the configured event stream.
///
/// When `asynchronous` is set the backend is wrapped in an
/// [`AsyncEventStream`], which starts its own worker thread.
pub fn build_event_stream(
    config: &EventsConfig,
) -> Result<Arc<dyn EventStream>, EventsConfigError> {
    config.validate()?;

    let backend: Arc<dyn EventStream> = match config.backend {
        EventBackend::Null => Arc::new(NullEventStream),
        EventBackend::Log => Arc::new(LogEventStream),
        EventBackend::Webhook => {
            let webhook = config
                .webhook
                .as_ref()
                .ok_or(EventsConfigError::MissingWebhook)?;
            Arc::new(WebhookEventStream::new(webhook))
        }
    };

    info!(
        backend = %config.backend,
        asynchronous = config.asynchronous,
        buffer = config.buffer,
        "Event stream configured"
    );

    if config.asynchronous {
        Ok(Arc::new(AsyncEventStream::with_capacity(
            backend,
            config.buffer,
        )?))
    } else {
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CreateEvent;

    fn create() -> crate::events::Event {
        CreateEvent {
            user: "ejholmes".into(),
            name: "acme-inc".into(),
        }
        .into()
    }

    #[tokio::test]
    async fn test_builds_default_stream() {
        let stream = build_event_stream(&EventsConfig::default()).unwrap();
        assert!(stream.publish_event(create()).await.is_ok());
    }

    #[tokio::test]
    async fn test_builds_synchronous_log_stream() {
        let config = EventsConfig {
            backend: EventBackend::Log,
            asynchronous: false,
            ..EventsConfig::default()
        };
        let stream = build_event_stream(&config).unwrap();
        assert!(stream.publish_event(create()).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_webhook_without_settings() {
        let config = EventsConfig {
            backend: EventBackend::Webhook,
            ..EventsConfig::default()
        };
        assert!(matches!(
            build_event_stream(&config),
            Err(EventsConfigError::MissingWebhook)
        ));
    }

    #[test]
    fn test_rejects_oversized_buffer() {
        let config = EventsConfig {
            buffer: 1 << 62,
            ..EventsConfig::default()
        };
        assert!(matches!(
            build_event_stream(&config),
            Err(EventsConfigError::BufferTooLarge(_))
        ));
    }
}
