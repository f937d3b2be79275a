//! Event stream contract and the trivial streams built on it.

use super::types::Event;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while publishing an event.
#[derive(Debug, Error)]
pub enum EventStreamError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Delivery failed (non-2xx status)
    #[error("event delivery failed with status {status}: {body}")]
    DeliveryFailed { status: u16, body: String },

    /// Payload serialization error
    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The downstream stream panicked while handling the event.
    #[error("panic: {0}")]
    Panic(String),

    /// The asynchronous worker is no longer receiving events.
    #[error("event stream closed")]
    Closed,

    /// Failure reported by an ad-hoc stream.
    #[error("{0}")]
    Rejected(String),
}

/// Something that events can be published to.
///
/// Implementations may deliver over the network or record locally. Direct
/// callers see every failure; wrap a stream in
/// [`AsyncEventStream`](super::AsyncEventStream) to decouple callers from
/// delivery.
#[async_trait]
pub trait EventStream: Send + Sync {
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError>;
}

#[async_trait]
impl<S: EventStream + ?Sized> EventStream for Arc<S> {
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError> {
        (**self).publish_event(event).await
    }
}

#[async_trait]
impl<S: EventStream + ?Sized> EventStream for Box<S> {
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError> {
        (**self).publish_event(event).await
    }
}

/// An event stream that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventStream;

#[async_trait]
impl EventStream for NullEventStream {
    async fn publish_event(&self, _event: Event) -> Result<(), EventStreamError> {
        Ok(())
    }
}

/// Adapts a plain function into an [`EventStream`].
pub struct EventStreamFn<F>(pub F);

#[async_trait]
impl<F> EventStream for EventStreamFn<F>
where
    F: Fn(Event) -> Result<(), EventStreamError> + Send + Sync,
{
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError> {
        (self.0)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::{DeployEvent, RestartEvent};
    use std::sync::Mutex;

    fn deploy() -> Event {
        DeployEvent {
            user: "alice".into(),
            app: "web".into(),
            image: "repo:v2".into(),
        }
        .into()
    }

    #[tokio::test]
    async fn test_null_stream_accepts_everything() {
        let stream = NullEventStream;
        assert!(stream.publish_event(deploy()).await.is_ok());
        assert!(
            stream
                .publish_event(
                    RestartEvent {
                        user: "bob".into(),
                        app: "api".into(),
                        pid: String::new(),
                    }
                    .into()
                )
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_stream_fn_surfaces_errors() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let stream = EventStreamFn(move |event: Event| -> Result<(), EventStreamError> {
            recorder.lock().unwrap().push(event.kind());
            Err(EventStreamError::Rejected("boom".into()))
        });

        let err = stream.publish_event(deploy()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(*seen.lock().unwrap(), vec!["deploy"]);
    }

    #[tokio::test]
    async fn test_shared_stream_is_a_stream() {
        let stream: Arc<dyn EventStream> = Arc::new(NullEventStream);
        assert!(stream.publish_event(deploy()).await.is_ok());

        let boxed: Box<dyn EventStream> = Box::new(NullEventStream);
        assert!(boxed.publish_event(deploy()).await.is_ok());
    }
}
