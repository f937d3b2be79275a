//! Application state shared across all request handlers.

use empire_core::config::EventBackend;
use empire_core::events::{Event, EventStream, EventStreamError};
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Stream that handlers publish completed actions to.
    pub events: Arc<dyn EventStream>,
    /// Which backend `events` delivers to.
    pub events_backend: EventBackend,
}

impl AppState {
    /// Create a new AppState around the configured event stream.
    pub fn new(events: Arc<dyn EventStream>, events_backend: EventBackend) -> Self {
        Self {
            events,
            events_backend,
        }
    }

    /// Publish an event for an action that has completed.
    pub async fn publish_event(&self, event: impl Into<Event>) -> Result<(), EventStreamError> {
        let event = event.into();
        tracing::debug!(event = event.kind(), user = event.user(), "Publishing event");
        self.events.publish_event(event).await
    }
}
