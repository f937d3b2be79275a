//! LogEventStream.
//!
//! Writes every event to the application log under the `empire::events`
//! target, so operators get an audit trail without any extra
//! infrastructure.

use crate::events::{Event, EventStream, EventStreamError};
use async_trait::async_trait;
use tracing::info;

/// An event stream that records events as structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventStream;

#[async_trait]
impl EventStream for LogEventStream {
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError> {
        info!(
            target: "empire::events",
            event = event.kind(),
            user = event.user(),
            description = %event,
            "event published"
        );
        Ok(())
    }
}
