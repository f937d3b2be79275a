//! Event system.
//!
//! This module provides the event taxonomy and the streams events are
//! published to.
//!
//! # Event Flow
//!
//! 1. An API handler completes an action and builds the matching [`Event`]
//! 2. The handler calls [`EventStream::publish_event`] on the configured stream
//! 3. With an [`AsyncEventStream`] the event is queued and the handler
//!    continues; the worker forwards it to the wrapped stream
//!
//! Delivery is best effort: failed events are logged and dropped.

pub mod async_stream;
pub mod stream;
pub mod types;

pub use async_stream::{AsyncEventStream, DEFAULT_EVENT_BUFFER, MAX_EVENT_BUFFER};
pub use stream::{EventStream, EventStreamError, EventStreamFn, NullEventStream};
pub use types::{
    CreateEvent, DeployEvent, Event, RestartEvent, RollbackEvent, RunEvent, ScaleEvent, SetEvent,
};
