//! Asynchronous event delivery.
//!
//! [`AsyncEventStream`] wraps another [`EventStream`] and moves delivery off
//! the caller's path:
//! - Publishing pushes the event onto a bounded queue and returns as soon as
//!   the event is accepted
//! - A full queue suspends the publisher until the worker frees a slot
//! - A single worker thread drains the queue in FIFO order and awaits each
//!   downstream delivery before taking the next event
//! - Downstream errors and panics are logged and the event is dropped; the
//!   worker keeps going
//!
//! The worker owns its thread and a current-thread runtime, so a stream that
//! blocks only ever stalls the worker, never the publishers.

use super::stream::{EventStream, EventStreamError};
use super::types::Event;
use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info};

/// Number of events buffered before publishers are made to wait.
pub const DEFAULT_EVENT_BUFFER: usize = 100;

/// Largest queue a channel can be built with.
pub const MAX_EVENT_BUFFER: usize = Semaphore::MAX_PERMITS;

/// Publishes events to a wrapped stream from a background worker.
///
/// Cloning yields another handle onto the same queue and worker.
#[derive(Clone)]
pub struct AsyncEventStream {
    events: mpsc::Sender<Event>,
}

impl AsyncEventStream {
    /// Wrap `stream` with a queue of [`DEFAULT_EVENT_BUFFER`] events.
    ///
    /// The worker thread is started immediately.
    pub fn new<S>(stream: S) -> std::io::Result<Self>
    where
        S: EventStream + 'static,
    {
        Self::with_capacity(stream, DEFAULT_EVENT_BUFFER)
    }

    /// Wrap `stream` with a queue of `capacity` events, clamped to
    /// `1..=MAX_EVENT_BUFFER`.
    pub fn with_capacity<S>(stream: S, capacity: usize) -> std::io::Result<Self>
    where
        S: EventStream + 'static,
    {
        let (events, rx) = mpsc::channel(capacity.clamp(1, MAX_EVENT_BUFFER));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        std::thread::Builder::new()
            .name("empire-events".into())
            .spawn(move || runtime.block_on(run_worker(stream, rx)))?;

        Ok(Self { events })
    }

    /// Number of free slots left in the queue.
    pub fn remaining_capacity(&self) -> usize {
        self.events.capacity()
    }
}

#[async_trait]
impl EventStream for AsyncEventStream {
    async fn publish_event(&self, event: Event) -> Result<(), EventStreamError> {
        self.events
            .send(event)
            .await
            .map_err(|_| EventStreamError::Closed)
    }
}

async fn run_worker<S: EventStream>(stream: S, mut rx: mpsc::Receiver<Event>) {
    info!("Async event stream worker started");

    while let Some(event) = rx.recv().await {
        let kind = event.kind();
        debug!(event = kind, "Delivering event");

        if let Err(e) = deliver(&stream, event).await {
            error!(error = %e, event = kind, "event stream error");
        }
    }

    info!("Async event stream closed, worker exiting");
}

/// Deliver one event, converting a panic in the downstream stream into an
/// error.
async fn deliver<S: EventStream>(stream: &S, event: Event) -> Result<(), EventStreamError> {
    // The async block keeps the call itself inside the boundary, not just
    // the returned future.
    AssertUnwindSafe(async { stream.publish_event(event).await })
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(EventStreamError::Panic(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "unknown panic payload".to_string(),
        },
    }
}
