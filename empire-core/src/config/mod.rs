//! Configuration types for the event subsystem.
//!
//! These types represent the validated runtime configuration. The actual
//! config loading/parsing is handled by the server crate.

mod events;
mod webhook;

pub use events::{EventBackend, EventsConfig, EventsConfigError};
pub use webhook::{DEFAULT_WEBHOOK_TIMEOUT, WebhookConfig};
