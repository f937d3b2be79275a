//! Event stream configuration.

use super::webhook::WebhookConfig;
use crate::events::{DEFAULT_EVENT_BUFFER, MAX_EVENT_BUFFER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors in the event stream configuration.
#[derive(Debug, Error)]
pub enum EventsConfigError {
    #[error("unknown events backend: {0} (expected null, log or webhook)")]
    UnknownBackend(String),

    #[error("events buffer must hold at least one event")]
    ZeroBuffer,

    #[error("events buffer of {0} exceeds the maximum of {max}", max = MAX_EVENT_BUFFER)]
    BufferTooLarge(usize),

    #[error("webhook events backend requires an [events.webhook] section")]
    MissingWebhook,

    #[error("invalid webhook url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to start event stream worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// Where events end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventBackend {
    /// Events are discarded.
    #[default]
    Null,
    /// Events are written to the application log.
    #[serde(alias = "stdout")]
    Log,
    /// Events are POSTed to a webhook endpoint.
    Webhook,
}

impl EventBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventBackend::Null => "null",
            EventBackend::Log => "log",
            EventBackend::Webhook => "webhook",
        }
    }
}

impl fmt::Display for EventBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventBackend {
    type Err = EventsConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" | "" => Ok(EventBackend::Null),
            "log" | "stdout" => Ok(EventBackend::Log),
            "webhook" => Ok(EventBackend::Webhook),
            other => Err(EventsConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Validated event stream configuration.
#[derive(Debug, Clone)]
pub struct EventsConfig {
    /// The backend events are delivered to.
    pub backend: EventBackend,
    /// Whether delivery is moved off the caller's path.
    pub asynchronous: bool,
    /// Queue capacity of the asynchronous stream.
    pub buffer: usize,
    /// Webhook settings, required by [`EventBackend::Webhook`].
    pub webhook: Option<WebhookConfig>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            backend: EventBackend::Null,
            asynchronous: true,
            buffer: DEFAULT_EVENT_BUFFER,
            webhook: None,
        }
    }
}

impl EventsConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), EventsConfigError> {
        if self.asynchronous && self.buffer == 0 {
            return Err(EventsConfigError::ZeroBuffer);
        }
        if self.asynchronous && self.buffer > MAX_EVENT_BUFFER {
            return Err(EventsConfigError::BufferTooLarge(self.buffer));
        }
        if self.backend == EventBackend::Webhook && self.webhook.is_none() {
            return Err(EventsConfigError::MissingWebhook);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("null".parse::<EventBackend>().unwrap(), EventBackend::Null);
        assert_eq!("Log".parse::<EventBackend>().unwrap(), EventBackend::Log);
        assert_eq!("stdout".parse::<EventBackend>().unwrap(), EventBackend::Log);
        assert_eq!(
            " webhook ".parse::<EventBackend>().unwrap(),
            EventBackend::Webhook
        );
        assert!(matches!(
            "sns".parse::<EventBackend>(),
            Err(EventsConfigError::UnknownBackend(ref b)) if b == "sns"
        ));
    }

    #[test]
    fn test_validate() {
        assert!(EventsConfig::default().validate().is_ok());

        let config = EventsConfig {
            buffer: 0,
            ..EventsConfig::default()
        };
        assert!(matches!(config.validate(), Err(EventsConfigError::ZeroBuffer)));

        let config = EventsConfig {
            buffer: 0,
            asynchronous: false,
            ..EventsConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = EventsConfig {
            buffer: MAX_EVENT_BUFFER + 1,
            ..EventsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EventsConfigError::BufferTooLarge(n)) if n == MAX_EVENT_BUFFER + 1
        ));

        let config = EventsConfig {
            buffer: MAX_EVENT_BUFFER,
            ..EventsConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = EventsConfig {
            backend: EventBackend::Webhook,
            ..EventsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EventsConfigError::MissingWebhook)
        ));
    }
}
