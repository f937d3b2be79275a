//! Event type definitions.
//!
//! Every event describes a domain action that has already completed by the
//! time the event is built. Events are plain values: building one has no
//! side effects and cannot fail.

use serde::Serialize;
use std::fmt;

/// Triggered when a user starts a one off process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEvent {
    pub user: String,
    pub app: String,
    pub command: String,
    pub attached: bool,
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attachment = if self.attached { "attached" } else { "detached" };
        write!(
            f,
            "{} ran `{}` ({}) on {}",
            self.user, self.command, attachment, self.app
        )
    }
}

/// Triggered when a user restarts an application, or a single process of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestartEvent {
    pub user: String,
    pub app: String,
    /// Empty when the whole application was restarted.
    pub pid: String,
}

impl fmt::Display for RestartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pid.is_empty() {
            write!(f, "{} restarted {}", self.user, self.app)
        } else {
            write!(f, "{} restarted `{}` on {}", self.user, self.pid, self.app)
        }
    }
}

/// Triggered when a manual scaling event happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleEvent {
    pub user: String,
    pub app: String,
    pub process: String,
    pub quantity: i64,
}

impl fmt::Display for ScaleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scaled `{}` on {} to {}",
            self.user, self.process, self.app, self.quantity
        )
    }
}

/// Triggered when a user deploys a new image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployEvent {
    pub user: String,
    /// Empty when the target app was inferred from the image.
    pub app: String,
    pub image: String,
}

impl fmt::Display for DeployEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.app.is_empty() {
            write!(f, "{} deployed {}", self.user, self.image)
        } else {
            write!(f, "{} deployed {} to {}", self.user, self.image, self.app)
        }
    }
}

/// Triggered when environment variables are changed on an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetEvent {
    pub user: String,
    pub app: String,
    pub changed: Vec<String>,
}

impl fmt::Display for SetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed environment variables on {} ({})",
            self.user,
            self.app,
            self.changed.join(", ")
        )
    }
}

/// Triggered when a user rolls back to an old release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackEvent {
    pub user: String,
    pub app: String,
    pub version: i64,
}

impl fmt::Display for RollbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rolled back {} to v{}", self.user, self.app, self.version)
    }
}

/// Triggered when a user creates a new application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateEvent {
    pub user: String,
    pub name: String,
}

impl fmt::Display for CreateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} created {}", self.user, self.name)
    }
}

/// An event triggered within Empire.
///
/// The set of variants is closed; sinks match on it when they need the
/// structured fields and use [`Event::description`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Event {
    Run(RunEvent),
    Restart(RestartEvent),
    Scale(ScaleEvent),
    Deploy(DeployEvent),
    Set(SetEvent),
    Rollback(RollbackEvent),
    Create(CreateEvent),
}

impl Event {
    /// Stable identifier of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Run(_) => "run",
            Event::Restart(_) => "restart",
            Event::Scale(_) => "scale",
            Event::Deploy(_) => "deploy",
            Event::Set(_) => "set",
            Event::Rollback(_) => "rollback",
            Event::Create(_) => "create",
        }
    }

    /// Human readable description of the event.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// The user that triggered the action.
    pub fn user(&self) -> &str {
        match self {
            Event::Run(e) => &e.user,
            Event::Restart(e) => &e.user,
            Event::Scale(e) => &e.user,
            Event::Deploy(e) => &e.user,
            Event::Set(e) => &e.user,
            Event::Rollback(e) => &e.user,
            Event::Create(e) => &e.user,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Run(e) => e.fmt(f),
            Event::Restart(e) => e.fmt(f),
            Event::Scale(e) => e.fmt(f),
            Event::Deploy(e) => e.fmt(f),
            Event::Set(e) => e.fmt(f),
            Event::Rollback(e) => e.fmt(f),
            Event::Create(e) => e.fmt(f),
        }
    }
}

macro_rules! impl_from_event {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Event {
                fn from(event: $ty) -> Self {
                    Event::$variant(event)
                }
            }
        )*
    };
}

impl_from_event!(
    Run(RunEvent),
    Restart(RestartEvent),
    Scale(ScaleEvent),
    Deploy(DeployEvent),
    Set(SetEvent),
    Rollback(RollbackEvent),
    Create(CreateEvent),
);

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<Event> {
        vec![
            RunEvent {
                user: "ejholmes".into(),
                app: "acme-inc".into(),
                command: "bash".into(),
                attached: true,
            }
            .into(),
            RestartEvent {
                user: "ejholmes".into(),
                app: "acme-inc".into(),
                pid: String::new(),
            }
            .into(),
            ScaleEvent {
                user: "ejholmes".into(),
                app: "acme-inc".into(),
                process: "web".into(),
                quantity: 0,
            }
            .into(),
            DeployEvent {
                user: "ejholmes".into(),
                app: String::new(),
                image: "remind101/acme-inc:latest".into(),
            }
            .into(),
            SetEvent {
                user: "ejholmes".into(),
                app: "acme-inc".into(),
                changed: vec![],
            }
            .into(),
            RollbackEvent {
                user: "ejholmes".into(),
                app: "acme-inc".into(),
                version: 1,
            }
            .into(),
            CreateEvent {
                user: "ejholmes".into(),
                name: "acme-inc".into(),
            }
            .into(),
        ]
    }

    #[test]
    fn test_descriptions_contain_user() {
        for event in all_variants() {
            let description = event.description();
            assert!(!description.is_empty(), "{} has empty description", event.kind());
            assert!(description.starts_with("ejholmes "), "{description}");
            assert_eq!(event.user(), "ejholmes");
        }
    }

    #[test]
    fn test_kinds() {
        let kinds: Vec<_> = all_variants().iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            ["run", "restart", "scale", "deploy", "set", "rollback", "create"]
        );
    }

    #[test]
    fn test_run_description() {
        let mut event = RunEvent {
            user: "ejholmes".into(),
            app: "acme-inc".into(),
            command: "bash".into(),
            attached: true,
        };
        assert_eq!(event.to_string(), "ejholmes ran `bash` (attached) on acme-inc");

        event.attached = false;
        assert_eq!(event.to_string(), "ejholmes ran `bash` (detached) on acme-inc");
    }

    #[test]
    fn test_restart_description() {
        let event = RestartEvent {
            user: "bob".into(),
            app: "api".into(),
            pid: String::new(),
        };
        assert_eq!(event.to_string(), "bob restarted api");

        let event = RestartEvent {
            pid: "web.1".into(),
            ..event
        };
        assert_eq!(event.to_string(), "bob restarted `web.1` on api");
    }

    #[test]
    fn test_scale_description() {
        let event = ScaleEvent {
            user: "ejholmes".into(),
            app: "acme-inc".into(),
            process: "web".into(),
            quantity: 10,
        };
        assert_eq!(event.to_string(), "ejholmes scaled `web` on acme-inc to 10");
    }

    #[test]
    fn test_deploy_description() {
        let event = DeployEvent {
            user: "alice".into(),
            app: String::new(),
            image: "repo:v2".into(),
        };
        assert_eq!(event.to_string(), "alice deployed repo:v2");

        let event = DeployEvent {
            app: "web".into(),
            ..event
        };
        assert_eq!(event.to_string(), "alice deployed repo:v2 to web");
    }

    #[test]
    fn test_set_description() {
        let event = SetEvent {
            user: "ejholmes".into(),
            app: "acme-inc".into(),
            changed: vec!["RAILS_ENV".into(), "DATABASE_URL".into()],
        };
        assert_eq!(
            event.to_string(),
            "ejholmes changed environment variables on acme-inc (RAILS_ENV, DATABASE_URL)"
        );
    }

    #[test]
    fn test_rollback_and_create_description() {
        let rollback = RollbackEvent {
            user: "ejholmes".into(),
            app: "acme-inc".into(),
            version: 1,
        };
        assert_eq!(rollback.to_string(), "ejholmes rolled back acme-inc to v1");

        let create = CreateEvent {
            user: "ejholmes".into(),
            name: "acme-inc".into(),
        };
        assert_eq!(create.to_string(), "ejholmes created acme-inc");
    }

    #[test]
    fn test_event_display_matches_variant() {
        let deploy = DeployEvent {
            user: "alice".into(),
            app: "web".into(),
            image: "repo:v2".into(),
        };
        let event = Event::from(deploy.clone());
        assert_eq!(event.description(), deploy.to_string());
    }

    #[test]
    fn test_serializes_variant_fields() {
        let event: Event = ScaleEvent {
            user: "ejholmes".into(),
            app: "acme-inc".into(),
            process: "worker".into(),
            quantity: 2,
        }
        .into();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "user": "ejholmes",
                "app": "acme-inc",
                "process": "worker",
                "quantity": 2
            })
        );
    }
}
