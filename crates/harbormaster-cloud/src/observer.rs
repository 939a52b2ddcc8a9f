//! Progress reporting
//!
//! Reconcilers report what they locate, decide and issue through an
//! [`Observer`] handed to them at construction.

use crate::resource::ResourceKind;

/// A reconciliation milestone
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    Located {
        kind: ResourceKind,
        name: &'a str,
        found: bool,
    },
    Decided {
        kind: ResourceKind,
        name: &'a str,
        decision: &'static str,
    },
    ActionIssued {
        node_id: u64,
        action: &'a str,
    },
    Polled {
        target: &'a str,
        attempt: u32,
        max_attempts: Option<u32>,
        reached: bool,
    },
    PollExhausted {
        target: &'a str,
        attempts: u32,
    },
    Escalated {
        node_id: u64,
        from: &'a str,
        to: &'a str,
    },
}

impl std::fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Located { kind, name, found } => {
                if *found {
                    write!(f, "{} '{}' exists", kind, name)
                } else {
                    write!(f, "{} '{}' does not exist", kind, name)
                }
            }
            Event::Decided {
                kind,
                name,
                decision,
            } => write!(f, "{} '{}': {}", kind, name, decision),
            Event::ActionIssued { node_id, action } => {
                write!(f, "issued '{}' on node {}", action, node_id)
            }
            Event::Polled {
                target,
                attempt,
                max_attempts,
                reached,
            } => {
                let budget = max_attempts
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "∞".to_string());
                let state = if *reached { "reached" } else { "waiting" };
                write!(f, "poll {}/{} for {}: {}", attempt, budget, target, state)
            }
            Event::PollExhausted { target, attempts } => {
                write!(f, "gave up waiting for {} after {} attempts", target, attempts)
            }
            Event::Escalated { node_id, from, to } => {
                write!(f, "node {}: escalating '{}' to '{}'", node_id, from, to)
            }
        }
    }
}

/// Receives reconciliation events
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event<'_>);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &Event<'_>) {
        match event {
            Event::Polled { .. } | Event::Located { .. } => tracing::debug!("{}", event),
            Event::PollExhausted { .. } | Event::Escalated { .. } => tracing::warn!("{}", event),
            Event::Decided { .. } | Event::ActionIssued { .. } => tracing::info!("{}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = Event::Polled {
            target: "status off",
            attempt: 2,
            max_attempts: Some(10),
            reached: false,
        };
        assert_eq!(event.to_string(), "poll 2/10 for status off: waiting");

        let event = Event::Polled {
            target: "unlock",
            attempt: 7,
            max_attempts: None,
            reached: true,
        };
        assert_eq!(event.to_string(), "poll 7/∞ for unlock: reached");

        let event = Event::Located {
            kind: ResourceKind::Node,
            name: "web-1",
            found: false,
        };
        assert_eq!(event.to_string(), "node 'web-1' does not exist");
    }
}
