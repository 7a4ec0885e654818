//! Lifecycle events emitted by an animator.
//!
//! Each animator owns its own queue; hosts drain it after every call and
//! after feeding completions back. Payloads mirror the deck's event channel:
//! sequence and completion events name the animator scope, action events name
//! the action's element.

use serde::{Deserialize, Serialize};

use crate::ids::ActionId;

/// Payload of sequence and action events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub target: String,
    pub id: ActionId,
    pub reverse: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum AnimatorEvent {
    BeforeInitialize { target: String },
    Initialize { target: String },
    SequenceStart(EventPayload),
    SequenceStop(EventPayload),
    ActionStart(EventPayload),
    ActionStop(EventPayload),
    /// Nothing is left to start in the given direction.
    Completed { target: String, reverse: bool },
}

impl AnimatorEvent {
    /// Channel name used by deck hosts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeforeInitialize { .. } => "deck.animator.beforeInit",
            Self::Initialize { .. } => "deck.animator.init",
            Self::SequenceStart(_) => "deck.animator.sequence.start",
            Self::SequenceStop(_) => "deck.animator.sequence.stop",
            Self::ActionStart(_) => "deck.animator.action.start",
            Self::ActionStop(_) => "deck.animator.action.stop",
            Self::Completed { .. } => "deck.animator.completed",
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::BeforeInitialize { target }
            | Self::Initialize { target }
            | Self::Completed { target, .. } => target,
            Self::SequenceStart(p)
            | Self::SequenceStop(p)
            | Self::ActionStart(p)
            | Self::ActionStop(p) => &p.target,
        }
    }

    pub fn action_id(&self) -> Option<&ActionId> {
        match self {
            Self::SequenceStart(p)
            | Self::SequenceStop(p)
            | Self::ActionStart(p)
            | Self::ActionStop(p) => Some(&p.id),
            _ => None,
        }
    }

    pub fn is_reverse(&self) -> bool {
        match self {
            Self::Completed { reverse, .. } => *reverse,
            Self::SequenceStart(p)
            | Self::SequenceStop(p)
            | Self::ActionStart(p)
            | Self::ActionStop(p) => p.reverse,
            _ => false,
        }
    }
}

/// Ordered buffer of pending events.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<AnimatorEvent>,
}

impl EventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, event: AnimatorEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn as_slice(&self) -> &[AnimatorEvent] {
        &self.events
    }

    #[inline]
    pub fn drain(&mut self) -> Vec<AnimatorEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let ev = AnimatorEvent::ActionStart(EventPayload {
            target: "#box".into(),
            id: "a1".into(),
            reverse: false,
        });
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "action_start");
        assert_eq!(json["id"], "a1");
        assert_eq!(ev.name(), "deck.animator.action.start");
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut q = EventQueue::with_capacity(4);
        q.push(AnimatorEvent::Completed {
            target: "#s".into(),
            reverse: true,
        });
        assert_eq!(q.drain().len(), 1);
        assert!(q.as_slice().is_empty());
    }
}
