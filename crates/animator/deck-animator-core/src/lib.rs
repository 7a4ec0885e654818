//! Deck Animator Core (host-agnostic)
//!
//! Plays a slide's list of visual actions one sequence at a time. Actions are
//! grouped into sequences by their trigger (`OnChange` opens a sequence,
//! `WithPrevious` runs alongside, `AfterPrevious` chains on completion); the
//! [`Animator`] walks those sequences forward and backward on request, drives
//! a [`TransitionRenderer`] and queues lifecycle [`AnimatorEvent`]s for the host.

pub mod action;
pub mod animator;
pub mod config;
pub mod descriptor;
pub mod effect;
pub mod error;
pub mod events;
pub mod ids;
pub mod renderer;
pub mod sequence;
pub mod timeline;

// Re-exports for consumers (hosts)
pub use action::{Action, Trigger};
pub use animator::{Animator, AnimatorState};
pub use config::{Config, FinishPolicy};
pub use descriptor::{
    parse_animator_json, parse_deck_json, ActionDescriptor, AnimatorDescriptor, DeckDescriptor,
};
pub use effect::{Effect, Style};
pub use error::ConfigurationError;
pub use events::{AnimatorEvent, EventPayload};
pub use ids::{ActionId, AnimatorId, IdAllocator, PlaybackId};
pub use renderer::{Completion, CompletionSource, EffectRequest, TransitionRenderer};
pub use sequence::{partition, Sequence, Timing};
pub use timeline::{Easing, TimelineRenderer};
