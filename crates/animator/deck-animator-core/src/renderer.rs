//! Contract between the animator and whatever performs the visual effects.

use crate::action::Action;
use crate::ids::{AnimatorId, PlaybackId};

/// Token handed to the renderer with a forward effect and handed back once
/// the effect finished. It identifies the chain step to resume.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Completion {
    pub animator: AnimatorId,
    pub playback: PlaybackId,
    /// Offset of the finished action inside its sequence.
    pub offset: usize,
}

/// One effect to perform.
#[derive(Clone, Copy, Debug)]
pub struct EffectRequest<'a> {
    /// Scope of the animator (e.g. the slide element).
    pub scope: &'a str,
    pub action: &'a Action,
    pub reverse: bool,
    /// Jump straight to the terminal state.
    pub skip: bool,
    /// `None` when nobody waits for this effect.
    pub completion: Option<Completion>,
}

impl EffectRequest<'_> {
    /// Duration the effect should take; zero when skipped.
    pub fn effective_duration_ms(&self) -> u32 {
        if self.skip {
            0
        } else {
            self.action.duration_or_zero()
        }
    }
}

/// Performs timed transitions. Completions must never be reported from inside
/// `play`; they are delivered later through [`CompletionSource`] or any other
/// channel the host routes to [`crate::Animator::on_effect_complete`].
pub trait TransitionRenderer {
    fn play(&mut self, request: EffectRequest<'_>);
    fn is_animating(&self, scope: &str, target: &str) -> bool;
    /// Finish the element's running and queued effects immediately.
    fn snap_to_end(&mut self, scope: &str, target: &str);
}

/// Renderers that buffer finished effects until the host collects them.
pub trait CompletionSource {
    fn drain_completed(&mut self) -> Vec<Completion>;
}
