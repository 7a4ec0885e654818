use deck_animator_core::{Completion, CompletionSource, TimelineRenderer, TransitionRenderer};

/// A renderer the deck can drive frame by frame.
pub trait FrameRenderer: TransitionRenderer + CompletionSource {
    /// Let `dt_ms` pass; returns the completions of effects that ended.
    fn step(&mut self, dt_ms: f64) -> Vec<Completion>;
}

impl FrameRenderer for TimelineRenderer {
    fn step(&mut self, dt_ms: f64) -> Vec<Completion> {
        self.tick(dt_ms)
    }
}
