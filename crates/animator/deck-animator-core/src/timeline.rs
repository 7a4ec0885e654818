//! Deterministic, tick-driven reference renderer.
//!
//! Elements are addressed by (scope, target). Each element owns a FIFO of
//! effects: an effect played on a busy element waits for the running one,
//! and its endpoint is resolved from the style the element has when it
//! starts. Finished effects hand their completion back through
//! [`CompletionSource::drain_completed`] or [`TimelineRenderer::tick`].

use std::collections::VecDeque;
use std::f64::consts::PI;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::effect::{Effect, Style};
use crate::renderer::{Completion, CompletionSource, EffectRequest, TransitionRenderer};

/// Progress curve applied between an effect's endpoints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// `0.5 - cos(p * PI) / 2`
    #[default]
    Swing,
}

impl Easing {
    pub fn apply(self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::Swing => 0.5 - (p * PI).cos() / 2.0,
        }
    }
}

#[derive(Clone, Debug)]
struct Job {
    effect: Effect,
    reverse: bool,
    duration_ms: u32,
    completion: Option<Completion>,
}

#[derive(Clone, Debug)]
struct Running {
    job: Job,
    from: Style,
    to: Style,
    elapsed_ms: f64,
}

#[derive(Clone, Debug, Default)]
struct Element {
    style: Style,
    running: Option<Running>,
    queue: VecDeque<Job>,
}

/// Completion stamped with the time its effect ended.
type Stamped = (f64, Completion);

impl Element {
    fn with_style(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    fn is_busy(&self) -> bool {
        self.running.is_some() || !self.queue.is_empty()
    }

    fn begin(&mut self, job: Job, at_ms: f64, done: &mut Vec<Stamped>) {
        let to = job.effect.resolve(self.style, job.reverse);
        if job.duration_ms == 0 {
            self.style = to;
            done.extend(job.completion.map(|c| (at_ms, c)));
        } else {
            self.running = Some(Running {
                from: self.style,
                to,
                elapsed_ms: 0.0,
                job,
            });
        }
    }

    /// Spend `budget` ms of a tick ending at `end_ms`; the current instant is
    /// always `end_ms - budget`.
    fn advance(&mut self, end_ms: f64, mut budget: f64, easing: Easing, done: &mut Vec<Stamped>) {
        loop {
            match self.running.take() {
                Some(mut run) => {
                    let remaining = f64::from(run.job.duration_ms) - run.elapsed_ms;
                    if budget >= remaining {
                        budget -= remaining;
                        self.style = run.to;
                        done.extend(run.job.completion.map(|c| (end_ms - budget, c)));
                    } else {
                        run.elapsed_ms += budget;
                        let p = run.elapsed_ms / f64::from(run.job.duration_ms);
                        self.style = run.from.lerp(&run.to, easing.apply(p) as f32);
                        self.running = Some(run);
                        return;
                    }
                }
                None => match self.queue.pop_front() {
                    Some(job) => self.begin(job, end_ms - budget, done),
                    None => return,
                },
            }
        }
    }

    /// Jump the running and every queued job to their end states.
    fn finish(&mut self, at_ms: f64, done: &mut Vec<Stamped>) {
        if let Some(run) = self.running.take() {
            self.style = run.to;
            done.extend(run.job.completion.map(|c| (at_ms, c)));
        }
        while let Some(job) = self.queue.pop_front() {
            self.style = job.effect.resolve(self.style, job.reverse);
            done.extend(job.completion.map(|c| (at_ms, c)));
        }
    }
}

/// Reference [`TransitionRenderer`] driven by explicit time steps.
#[derive(Debug, Default)]
pub struct TimelineRenderer {
    now_ms: f64,
    easing: Easing,
    elements: IndexMap<(String, String), Element>,
    finished: Vec<Completion>,
}

impl TimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self {
            easing,
            ..Self::default()
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Set an element's style, e.g. hidden before it appears.
    pub fn set_style(&mut self, scope: &str, target: &str, style: Style) {
        self.elements
            .entry((scope.to_string(), target.to_string()))
            .or_default()
            .style = style;
    }

    /// Current style of an element; the default style if never touched.
    pub fn style(&self, scope: &str, target: &str) -> Style {
        self.elements
            .get(&(scope.to_string(), target.to_string()))
            .map(|e| e.style)
            .unwrap_or_default()
    }

    /// No element is running or waiting.
    pub fn is_idle(&self) -> bool {
        !self.elements.values().any(Element::is_busy)
    }

    /// Advance time by `dt_ms` and return every completion not yet handed
    /// out, in the order the effects ended.
    pub fn tick(&mut self, dt_ms: f64) -> Vec<Completion> {
        let dt_ms = dt_ms.max(0.0);
        let end_ms = self.now_ms + dt_ms;
        let mut done: Vec<Stamped> = Vec::new();
        for element in self.elements.values_mut() {
            element.advance(end_ms, dt_ms, self.easing, &mut done);
        }
        self.now_ms = end_ms;
        // Stable sort keeps element order for simultaneous ends.
        done.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.finished.extend(done.into_iter().map(|(_, c)| c));
        std::mem::take(&mut self.finished)
    }
}

impl TransitionRenderer for TimelineRenderer {
    fn play(&mut self, request: EffectRequest<'_>) {
        let job = Job {
            effect: request.action.effect,
            reverse: request.reverse,
            duration_ms: request.effective_duration_ms(),
            completion: request.completion,
        };
        let now_ms = self.now_ms;
        let element = self
            .elements
            .entry((request.scope.to_string(), request.action.target.clone()))
            .or_insert_with(|| Element::with_style(Style::default()));
        if element.is_busy() {
            element.queue.push_back(job);
        } else {
            let mut done = Vec::new();
            element.begin(job, now_ms, &mut done);
            self.finished.extend(done.into_iter().map(|(_, c)| c));
        }
    }

    fn is_animating(&self, scope: &str, target: &str) -> bool {
        self.elements
            .get(&(scope.to_string(), target.to_string()))
            .is_some_and(Element::is_busy)
    }

    fn snap_to_end(&mut self, scope: &str, target: &str) {
        let now_ms = self.now_ms;
        if let Some(element) = self
            .elements
            .get_mut(&(scope.to_string(), target.to_string()))
        {
            let mut done = Vec::new();
            element.finish(now_ms, &mut done);
            self.finished.extend(done.into_iter().map(|(_, c)| c));
        }
    }
}

impl CompletionSource for TimelineRenderer {
    fn drain_completed(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Trigger};
    use crate::ids::{AnimatorId, PlaybackId};

    fn completion(offset: usize) -> Completion {
        Completion {
            animator: AnimatorId(0),
            playback: PlaybackId(0),
            offset,
        }
    }

    fn request<'a>(action: &'a Action, offset: usize) -> EffectRequest<'a> {
        EffectRequest {
            scope: "#s",
            action,
            reverse: false,
            skip: false,
            completion: Some(completion(offset)),
        }
    }

    #[test]
    fn swing_is_symmetric_around_half() {
        assert_eq!(Easing::Swing.apply(0.0), 0.0);
        assert!((Easing::Swing.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((Easing::Swing.apply(1.0) - 1.0).abs() < 1e-12);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn interpolates_and_completes() {
        let mut r = TimelineRenderer::with_easing(Easing::Linear);
        r.set_style("#s", "#box", Style::hidden());
        let fade = Action::new("a", "#box", Trigger::OnChange, Some(100), Effect::Appear);
        r.play(request(&fade, 0));
        assert!(r.is_animating("#s", "#box"));
        assert!(r.tick(25.0).is_empty());
        assert!((r.style("#s", "#box").opacity - 0.25).abs() < 1e-6);
        assert_eq!(r.tick(100.0), vec![completion(0)]);
        assert_eq!(r.style("#s", "#box").opacity, 1.0);
        assert!(!r.is_animating("#s", "#box"));
    }

    #[test]
    fn zero_duration_completes_on_next_drain() {
        let mut r = TimelineRenderer::new();
        let instant = Action::new("a", "#box", Trigger::OnChange, None, Effect::Disappear);
        r.play(request(&instant, 0));
        assert_eq!(r.style("#s", "#box").opacity, 0.0);
        assert!(!r.is_animating("#s", "#box"));
        assert_eq!(r.drain_completed(), vec![completion(0)]);
        assert!(r.drain_completed().is_empty());
    }

    #[test]
    fn busy_element_queues_and_carries_overflow() {
        let mut r = TimelineRenderer::with_easing(Easing::Linear);
        let first = Action::new("a", "#box", Trigger::OnChange, Some(100), Effect::Move { dx: 10.0, dy: 0.0 });
        let second = Action::new("b", "#box", Trigger::WithPrevious, Some(100), Effect::Move { dx: 10.0, dy: 0.0 });
        r.play(request(&first, 0));
        r.play(request(&second, 1));
        assert_eq!(r.tick(150.0), vec![completion(0)]);
        // Second move started from left = 10 and is half way.
        assert!((r.style("#s", "#box").left - 15.0).abs() < 1e-4);
        assert_eq!(r.tick(50.0), vec![completion(1)]);
        assert_eq!(r.style("#s", "#box").left, 20.0);
    }

    #[test]
    fn simultaneous_ends_are_ordered_by_time() {
        let mut r = TimelineRenderer::new();
        let slow = Action::new("a", "#a", Trigger::OnChange, Some(300), Effect::Appear);
        let fast = Action::new("b", "#b", Trigger::WithPrevious, Some(100), Effect::Appear);
        r.play(request(&slow, 0));
        r.play(request(&fast, 1));
        assert_eq!(r.tick(500.0), vec![completion(1), completion(0)]);
    }

    #[test]
    fn snap_finishes_running_and_queued() {
        let mut r = TimelineRenderer::new();
        let first = Action::new("a", "#box", Trigger::OnChange, Some(1000), Effect::Move { dx: 5.0, dy: 5.0 });
        let second = Action::new("b", "#box", Trigger::AfterPrevious, Some(1000), Effect::Move { dx: 5.0, dy: 5.0 });
        r.play(request(&first, 0));
        r.play(request(&second, 1));
        r.tick(10.0);
        r.snap_to_end("#s", "#box");
        let style = r.style("#s", "#box");
        assert_eq!((style.left, style.top), (10.0, 10.0));
        assert!(r.is_idle());
        assert_eq!(r.drain_completed(), vec![completion(0), completion(1)]);
    }
}
