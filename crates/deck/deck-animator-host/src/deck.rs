use anyhow::{Context, Result};
use hashbrown::HashMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use deck_animator_core::{
    parse_deck_json, Animator, AnimatorDescriptor, AnimatorEvent, AnimatorId, Completion,
    IdAllocator,
};

use crate::autoplay::IdleTimer;
use crate::config::DeckConfig;
use crate::render::FrameRenderer;

/// Outcome of [`Deck::before_change`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// The slide change may proceed.
    Allowed,
    /// An animator consumed the step; the host must stay on the slide.
    Prevented,
}

/// Something the deck asks its host to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum HostRequest {
    /// Go to the next slide (autoplay).
    NextSlide,
}

/// An animator event tagged with the slide it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideEvent {
    pub slide: usize,
    #[serde(flatten)]
    pub event: AnimatorEvent,
}

/// Slide navigation policy on top of one optional animator per slide.
///
/// The host reports navigation through [`Deck::before_change`] and
/// [`Deck::changed`], key presses that may not move the deck through
/// [`Deck::next_pressed`] / [`Deck::previous_pressed`], and time through
/// [`Deck::tick`]. Key presses are reported after any slide change they
/// caused.
#[derive(Debug)]
pub struct Deck<R> {
    cfg: DeckConfig,
    renderer: R,
    slides: Vec<Option<Animator>>,
    owners: HashMap<AnimatorId, usize>,
    current: usize,
    page_loaded: bool,
    /// A slide change happened since the last navigation decision.
    slide_changed: bool,
    autoplay: bool,
    idle: IdleTimer,
    events: Vec<SlideEvent>,
    requests: Vec<HostRequest>,
}

impl<R: FrameRenderer> Deck<R> {
    /// Build one animator per slide. Slides whose descriptor is invalid get
    /// none.
    pub fn new(slides: Vec<Option<AnimatorDescriptor>>, renderer: R, cfg: DeckConfig) -> Self {
        let mut ids = IdAllocator::new();
        let mut owners = HashMap::new();
        let slides = slides
            .into_iter()
            .enumerate()
            .map(|(slide, desc)| {
                let desc = desc?;
                let id = ids.alloc_animator();
                match Animator::from_descriptor(id, desc, cfg.animator.clone()) {
                    Ok(anim) => {
                        owners.insert(id, slide);
                        Some(anim)
                    }
                    Err(err) => {
                        warn!("slide {slide}: animator disabled: {err}");
                        None
                    }
                }
            })
            .collect();
        Self {
            cfg,
            renderer,
            slides,
            owners,
            current: 0,
            page_loaded: false,
            slide_changed: false,
            autoplay: false,
            idle: IdleTimer::default(),
            events: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Parse a deck descriptor (`{"slides": [...]}`) and build the deck.
    pub fn from_json(json: &str, renderer: R, cfg: DeckConfig) -> Result<Self> {
        let deck = parse_deck_json(json).context("failed to parse deck descriptor")?;
        Ok(Self::new(deck.slides, renderer, cfg))
    }

    pub fn config(&self) -> &DeckConfig {
        &self.cfg
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn current_slide(&self) -> usize {
        self.current
    }

    pub fn animator(&self, slide: usize) -> Option<&Animator> {
        self.slides.get(slide).and_then(Option::as_ref)
    }

    pub fn is_autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn is_page_loaded(&self) -> bool {
        self.page_loaded
    }

    /// The slide has an animator that is not done yet.
    pub fn has_animations(&self, slide: usize) -> bool {
        self.animator(slide)
            .is_some_and(|anim| !anim.is_completed(&self.renderer))
    }

    /// Deck initialised. Without an anchor no change notification will
    /// follow, so the first slide counts as loaded right away.
    pub fn init(&mut self, has_anchor: bool) {
        if has_anchor {
            return;
        }
        self.page_loaded = true;
        self.verify_immediate_start(0);
        self.pump();
    }

    /// The deck is about to move from `from` to `to`.
    pub fn before_change(&mut self, from: usize, to: usize) -> Navigation {
        let nav = self.manage(from, to);
        self.pump();
        nav
    }

    /// The deck moved from `from` to `to`.
    pub fn changed(&mut self, from: usize, to: usize) {
        self.slide_changed = true;
        if !self.page_loaded {
            // Opened on a later slide: earlier slides show their final state.
            for slide in 0..to.min(self.slides.len()) {
                if !self.has_animations(slide) {
                    continue;
                }
                if let Some(anim) = self.slides[slide].as_mut() {
                    anim.start_from_the_end(&mut self.renderer);
                }
            }
        }
        self.page_loaded = true;
        self.current = to;
        self.idle.cancel();

        if self.autoplay && from + 1 == to {
            if self.has_animations(to) {
                self.manage(to, to + 1);
            } else {
                debug!("slide {to}: nothing to play, leaving in {} ms", self.cfg.autoplay_idle_ms);
                self.idle.arm(self.cfg.autoplay_idle_ms);
            }
        }
        if !self.autoplay {
            self.verify_immediate_start(to);
        }
        self.pump();
    }

    /// "Next" was pressed. On the last slide the deck cannot move, so the
    /// press goes to the slide's animator.
    pub fn next_pressed(&mut self) {
        self.autoplay = false;
        if self.current + 1 == self.slides.len() && !self.slide_changed {
            self.manage(self.current, self.current);
        }
        self.slide_changed = false;
        self.pump();
    }

    /// "Previous" was pressed. On the first slide the press goes to the
    /// slide's animator.
    pub fn previous_pressed(&mut self) {
        self.autoplay = false;
        if self.current == 0 && !self.slide_changed {
            self.manage(self.current, self.current);
        }
        self.slide_changed = false;
        self.pump();
    }

    pub fn toggle_autoplay(&mut self) {
        self.autoplay = !self.autoplay;
        debug!("autoplay {}", if self.autoplay { "on" } else { "off" });
        if self.autoplay {
            self.autoplay_next();
            self.pump();
        }
    }

    /// Let `dt_ms` pass: finished effects chain on, autoplay reacts to
    /// stopped sequences and the idle timer counts down.
    pub fn tick(&mut self, dt_ms: f64) {
        let done = self.renderer.step(dt_ms);
        self.route(done);
        self.pump();
        if self.idle.tick(dt_ms) && self.autoplay {
            self.requests.push(HostRequest::NextSlide);
        }
    }

    pub fn drain_events(&mut self) -> Vec<SlideEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    fn manage(&mut self, from: usize, to: usize) -> Navigation {
        self.slide_changed = false;
        if !self.page_loaded {
            return Navigation::Allowed;
        }
        let last = self.slides.len().saturating_sub(1);
        let Some(anim) = self.slides.get_mut(from).and_then(Option::as_mut) else {
            return Navigation::Allowed;
        };
        let forward = to == from + 1 || (from == to && to == last);
        let backward = from == to + 1 || (from == to && to == 0);

        if forward && !anim.is_completed(&self.renderer) {
            if anim.has_started() {
                anim.advance(&mut self.renderer, true);
            } else {
                anim.restart(&mut self.renderer);
            }
            debug!("slide {from}: forward step kept by the animator");
            Navigation::Prevented
        } else if backward && anim.has_started() {
            anim.retreat(&mut self.renderer, true);
            debug!("slide {from}: backward step kept by the animator");
            Navigation::Prevented
        } else {
            Navigation::Allowed
        }
    }

    fn verify_immediate_start(&mut self, slide: usize) {
        if !self.has_animations(slide) {
            return;
        }
        if let Some(anim) = self.slides[slide].as_mut() {
            if anim.has_immediate_start() {
                anim.restart(&mut self.renderer);
            }
        }
    }

    fn autoplay_next(&mut self) {
        let current = self.current;
        if !self.has_animations(current) {
            self.requests.push(HostRequest::NextSlide);
            return;
        }
        let ongoing = self
            .animator(current)
            .is_some_and(|anim| anim.is_ongoing(&self.renderer));
        if !ongoing {
            self.manage(current, current + 1);
        }
    }

    fn route(&mut self, done: Vec<Completion>) {
        for completion in done {
            let Some(&slide) = self.owners.get(&completion.animator) else {
                trace!("dropping completion of unknown animator {:?}", completion.animator);
                continue;
            };
            if let Some(anim) = self.slides[slide].as_mut() {
                anim.on_effect_complete(&mut self.renderer, completion);
            }
        }
    }

    /// Feed pending completions back and collect events until the deck is
    /// quiet.
    fn pump(&mut self) {
        loop {
            let done = self.renderer.drain_completed();
            if !done.is_empty() {
                self.route(done);
                continue;
            }
            if !self.collect_events() {
                return;
            }
            self.autoplay_next();
        }
    }

    /// Move animator events to the deck queue. True when a forward sequence
    /// stopped while autoplay is on.
    fn collect_events(&mut self) -> bool {
        let mut stopped = false;
        for (slide, anim) in self.slides.iter_mut().enumerate() {
            let Some(anim) = anim else { continue };
            for event in anim.drain_events() {
                stopped |= matches!(&event, AnimatorEvent::SequenceStop(p) if !p.reverse);
                self.events.push(SlideEvent { slide, event });
            }
        }
        stopped && self.autoplay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_animator_core::{parse_animator_json, TimelineRenderer};

    fn slide(json: &str) -> Option<AnimatorDescriptor> {
        Some(parse_animator_json(json).unwrap())
    }

    fn single_slide_deck() -> Deck<TimelineRenderer> {
        let only = slide(
            r##"{ "target": "#s", "actions": [
                { "id": "a", "type": "appear", "target": "#a", "trigger": "onChange", "duration": 50 } ] }"##,
        );
        Deck::new(vec![only], TimelineRenderer::new(), DeckConfig::default())
    }

    fn names(events: &[SlideEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.event.name()).collect()
    }

    #[test]
    fn nothing_happens_before_the_page_is_loaded() {
        let mut deck = single_slide_deck();
        deck.init(true);
        assert_eq!(deck.before_change(0, 1), Navigation::Allowed);
        assert!(deck.drain_events().is_empty());
    }

    #[test]
    fn next_on_the_only_slide_reaches_the_animator() {
        let mut deck = single_slide_deck();
        deck.init(false);
        deck.next_pressed();
        assert_eq!(
            names(&deck.drain_events()),
            [
                "deck.animator.beforeInit",
                "deck.animator.init",
                "deck.animator.sequence.start",
                "deck.animator.action.start"
            ]
        );
        deck.tick(50.0);
        assert!(!deck.has_animations(0));
    }

    #[test]
    fn key_press_after_a_slide_change_is_not_forwarded() {
        let mut deck = single_slide_deck();
        deck.init(false);
        deck.changed(0, 0);
        deck.drain_events();
        deck.next_pressed();
        assert!(deck.drain_events().is_empty());
        // The flag is consumed by the press.
        deck.next_pressed();
        assert!(!deck.drain_events().is_empty());
    }

    #[test]
    fn invalid_slide_gets_no_animator() {
        let deck = Deck::new(
            vec![slide(r##"{ "target": "#s", "actions": [] }"##), None],
            TimelineRenderer::new(),
            DeckConfig::default(),
        );
        assert_eq!(deck.slide_count(), 2);
        assert!(deck.animator(0).is_none());
        assert!(!deck.has_animations(0));
    }

    #[test]
    fn slide_events_serialize_flat() {
        let event = SlideEvent {
            slide: 2,
            event: AnimatorEvent::Completed {
                target: "#s".into(),
                reverse: false,
            },
        };
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["slide"], 2);
        assert_eq!(v["event"], "completed");
        assert_eq!(v["target"], "#s");
    }
}
