//! Animator: the per-slide playback state machine.
//!
//! Methods:
//! - restart, start_from_the_end, advance, retreat, finish_ongoing
//! - on_effect_complete / settle (completion chaining)
//! - has_started, is_completed, has_immediate_start, is_ongoing

use hashbrown::HashMap;
use log::{debug, trace};

use crate::action::{Action, Trigger};
use crate::config::{Config, FinishPolicy};
use crate::descriptor::AnimatorDescriptor;
use crate::error::ConfigurationError;
use crate::events::{AnimatorEvent, EventPayload, EventQueue};
use crate::ids::{AnimatorId, IdAllocator, PlaybackId};
use crate::renderer::{Completion, CompletionSource, EffectRequest, TransitionRenderer};
use crate::sequence::{partition, Sequence};

/// Coarse position of the action cursor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    NotStarted,
    InSequence,
    Completed,
}

/// Bookkeeping of one forward sequence playback.
#[derive(Clone, Debug)]
struct Playback {
    sequence: usize,
    /// Set by `finish_ongoing`; chained actions are then skipped.
    finishing: bool,
    /// This playback reached the end of the action list.
    completes: bool,
    /// Dispatched effects whose completion has not come back yet.
    outstanding: usize,
    /// Offsets already dispatched; an action plays at most once per playback.
    dispatched: Vec<bool>,
}

#[derive(Debug)]
pub struct Animator {
    id: AnimatorId,
    target: String,
    cfg: Config,
    actions: Vec<Action>,
    sequences: Vec<Sequence>,
    action_cursor: usize,
    sequence_cursor: usize,
    ids: IdAllocator,
    playbacks: HashMap<PlaybackId, Playback>,
    events: EventQueue,
}

impl Animator {
    /// Build an animator for the scope `target` with default config.
    pub fn new(
        id: AnimatorId,
        target: impl Into<String>,
        actions: Vec<Action>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_config(id, target, actions, Config::default())
    }

    pub fn with_config(
        id: AnimatorId,
        target: impl Into<String>,
        actions: Vec<Action>,
        cfg: Config,
    ) -> Result<Self, ConfigurationError> {
        let sequences = partition(&actions)?;
        Ok(Self {
            id,
            target: target.into(),
            events: EventQueue::with_capacity(cfg.event_capacity),
            cfg,
            actions,
            sequences,
            action_cursor: 0,
            sequence_cursor: 0,
            ids: IdAllocator::new(),
            playbacks: HashMap::new(),
        })
    }

    pub fn from_descriptor(
        id: AnimatorId,
        descriptor: AnimatorDescriptor,
        cfg: Config,
    ) -> Result<Self, ConfigurationError> {
        let (target, actions) = descriptor.into_parts()?;
        Self::with_config(id, target, actions, cfg)
    }

    pub fn id(&self) -> AnimatorId {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn action_cursor(&self) -> usize {
        self.action_cursor
    }

    pub fn sequence_cursor(&self) -> usize {
        self.sequence_cursor
    }

    pub fn state(&self) -> AnimatorState {
        if self.action_cursor == 0 {
            AnimatorState::NotStarted
        } else if self.action_cursor == self.actions.len() {
            AnimatorState::Completed
        } else {
            AnimatorState::InSequence
        }
    }

    /// Events emitted since the last drain, oldest first.
    pub fn events(&self) -> &[AnimatorEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> Vec<AnimatorEvent> {
        self.events.drain()
    }

    pub fn has_started(&self) -> bool {
        self.action_cursor > 0
    }

    pub fn is_completed(&self, renderer: &dyn TransitionRenderer) -> bool {
        self.action_cursor == self.actions.len() && !self.is_ongoing(renderer)
    }

    /// Playback should begin without waiting for a navigation signal.
    pub fn has_immediate_start(&self) -> bool {
        self.actions[0].trigger != Trigger::OnChange
    }

    pub fn is_ongoing(&self, renderer: &dyn TransitionRenderer) -> bool {
        self.actions
            .iter()
            .any(|a| renderer.is_animating(&self.target, &a.target))
    }

    /// Rewind to the initial state and play the first sequence.
    pub fn restart(&mut self, renderer: &mut dyn TransitionRenderer) {
        self.initialize();
        self.advance(renderer, false);
    }

    /// Jump to the final state of every action without visible transitions.
    pub fn start_from_the_end(&mut self, renderer: &mut dyn TransitionRenderer) {
        self.initialize();
        for index in 0..self.actions.len() {
            self.dispatch(renderer, index, false, true, None);
        }
        self.action_cursor = self.actions.len();
        self.sequence_cursor = self.sequences.len();
        self.events.push(AnimatorEvent::Completed {
            target: self.target.clone(),
            reverse: true,
        });
    }

    /// Play the next sequence, or cut the running one short when
    /// `check_ongoing` is set and effects are still in flight.
    pub fn advance(&mut self, renderer: &mut dyn TransitionRenderer, check_ongoing: bool) {
        if check_ongoing && self.is_ongoing(renderer) {
            self.finish_ongoing(renderer);
            return;
        }
        if self.action_cursor >= self.actions.len() {
            self.push_completed(false);
            return;
        }

        let seq_idx = self.sequence_cursor;
        self.sequence_cursor += 1;
        let len = self.sequences[seq_idx].len();
        debug!(
            "animator {:?} ({}): sequence {} forward",
            self.id, self.target, seq_idx
        );
        self.events.push(AnimatorEvent::SequenceStart(EventPayload {
            target: self.target.clone(),
            id: self.actions[self.action_cursor].id.clone(),
            reverse: false,
        }));
        self.action_cursor += len;
        let completes = self.action_cursor == self.actions.len();
        self.play_forward(renderer, seq_idx, completes);
    }

    /// Undo the most recent sequence.
    pub fn retreat(&mut self, renderer: &mut dyn TransitionRenderer, check_ongoing: bool) {
        if self.action_cursor == 0 {
            self.push_completed(true);
            return;
        }
        if check_ongoing && self.is_ongoing(renderer) {
            self.finish_ongoing(renderer);
            return;
        }

        self.sequence_cursor -= 1;
        let seq_idx = self.sequence_cursor;
        debug!(
            "animator {:?} ({}): sequence {} reverse",
            self.id, self.target, seq_idx
        );
        self.events.push(AnimatorEvent::SequenceStart(EventPayload {
            target: self.target.clone(),
            id: self.actions[self.action_cursor - 1].id.clone(),
            reverse: true,
        }));
        self.action_cursor -= self.sequences[seq_idx].len();
        // A forward chain of the undone sequence must not keep dispatching.
        self.playbacks.retain(|_, pb| pb.sequence != seq_idx);
        self.play_reverse(renderer, seq_idx);
        if self.action_cursor == 0 {
            self.push_completed(true);
        }
    }

    /// Snap every action's element to its terminal state. Cursors stay put.
    pub fn finish_ongoing(&mut self, renderer: &mut dyn TransitionRenderer) {
        for pb in self.playbacks.values_mut() {
            pb.finishing = true;
        }
        for action in &self.actions {
            renderer.snap_to_end(&self.target, &action.target);
        }
    }

    /// Resume the chain after an effect finished. Returns false when the
    /// completion belongs to another animator or to a retired playback.
    pub fn on_effect_complete(
        &mut self,
        renderer: &mut dyn TransitionRenderer,
        completion: Completion,
    ) -> bool {
        if completion.animator != self.id {
            return false;
        }
        let Some(entry) = self.playbacks.get_mut(&completion.playback) else {
            trace!(
                "animator {:?}: ignoring completion of retired playback {:?}",
                self.id,
                completion.playback
            );
            return false;
        };
        entry.outstanding = entry.outstanding.saturating_sub(1);
        let (sequence, finishing, completes) = (entry.sequence, entry.finishing, entry.completes);
        let (first, len, last) = {
            let seq = &self.sequences[sequence];
            (seq.first(), seq.len(), seq.last_offset())
        };
        let offset = completion.offset;
        if offset >= len {
            return false;
        }

        let finished = &self.actions[first + offset];
        self.events.push(AnimatorEvent::ActionStop(EventPayload {
            target: finished.target.clone(),
            id: finished.id.clone(),
            reverse: false,
        }));

        let next = offset + 1;
        if next < len && self.actions[first + next].trigger == Trigger::AfterPrevious {
            let skip = finishing && self.cfg.finish_policy == FinishPolicy::FastForward;
            self.dispatch_chained(renderer, completion.playback, first, next, skip);
            // Every later WithPrevious action joins the step, not only the
            // adjacent ones.
            for follower in next + 1..len {
                if self.actions[first + follower].trigger == Trigger::WithPrevious {
                    self.dispatch_chained(renderer, completion.playback, first, follower, skip);
                }
            }
        }

        if offset == last {
            debug!(
                "animator {:?} ({}): sequence {} stopped",
                self.id, self.target, sequence
            );
            self.events.push(AnimatorEvent::SequenceStop(EventPayload {
                target: self.target.clone(),
                id: self.actions[first + offset].id.clone(),
                reverse: false,
            }));
            if completes {
                self.push_completed(false);
            }
        }
        // Stragglers (ties, skipped chains) may still report after the stop.
        if self
            .playbacks
            .get(&completion.playback)
            .is_some_and(|p| p.outstanding == 0)
        {
            self.playbacks.remove(&completion.playback);
        }
        true
    }

    /// Feed the renderer's finished effects back until nothing is pending.
    /// Returns the number of completions consumed by this animator.
    pub fn settle<R>(&mut self, renderer: &mut R) -> usize
    where
        R: TransitionRenderer + CompletionSource,
    {
        let mut consumed = 0;
        loop {
            let done = renderer.drain_completed();
            if done.is_empty() {
                return consumed;
            }
            for completion in done {
                if self.on_effect_complete(renderer, completion) {
                    consumed += 1;
                }
            }
        }
    }

    fn initialize(&mut self) {
        self.events.push(AnimatorEvent::BeforeInitialize {
            target: self.target.clone(),
        });
        self.action_cursor = 0;
        self.sequence_cursor = 0;
        self.playbacks.clear();
        debug!(
            "animator {:?} ({}): {} actions in {} sequences",
            self.id,
            self.target,
            self.actions.len(),
            self.sequences.len()
        );
        self.events.push(AnimatorEvent::Initialize {
            target: self.target.clone(),
        });
    }

    fn play_forward(
        &mut self,
        renderer: &mut dyn TransitionRenderer,
        seq_idx: usize,
        completes: bool,
    ) {
        let (first, len) = {
            let seq = &self.sequences[seq_idx];
            (seq.first(), seq.len())
        };
        if len == 0 {
            return;
        }
        // The context exists before anything is dispatched.
        let playback = self.ids.alloc_playback();
        self.playbacks.insert(
            playback,
            Playback {
                sequence: seq_idx,
                finishing: false,
                completes,
                outstanding: 0,
                dispatched: vec![false; len],
            },
        );
        for offset in 0..len {
            if offset > 0 && self.actions[first + offset].trigger == Trigger::AfterPrevious {
                break;
            }
            self.dispatch_chained(renderer, playback, first, offset, false);
        }
    }

    fn play_reverse(&mut self, renderer: &mut dyn TransitionRenderer, seq_idx: usize) {
        let range = self.sequences[seq_idx].range();
        let skip = !self.cfg.animate_reverse;
        for index in range.rev() {
            self.dispatch(renderer, index, true, skip, None);
        }
    }

    fn dispatch_chained(
        &mut self,
        renderer: &mut dyn TransitionRenderer,
        playback: PlaybackId,
        first: usize,
        offset: usize,
        skip: bool,
    ) {
        match self.playbacks.get_mut(&playback) {
            Some(pb) if pb.dispatched[offset] => {
                trace!(
                    "animator {:?}: action {} already playing in {:?}",
                    self.id,
                    self.actions[first + offset].id,
                    playback
                );
                return;
            }
            Some(pb) => {
                pb.dispatched[offset] = true;
                pb.outstanding += 1;
            }
            None => {}
        }
        let completion = Completion {
            animator: self.id,
            playback,
            offset,
        };
        self.dispatch(renderer, first + offset, false, skip, Some(completion));
    }

    fn dispatch(
        &mut self,
        renderer: &mut dyn TransitionRenderer,
        index: usize,
        reverse: bool,
        skip: bool,
        completion: Option<Completion>,
    ) {
        let action = &self.actions[index];
        trace!(
            "animator {:?}: dispatch {} (reverse={reverse}, skip={skip})",
            self.id,
            action.id
        );
        self.events.push(AnimatorEvent::ActionStart(EventPayload {
            target: action.target.clone(),
            id: action.id.clone(),
            reverse,
        }));
        renderer.play(EffectRequest {
            scope: &self.target,
            action,
            reverse,
            skip,
            completion,
        });
    }

    fn push_completed(&mut self, reverse: bool) {
        self.events.push(AnimatorEvent::Completed {
            target: self.target.clone(),
            reverse,
        });
    }
}
