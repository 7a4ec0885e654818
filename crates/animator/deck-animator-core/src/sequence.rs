//! Sequence partitioning.
//!
//! A sequence is a maximal run of actions starting at an `OnChange` action
//! (or at the very first action) up to, but excluding, the next `OnChange`.
//! Each sequence also records when its actions start and end relative to the
//! sequence start, and which single action signals the end of the sequence.

use hashbrown::HashSet;
use std::ops::Range;

use crate::action::{Action, Trigger};
use crate::error::ConfigurationError;

/// Offsets of one action relative to the start of its sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    pub start_ms: u64,
    pub end_ms: u64,
}

/// A contiguous, non-empty run of actions played by one `advance`/`retreat`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    first: usize,
    timings: Vec<Timing>,
    last: usize,
}

impl Sequence {
    /// Index of the sequence's first action in the animator's action list.
    #[inline]
    pub fn first(&self) -> usize {
        self.first
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Indices of this sequence's actions in the animator's action list.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.first..self.first + self.timings.len()
    }

    /// Offset (within the sequence) of the action whose completion ends it.
    #[inline]
    pub fn last_offset(&self) -> usize {
        self.last
    }

    #[inline]
    pub fn is_last(&self, offset: usize) -> bool {
        offset == self.last
    }

    pub fn timings(&self) -> &[Timing] {
        &self.timings
    }

    /// Time from the sequence start until its last action ends.
    pub fn duration_ms(&self) -> u64 {
        self.timings[self.last].end_ms
    }
}

/// Group `actions` into sequences.
pub fn partition(actions: &[Action]) -> Result<Vec<Sequence>, ConfigurationError> {
    if actions.is_empty() {
        return Err(ConfigurationError::Empty);
    }
    let mut seen = HashSet::with_capacity(actions.len());
    for action in actions {
        if !seen.insert(action.id.as_str()) {
            return Err(ConfigurationError::DuplicateActionId {
                id: action.id.to_string(),
            });
        }
    }

    let mut sequences = Vec::new();
    let mut first = 0;
    for idx in 1..=actions.len() {
        if idx == actions.len() || actions[idx].trigger == Trigger::OnChange {
            sequences.push(build_sequence(first, &actions[first..idx]));
            first = idx;
        }
    }
    Ok(sequences)
}

fn build_sequence(first: usize, run: &[Action]) -> Sequence {
    let mut timings: Vec<Timing> = Vec::with_capacity(run.len());
    // End of the latest action that is not `WithPrevious`; the running clock.
    let mut anchor_end = 0;
    for (offset, action) in run.iter().enumerate() {
        debug_assert!(offset == 0 || action.trigger != Trigger::OnChange);
        let timing = Timing {
            start_ms: anchor_end,
            end_ms: anchor_end + u64::from(action.duration_or_zero()),
        };
        if action.trigger != Trigger::WithPrevious {
            anchor_end = timing.end_ms;
        }
        timings.push(timing);
    }

    let max_end = timings.iter().map(|t| t.end_ms).max().unwrap_or(0);
    // Ties go to the highest index.
    let last = timings
        .iter()
        .rposition(|t| t.end_ms == max_end)
        .unwrap_or(0);

    Sequence {
        first,
        timings,
        last,
    }
}
