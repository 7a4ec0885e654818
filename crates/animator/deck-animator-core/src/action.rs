//! Action data model: one timed effect and its trigger relationship.

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::ids::ActionId;

/// When an action starts relative to its predecessor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    /// Waits for a navigation signal; opens a new sequence.
    OnChange,
    /// Starts together with the previous action.
    WithPrevious,
    /// Starts once the previous action's effect completed.
    AfterPrevious,
}

/// One timed visual effect bound to an element inside the animator's scope.
///
/// Actions are immutable once handed to an animator; per-sequence timing
/// lives in [`crate::sequence::Sequence`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    /// Element selector, opaque to the core.
    pub target: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub duration_ms: Option<u32>,
    pub effect: Effect,
}

impl Action {
    pub fn new(
        id: impl Into<ActionId>,
        target: impl Into<String>,
        trigger: Trigger,
        duration_ms: Option<u32>,
        effect: Effect,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            trigger,
            duration_ms,
            effect,
        }
    }

    /// Duration used for timing; absent counts as zero.
    #[inline]
    pub fn duration_or_zero(&self) -> u32 {
        self.duration_ms.unwrap_or(0)
    }
}
