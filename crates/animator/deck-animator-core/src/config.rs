//! Core configuration for deck-animator-core.

use serde::{Deserialize, Serialize};

/// Configuration for animator playback behaviour.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animate sequences played in reverse instead of jumping to their
    /// restored state.
    pub animate_reverse: bool,

    /// What happens to a chained playback once `finish_ongoing` snapped it.
    pub finish_policy: FinishPolicy,

    /// Initial capacity of the per-animator event queue.
    pub event_capacity: usize,
}

/// Behaviour of an interrupted forward playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishPolicy {
    /// Remaining chained actions are dispatched skipped, so the whole
    /// sequence lands on its terminal state and still reports its stops.
    #[default]
    FastForward,
    /// Only effects already in flight snap; chained actions animate normally.
    SnapCurrent,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animate_reverse: false,
            finish_policy: FinishPolicy::FastForward,
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "finish_policy": "snap_current" }"#).unwrap();
        assert_eq!(cfg.finish_policy, FinishPolicy::SnapCurrent);
        assert!(!cfg.animate_reverse);
        assert_eq!(cfg.event_capacity, Config::default().event_capacity);
    }
}
