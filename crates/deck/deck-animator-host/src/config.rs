use serde::{Deserialize, Serialize};

use deck_animator_core::Config;

/// Host-level settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// With autoplay on, how long a slide without pending animations stays
    /// up before the next slide is requested.
    pub autoplay_idle_ms: u32,
    /// Passed to every slide's animator.
    pub animator: Config,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            autoplay_idle_ms: 2000,
            animator: Config::default(),
        }
    }
}
