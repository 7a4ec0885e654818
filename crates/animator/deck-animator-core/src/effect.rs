//! Visual effects and the element style they act on.

use serde::{Deserialize, Serialize};

/// The animatable subset of an element's style.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub opacity: f32,
    pub left: f32,
    pub top: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            left: 0.0,
            top: 0.0,
        }
    }
}

impl Style {
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::default()
        }
    }

    /// Component-wise interpolation, `t` in [0, 1].
    pub fn lerp(&self, to: &Style, t: f32) -> Style {
        Style {
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            left: self.left + (to.left - self.left) * t,
            top: self.top + (to.top - self.top) * t,
        }
    }
}

/// A reversible visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Appear,
    Disappear,
    /// Translation relative to the element's position when the effect starts.
    Move { dx: f32, dy: f32 },
}

impl Effect {
    /// Style the element should reach when this effect runs from `current`.
    pub fn resolve(&self, current: Style, reverse: bool) -> Style {
        match (self, reverse) {
            (Effect::Appear, false) | (Effect::Disappear, true) => Style {
                opacity: 1.0,
                ..current
            },
            (Effect::Appear, true) | (Effect::Disappear, false) => Style {
                opacity: 0.0,
                ..current
            },
            (Effect::Move { dx, dy }, false) => Style {
                left: current.left + dx,
                top: current.top + dy,
                ..current
            },
            (Effect::Move { dx, dy }, true) => Style {
                left: current.left - dx,
                top: current.top - dy,
                ..current
            },
        }
    }
}
