//! JSON descriptors for animators and decks, and their conversion into actions.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::action::{Action, Trigger};
use crate::effect::Effect;
use crate::error::ConfigurationError;
use crate::ids::ActionId;

/// Public API: parse a slide's animator JSON (the deck's `data-dahu-animator`
/// payload) into an [`AnimatorDescriptor`].
///
/// Notes:
/// - `duration` is in milliseconds and may be omitted.
/// - `trX` / `trY` accept numbers or numeric strings; only the integer part
///   is kept, like the deck's own parsing.
/// - Actions whose `type` is unknown are dropped when the descriptor is
///   turned into actions (see [`AnimatorDescriptor::into_parts`]).
pub fn parse_animator_json(s: &str) -> Result<AnimatorDescriptor, ConfigurationError> {
    Ok(serde_json::from_str(s)?)
}

/// Parse a whole deck: one optional animator per slide.
pub fn parse_deck_json(s: &str) -> Result<DeckDescriptor, ConfigurationError> {
    Ok(serde_json::from_str(s)?)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckDescriptor {
    #[serde(default)]
    pub slides: Vec<Option<AnimatorDescriptor>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorDescriptor {
    /// Scope selector of the animated container.
    pub target: String,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub id: ActionId,
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, rename = "trX")]
    pub tr_x: Option<Translation>,
    #[serde(default, rename = "trY")]
    pub tr_y: Option<Translation>,
}

/// Translation offsets are written either as numbers or as strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    Number(f64),
    Text(String),
}

impl Translation {
    fn to_pixels(&self, id: &ActionId) -> Result<f32, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidTranslation {
            id: id.to_string(),
            value: match self {
                Translation::Number(n) => n.to_string(),
                Translation::Text(s) => s.clone(),
            },
        };
        match self {
            Translation::Number(n) if n.is_finite() => Ok(n.trunc() as f32),
            Translation::Number(_) => Err(invalid()),
            Translation::Text(s) => leading_integer(s).map(|n| n as f32).ok_or_else(invalid),
        }
    }
}

/// Integer prefix of `s` after leading whitespace ("12px" -> 12).
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

impl ActionDescriptor {
    /// Convert into an [`Action`]. `Ok(None)` for effect types this crate
    /// does not know.
    pub fn to_action(&self) -> Result<Option<Action>, ConfigurationError> {
        let effect = match self.kind.as_str() {
            "appear" => Effect::Appear,
            "disappear" => Effect::Disappear,
            "move" => {
                let axis = |t: &Option<Translation>| match t {
                    Some(t) => t.to_pixels(&self.id),
                    None => Ok(0.0),
                };
                Effect::Move {
                    dx: axis(&self.tr_x)?,
                    dy: axis(&self.tr_y)?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(Action {
            id: self.id.clone(),
            target: self.target.clone(),
            trigger: self.trigger,
            duration_ms: self.duration,
            effect,
        }))
    }
}

impl AnimatorDescriptor {
    /// Scope and actions, dropping (with a warning) unknown effect types.
    pub fn into_parts(self) -> Result<(String, Vec<Action>), ConfigurationError> {
        let mut actions = Vec::with_capacity(self.actions.len());
        for desc in &self.actions {
            match desc.to_action()? {
                Some(action) => actions.push(action),
                None => warn!(
                    "animator {}: dropping action '{}' of unknown type '{}'",
                    self.target, desc.id, desc.kind
                ),
            }
        }
        Ok((self.target, actions))
    }
}
