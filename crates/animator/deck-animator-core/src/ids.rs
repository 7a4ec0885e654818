//! Identifiers and simple allocators for core entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one animator. Completions carry it so that several animators
/// can share a single renderer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimatorId(pub u32);

/// Identifies one forward playback of a sequence inside an animator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlaybackId(pub u32);

/// Author-supplied action identifier, only used in event payloads.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Monotonic allocator for AnimatorId and PlaybackId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_animator: u32,
    next_playback: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_animator(&mut self) -> AnimatorId {
        let id = AnimatorId(self.next_animator);
        self.next_animator = self.next_animator.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_playback(&mut self) -> PlaybackId {
        let id = PlaybackId(self.next_playback);
        self.next_playback = self.next_playback.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_animator(), AnimatorId(0));
        assert_eq!(alloc.alloc_animator(), AnimatorId(1));
        assert_eq!(alloc.alloc_playback(), PlaybackId(0));
        assert_eq!(alloc.alloc_playback(), PlaybackId(1));
        assert_eq!(alloc.alloc_animator(), AnimatorId(2));
    }

    #[test]
    fn action_id_is_transparent_in_json() {
        let id: ActionId = serde_json::from_str("\"intro\"").unwrap();
        assert_eq!(id.as_str(), "intro");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"intro\"");
    }
}
