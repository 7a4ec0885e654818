//! deck-animator-host
//!
//! Navigation policy of a slide deck whose slides carry animators: forward
//! and backward steps are consumed by a slide's animator while it has work
//! left, slides with an immediate start play on arrival, decks opened on a
//! later slide show earlier slides in their final state, and autoplay walks
//! through sequences and slides on its own.
//!
//! The crate does not own a window, a keyboard or a clock. Hosts report what
//! happened ([`Deck::before_change`], [`Deck::changed`], key presses,
//! [`Deck::tick`]) and drain [`SlideEvent`]s and [`HostRequest`]s.

pub mod autoplay;
pub mod config;
pub mod deck;
pub mod render;

pub use crate::autoplay::IdleTimer;
pub use crate::config::DeckConfig;
pub use crate::deck::{Deck, HostRequest, Navigation, SlideEvent};
pub use crate::render::FrameRenderer;
