//! Runtime: the frame-driven game loop.
//!
//! # Invariants
//! - One tick per frame; input is sampled once per tick.
//! - A frame request carries the session token it was scheduled for and is
//!   dropped once that session is gone.
//! - Effects are applied in the order the session emitted them, before the
//!   frame is rendered.

mod clock;
mod context;
mod game_loop;
mod ports;

pub use clock::{GameClock, LoopConfig};
pub use context::GameContext;
pub use game_loop::{FrameRequest, GameLoop, LoopError, LoopOutcome};
pub use ports::{Handoff, LogHandoff, LogNotifier, Notifier};

pub fn crate_info() -> &'static str {
    "nexus-runtime v0.1.0"
}
