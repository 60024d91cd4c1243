//! Input: held-key snapshot mapped to movement intent.
//!
//! # Invariants
//! - World logic consumes [`nexus_common::MoveIntent`], never raw key names.
//! - Input is sampled once per tick.

mod keys;
mod script;
mod snapshot;

pub use keys::{Key, KeyBindings};
pub use script::{InputScript, ScriptError, ScriptPlayer, ScriptStep};
pub use snapshot::InputSnapshot;

pub fn crate_info() -> &'static str {
    "nexus-input v0.1.0"
}
