//! Nexus kernel: the world state machine, proximity triggers and the
//! per-world behaviors that run inside a session.
//!
//! # Invariants
//! - Exactly one world is active; sub-worlds connect only through nexus.
//! - A session tick is pure: it reads an intent and the game time and
//!   returns effects for the host to apply.
//! - Every trigger fires at most once per arming.

mod artifact;
mod catalog;
mod definition;
mod enemy;
mod error;
mod event;
mod interactable;
mod laps;
mod machine;
mod player;
mod proximity;
mod runes;
mod session;

pub use artifact::ArtifactSlot;
pub use catalog::WorldCatalog;
pub use definition::{
    ArtifactDef, CourseDef, EnemyDef, HandoffConfig, PortalDef, PortalTarget, RuneDef,
    WorldDefinition,
};
pub use enemy::EnemyPursuit;
pub use error::{ConfigError, Rejection, TransitionError};
pub use event::{Effect, Notification, SessionEvent};
pub use interactable::{Interactable, Payload, TriggerState};
pub use laps::LapSequencer;
pub use machine::{Transition, WorldStateMachine};
pub use player::{
    Locomotion, Player, VEHICLE_ACCEL, VEHICLE_COAST_DECAY, VEHICLE_MAX_SPEED, VEHICLE_MIN_SPEED,
    VEHICLE_STOP_EPSILON, VEHICLE_TURN_RATE, WALK_STEP,
};
pub use proximity::{TriggerTable, inside};
pub use runes::RunePuzzle;
pub use session::WorldSession;

pub fn crate_info() -> &'static str {
    concat!("nexus-kernel v", env!("CARGO_PKG_VERSION"))
}
