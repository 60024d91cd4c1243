//! Shared types for the nexus worlds.
//!
//! # Invariants
//! - Types here carry no behavior beyond construction and formatting.

mod types;

pub use types::{MoveIntent, ParseWorldIdError, Pose, SessionToken, WorldId};
