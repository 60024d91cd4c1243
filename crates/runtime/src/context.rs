use nexus_input::{InputSnapshot, KeyBindings};
use nexus_kernel::{TransitionError, WorldCatalog, WorldStateMachine};

use crate::clock::GameClock;

/// Everything a frame needs, owned by the game loop and passed explicitly.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub machine: WorldStateMachine,
    pub input: InputSnapshot,
    pub clock: GameClock,
}

impl GameContext {
    /// Start in nexus at time zero.
    pub fn new(catalog: WorldCatalog, bindings: KeyBindings) -> Result<Self, TransitionError> {
        let clock = GameClock::new();
        Ok(Self {
            machine: WorldStateMachine::new(catalog, clock.now())?,
            input: InputSnapshot::new(bindings),
            clock,
        })
    }
}
