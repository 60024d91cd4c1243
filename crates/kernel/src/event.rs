use glam::Vec3;
use nexus_common::WorldId;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// A record of one state change inside a world session.
///
/// The session log is append-only and drained by the host for tooling and
/// tests; it never feeds back into world logic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    EnemyDefeated { name: String, position: Vec3 },
    ArtifactSpawned { position: Vec3 },
    ArtifactCollected { position: Vec3 },
    RuneTriggered { name: String, triggered: usize, total: usize },
    CheckpointReached { index: usize },
    LapCompleted { lap: usize, time: Duration },
    PortalEntered { label: String },
}

/// A message for the player, delivered synchronously within the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    EnemyDefeated,
    ArtifactCollected,
    LapCompleted { time: Duration },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::EnemyDefeated => f.write_str("Enemy Defeated! Artifact Spawned!"),
            Notification::ArtifactCollected => {
                f.write_str("Artifact Collected! Return to Nexus.")
            }
            Notification::LapCompleted { time } => {
                write!(f, "Lap Completed! Time: {:.2}s", time.as_secs_f64())
            }
        }
    }
}

/// Work a session tick asks the host to carry out, in order, before the
/// frame is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Notification),
    /// Release all held input. Always follows the notification it belongs to.
    ResetInput,
    /// A portal of world `from` asks to switch to `to`. Emitted on every tick
    /// the player stands inside the portal.
    EnterWorld { from: WorldId, to: WorldId },
    /// Leave the game for an external destination. One-way.
    Handoff(Url),
}

/// Collects effects and events while behaviors run within one tick.
#[derive(Debug, Default)]
pub(crate) struct Outbox {
    pub effects: Vec<Effect>,
    pub events: Vec<SessionEvent>,
}

impl Outbox {
    pub fn notify(&mut self, notification: Notification) {
        self.effects.push(Effect::Notify(notification));
    }

    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn record(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}
