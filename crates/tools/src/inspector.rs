use glam::Vec3;
use nexus_common::WorldId;
use nexus_kernel::{Payload, TriggerState, WorldSession};
use serde::Serialize;
use std::time::Duration;

/// Session inspector for developer tooling.
///
/// Read-only queries against a live session for debugging and the CLI.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &WorldSession, now: Duration) -> SessionSummary {
        let interactables: Vec<_> = session.interactables().collect();
        SessionSummary {
            world: session.world(),
            token: session.token().to_string(),
            ticks: session.ticks(),
            player: session.pose().position.to_array(),
            interactables: interactables.len(),
            armed: interactables.iter().filter(|i| i.is_armed()).count(),
            pending_events: session.events().len(),
            artifact_collected: session.artifact().is_collected(),
            laps_completed: session.course().map(|c| c.laps_completed()),
            lap_time_secs: session
                .course()
                .map(|c| c.current_lap_time(now).as_secs_f64()),
        }
    }

    /// Every interactable, in evaluation order.
    pub fn list_interactables(session: &WorldSession) -> Vec<InteractableInfo> {
        session
            .interactables()
            .map(|i| InteractableInfo {
                name: i.name().to_string(),
                kind: match i.payload() {
                    Payload::Enemy { .. } => "enemy",
                    Payload::Rune => "rune",
                    Payload::Artifact => "artifact",
                    Payload::Checkpoint { .. } => "checkpoint",
                },
                position: i.position().to_array(),
                radius: i.radius(),
                state: i.state(),
            })
            .collect()
    }

    /// Look up one interactable by name.
    pub fn inspect(session: &WorldSession, name: &str) -> Option<InteractableInfo> {
        let found = Self::list_interactables(session)
            .into_iter()
            .find(|i| i.name == name);
        if found.is_none() {
            tracing::debug!(name, world = %session.world(), "no such interactable");
        }
        found
    }

    /// Distance from the player to the nearest portal, with its label.
    pub fn nearest_portal(session: &WorldSession) -> Option<(String, f32)> {
        let player = session.pose().position;
        session
            .portals()
            .map(|p| (p.label.clone(), player.distance(p.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub world: WorldId,
    pub token: String,
    pub ticks: u64,
    pub player: [f32; 3],
    pub interactables: usize,
    pub armed: usize,
    pub pending_events: usize,
    pub artifact_collected: bool,
    pub laps_completed: Option<usize>,
    pub lap_time_secs: Option<f64>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session: world={} token={} ticks={} interactables={} armed={} pending_events={}",
            self.world,
            self.token,
            self.ticks,
            self.interactables,
            self.armed,
            self.pending_events
        )?;
        if let Some(laps) = self.laps_completed {
            write!(f, " laps={laps}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single interactable.
#[derive(Debug, Clone, Serialize)]
pub struct InteractableInfo {
    pub name: String,
    pub kind: &'static str,
    pub position: [f32; 3],
    pub radius: f32,
    pub state: TriggerState,
}

impl std::fmt::Display for InteractableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = Vec3::from_array(self.position);
        write!(
            f,
            "{} {} [{:?}] pos=({:.2}, {:.2}, {:.2}) r={:.1}",
            self.kind, self.name, self.state, p.x, p.y, p.z, self.radius
        )
    }
}
