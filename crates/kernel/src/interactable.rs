use glam::Vec3;
use serde::Serialize;

use crate::error::Rejection;
use crate::proximity::inside;

/// Lifecycle of a proximity-triggered object.
///
/// Transitions only ever leave `Armed`; `Triggered` and `Consumed` are final
/// for the object's session (checkpoints are re-armed when a lap wraps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerState {
    Armed,
    Triggered,
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Payload {
    Enemy { alive: bool, pursuit_speed: f32 },
    Rune,
    Artifact,
    Checkpoint { index: usize },
}

/// An enemy, rune, artifact or checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interactable {
    name: String,
    position: Vec3,
    radius: f32,
    state: TriggerState,
    payload: Payload,
}

impl Interactable {
    pub fn new(name: impl Into<String>, position: Vec3, radius: f32, payload: Payload) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            state: TriggerState::Armed,
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    pub fn is_armed(&self) -> bool {
        self.state == TriggerState::Armed
    }

    /// Whether `point` is inside this object's activation sphere.
    pub fn contains(&self, point: Vec3) -> bool {
        inside(point, self.position, self.radius)
    }

    /// Armed → `to`. Any other starting state is a duplicate activation and
    /// leaves the object untouched.
    pub fn fire(&mut self, to: TriggerState) -> Result<(), Rejection> {
        if self.state != TriggerState::Armed || to == TriggerState::Armed {
            return Err(Rejection::DuplicateActivation {
                name: self.name.clone(),
            });
        }
        self.state = to;
        if let Payload::Enemy { alive, .. } = &mut self.payload {
            *alive = false;
        }
        Ok(())
    }

    pub(crate) fn rearm(&mut self) {
        self.state = TriggerState::Armed;
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
