use glam::Vec3;
use nexus_common::WorldId;
use std::time::Duration;

use crate::definition::CourseDef;
use crate::error::{ConfigError, Rejection};
use crate::event::{Effect, Notification, Outbox, SessionEvent};
use crate::interactable::{Interactable, Payload, TriggerState};

/// Checkpoint ring and lap timer.
///
/// Only the checkpoint at `index` is ever live; reaching it advances the
/// index modulo the ring length. Wrapping back to checkpoint 0 completes a
/// lap unless a lap completed less than `cooldown` ago.
#[derive(Debug, Clone)]
pub struct LapSequencer {
    checkpoints: Vec<Interactable>,
    index: usize,
    lap_in_progress: bool,
    cooldown: Duration,
    cooldown_until: Option<Duration>,
    lap_start: Duration,
    lap_times: Vec<Duration>,
}

impl LapSequencer {
    pub fn new(world: WorldId, def: &CourseDef, now: Duration) -> Result<Self, ConfigError> {
        if def.checkpoints.is_empty() {
            return Err(ConfigError::EmptyCourse { world });
        }
        let checkpoints = def
            .checkpoints
            .iter()
            .enumerate()
            .map(|(index, &position)| {
                Interactable::new(
                    format!("checkpoint {index}"),
                    position,
                    def.radius,
                    Payload::Checkpoint { index },
                )
            })
            .collect();
        Ok(Self {
            checkpoints,
            index: 0,
            lap_in_progress: false,
            cooldown: Duration::from_millis(def.lap_cooldown_ms),
            cooldown_until: None,
            lap_start: now,
            lap_times: Vec::new(),
        })
    }

    pub fn checkpoints(&self) -> &[Interactable] {
        &self.checkpoints
    }

    /// Index of the checkpoint the vehicle must reach next.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn lap_in_progress(&self) -> bool {
        self.lap_in_progress
    }

    pub fn laps_completed(&self) -> usize {
        self.lap_times.len()
    }

    pub fn lap_times(&self) -> &[Duration] {
        &self.lap_times
    }

    /// Running time of the current lap.
    pub fn current_lap_time(&self, now: Duration) -> Duration {
        now.saturating_sub(self.lap_start)
    }

    pub(crate) fn update(&mut self, vehicle: Vec3, now: Duration, out: &mut Outbox) {
        if let Some(until) = self.cooldown_until {
            if now >= until {
                self.lap_in_progress = false;
                self.cooldown_until = None;
            }
        }

        if self.checkpoints[self.index].contains(vehicle) {
            self.advance(now, out);
        } else if let Some(visited) = self.checkpoints.iter().position(|c| c.contains(vehicle)) {
            let rejection = Rejection::OutOfSequenceCheckpoint {
                expected: self.index,
                visited,
            };
            tracing::trace!(%rejection, "checkpoint ignored");
        }
    }

    fn advance(&mut self, now: Duration, out: &mut Outbox) {
        let reached = self.index;
        let _ = self.checkpoints[reached].fire(TriggerState::Triggered);
        tracing::debug!(checkpoint = reached, "checkpoint reached");
        out.record(SessionEvent::CheckpointReached { index: reached });

        self.index = (self.index + 1) % self.checkpoints.len();
        if self.index != 0 {
            return;
        }
        for c in &mut self.checkpoints {
            c.rearm();
        }
        if !self.lap_in_progress {
            self.complete_lap(now, out);
        }
    }

    fn complete_lap(&mut self, now: Duration, out: &mut Outbox) {
        let time = self.current_lap_time(now);
        self.lap_times.push(time);
        tracing::info!(
            lap = self.lap_times.len(),
            seconds = time.as_secs_f64(),
            "lap completed"
        );
        out.record(SessionEvent::LapCompleted {
            lap: self.lap_times.len(),
            time,
        });
        out.notify(Notification::LapCompleted { time });
        out.effect(Effect::ResetInput);

        self.lap_start = now;
        self.lap_in_progress = true;
        self.cooldown_until = Some(now + self.cooldown);
    }
}
