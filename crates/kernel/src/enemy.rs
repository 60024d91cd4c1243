use glam::Vec3;

use crate::definition::EnemyDef;
use crate::error::Rejection;
use crate::event::{Notification, Outbox, SessionEvent};
use crate::interactable::{Interactable, Payload, TriggerState};

/// Pure pursuit: every live enemy steps straight at the player each tick and
/// is defeated once the player is within its radius.
///
/// Alive is `Armed`, Defeated is `Triggered`. A defeated enemy never moves
/// again.
#[derive(Debug, Clone, Default)]
pub struct EnemyPursuit {
    enemies: Vec<Interactable>,
}

impl EnemyPursuit {
    pub fn new(defs: &[EnemyDef]) -> Self {
        let enemies = defs
            .iter()
            .map(|d| {
                Interactable::new(
                    d.name.clone(),
                    d.position,
                    d.defeat_radius,
                    Payload::Enemy {
                        alive: true,
                        pursuit_speed: d.pursuit_speed,
                    },
                )
            })
            .collect();
        Self { enemies }
    }

    pub fn enemies(&self) -> &[Interactable] {
        &self.enemies
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_armed()).count()
    }

    /// Move live enemies toward `player`, then resolve contact. Returns how
    /// many enemies were defeated this tick.
    pub(crate) fn update(&mut self, player: Vec3, out: &mut Outbox) -> usize {
        let mut defeated = 0;
        for index in 0..self.enemies.len() {
            let enemy = &mut self.enemies[index];
            let Payload::Enemy { pursuit_speed, .. } = enemy.payload() else {
                continue;
            };
            if !enemy.is_armed() {
                continue;
            }
            let direction = (player - enemy.position()).normalize_or_zero();
            enemy.set_position(enemy.position() + direction * pursuit_speed);

            if enemy.contains(player) && self.defeat(index, out).is_ok() {
                defeated += 1;
            }
        }
        defeated
    }

    /// Alive → Defeated for the enemy at `index`. Defeating an already
    /// defeated enemy changes nothing and reports a duplicate.
    pub(crate) fn defeat(&mut self, index: usize, out: &mut Outbox) -> Result<(), Rejection> {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return Ok(());
        };
        enemy.fire(TriggerState::Triggered)?;
        tracing::info!(enemy = enemy.name(), "enemy defeated");
        out.record(SessionEvent::EnemyDefeated {
            name: enemy.name().to_string(),
            position: enemy.position(),
        });
        out.notify(Notification::EnemyDefeated);
        Ok(())
    }
}
