use nexus_common::{MoveIntent, Pose, SessionToken, WorldId};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::artifact::ArtifactSlot;
use crate::definition::{PortalDef, PortalTarget, WorldDefinition};
use crate::enemy::EnemyPursuit;
use crate::error::ConfigError;
use crate::event::{Effect, Outbox, SessionEvent};
use crate::interactable::Interactable;
use crate::laps::LapSequencer;
use crate::player::{Locomotion, Player};
use crate::proximity::TriggerTable;
use crate::runes::RunePuzzle;

/// The live state of the active world.
///
/// Built fresh from a [`WorldDefinition`] every time the world is entered and
/// dropped when the player leaves; nothing carries over between visits.
#[derive(Debug, Clone)]
pub struct WorldSession {
    world: WorldId,
    token: SessionToken,
    locomotion: Locomotion,
    player: Player,
    portals: TriggerTable<PortalDef>,
    occupied_portals: BTreeSet<usize>,
    pursuit: EnemyPursuit,
    runes: RunePuzzle,
    course: Option<LapSequencer>,
    artifact: ArtifactSlot,
    ticks: u64,
    event_log: Vec<SessionEvent>,
}

impl WorldSession {
    /// Build a session at the definition's spawn point. `now` starts the lap
    /// timer for worlds with a course.
    pub fn new(def: &WorldDefinition, now: Duration) -> Result<Self, ConfigError> {
        def.validate()?;

        let mut portals = TriggerTable::new();
        for p in &def.portals {
            portals.insert(p.position, p.radius, p.clone());
        }
        let course = def
            .course
            .as_ref()
            .map(|c| LapSequencer::new(def.id, c, now))
            .transpose()?;

        let session = Self {
            world: def.id,
            token: SessionToken::new(),
            locomotion: def.locomotion,
            player: Player::spawn_at(def.spawn),
            portals,
            occupied_portals: BTreeSet::new(),
            pursuit: EnemyPursuit::new(&def.enemies),
            runes: RunePuzzle::new(&def.runes),
            course,
            artifact: ArtifactSlot::new(def.artifact.clone()),
            ticks: 0,
            event_log: Vec::new(),
        };
        tracing::debug!(world = %session.world, token = %session.token, "session built");
        Ok(session)
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn pose(&self) -> Pose {
        self.player.pose()
    }

    /// Number of ticks this session has run.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn portals(&self) -> impl Iterator<Item = &PortalDef> {
        self.portals.values()
    }

    pub fn pursuit(&self) -> &EnemyPursuit {
        &self.pursuit
    }

    pub fn runes(&self) -> &RunePuzzle {
        &self.runes
    }

    pub fn course(&self) -> Option<&LapSequencer> {
        self.course.as_ref()
    }

    pub fn artifact(&self) -> &ArtifactSlot {
        &self.artifact
    }

    /// Every interactable currently in the world: enemies, runes,
    /// checkpoints and the artifact once spawned.
    pub fn interactables(&self) -> impl Iterator<Item = &Interactable> {
        self.pursuit
            .enemies()
            .iter()
            .chain(self.runes.runes())
            .chain(self.course.iter().flat_map(|c| c.checkpoints()))
            .chain(self.artifact.artifact())
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SessionEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Run one tick: move the player, drive this world's behaviors, then
    /// check portals. Every check sees the same post-movement position.
    /// Returns the effects for the host to apply, in order.
    pub fn tick(&mut self, intent: MoveIntent, now: Duration) -> Vec<Effect> {
        self.ticks += 1;
        let mut out = Outbox::default();

        let position = self.player.apply(intent, self.locomotion).position;

        if self.pursuit.update(position, &mut out) > 0 {
            self.spawn_artifact(&mut out);
        }

        self.runes.update(position, &mut out);
        if self.runes.is_solved() && !self.artifact.exists() {
            self.spawn_artifact(&mut out);
        }

        if let Some(course) = self.course.as_mut() {
            course.update(position, now, &mut out);
        }

        self.artifact.update(position, &mut out);

        let mut occupied = BTreeSet::new();
        for (index, portal) in self.portals.hits(position) {
            occupied.insert(index);
            if !self.occupied_portals.contains(&index) {
                tracing::debug!(world = %self.world, portal = %portal.label, "portal entered");
                out.record(SessionEvent::PortalEntered {
                    label: portal.label.clone(),
                });
            }
            match &portal.target {
                PortalTarget::World { world } => out.effect(Effect::EnterWorld {
                    from: self.world,
                    to: *world,
                }),
                PortalTarget::Handoff(handoff) => match handoff.url() {
                    Ok(url) => out.effect(Effect::Handoff(url)),
                    Err(e) => tracing::warn!("hand-off portal has a bad url: {e}"),
                },
            }
        }
        self.occupied_portals = occupied;

        self.event_log.append(&mut out.events);
        out.effects
    }

    fn spawn_artifact(&mut self, out: &mut Outbox) {
        if let Err(rejection) = self.artifact.spawn(out) {
            tracing::trace!(%rejection, "artifact already present");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Notification;
    use crate::interactable::TriggerState;
    use glam::Vec3;

    fn idle() -> MoveIntent {
        MoveIntent::default()
    }

    fn session(def: &WorldDefinition) -> WorldSession {
        WorldSession::new(def, Duration::ZERO).unwrap()
    }

    #[test]
    fn spawns_at_definition_spawn() {
        for id in WorldId::ALL {
            let def = WorldDefinition::builtin(id);
            let s = session(&def);
            assert_eq!(s.world(), id);
            assert_eq!(s.player().position(), def.spawn);
            assert_eq!(s.ticks(), 0);
        }
    }

    #[test]
    fn malformed_definition_fails_at_construction() {
        let mut def = WorldDefinition::racing();
        if let Some(c) = def.course.as_mut() {
            c.checkpoints.clear();
        }
        assert!(matches!(
            WorldSession::new(&def, Duration::ZERO),
            Err(ConfigError::EmptyCourse { .. })
        ));
    }

    #[test]
    fn player_on_enemy_defeats_it_once() {
        let mut def = WorldDefinition::combat();
        def.spawn = def.enemies[0].position;
        let mut s = session(&def);

        let effects = s.tick(idle(), Duration::ZERO);
        assert_eq!(effects, vec![Effect::Notify(Notification::EnemyDefeated)]);
        assert_eq!(s.pursuit().alive_count(), 0);

        let artifact = s.artifact().artifact().unwrap();
        assert_eq!(artifact.position(), Vec3::new(-5.0, 0.5, -5.0));
        assert_eq!(artifact.state(), TriggerState::Armed);

        // re-running the tick changes nothing
        for _ in 0..3 {
            assert!(s.tick(idle(), Duration::ZERO).is_empty());
        }
        let spawns = s
            .events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::ArtifactSpawned { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn combat_artifact_is_collected_once_without_input_reset() {
        let mut def = WorldDefinition::combat();
        def.spawn = def.enemies[0].position;
        let mut s = session(&def);
        s.tick(idle(), Duration::ZERO);

        s.player_mut().teleport(Vec3::new(-5.0, 1.0, -5.0));
        let effects = s.tick(idle(), Duration::ZERO);
        assert_eq!(effects, vec![Effect::Notify(Notification::ArtifactCollected)]);
        assert!(s.artifact().is_collected());
        assert!(s.tick(idle(), Duration::ZERO).is_empty());
    }

    #[test]
    fn rune_puzzle_spawns_artifact_after_all_runes() {
        let mut s = session(&WorldDefinition::magic());

        s.player_mut().teleport(Vec3::new(-3.0, 1.0, 0.0));
        s.tick(idle(), Duration::ZERO);
        s.tick(idle(), Duration::ZERO);
        assert_eq!(s.runes().triggered_count(), 1);
        assert!(!s.artifact().exists());

        s.player_mut().teleport(Vec3::new(3.0, 1.0, 0.0));
        s.tick(idle(), Duration::ZERO);
        assert!(s.runes().is_solved());
        assert!(s.artifact().exists());

        s.player_mut().teleport(Vec3::new(-3.0, 1.0, 0.0));
        s.tick(idle(), Duration::ZERO);
        let spawns = s
            .events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::ArtifactSpawned { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn magic_artifact_collection_resets_input() {
        let mut s = session(&WorldDefinition::magic());
        for x in [-3.0, 3.0] {
            s.player_mut().teleport(Vec3::new(x, 1.0, 0.0));
            s.tick(idle(), Duration::ZERO);
        }
        s.player_mut().teleport(Vec3::new(0.0, 1.5, 0.0));
        let effects = s.tick(idle(), Duration::ZERO);
        assert_eq!(
            effects,
            vec![
                Effect::Notify(Notification::ArtifactCollected),
                Effect::ResetInput
            ]
        );
    }

    #[test]
    fn return_portal_requests_nexus_every_tick_inside() {
        let mut s = session(&WorldDefinition::combat());
        s.player_mut().teleport(Vec3::new(0.0, 1.0, -10.0));
        let expected = Effect::EnterWorld {
            from: WorldId::Combat,
            to: WorldId::Nexus,
        };
        assert_eq!(s.tick(idle(), Duration::ZERO), vec![expected.clone()]);
        assert_eq!(s.tick(idle(), Duration::ZERO), vec![expected]);

        // the log records the entry edge only
        let entries = s
            .events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::PortalEntered { .. }))
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn hub_portals_lead_to_their_worlds() {
        let def = WorldDefinition::nexus();
        for (target, at) in [
            (WorldId::Racing, Vec3::new(-3.0, 1.0, -3.0)),
            (WorldId::Magic, Vec3::new(0.0, 1.0, -4.0)),
            (WorldId::Combat, Vec3::new(3.0, 1.0, -3.0)),
        ] {
            let mut s = session(&def);
            s.player_mut().teleport(at);
            assert_eq!(
                s.tick(idle(), Duration::ZERO),
                vec![Effect::EnterWorld {
                    from: WorldId::Nexus,
                    to: target
                }]
            );
        }
    }

    #[test]
    fn handoff_portal_emits_destination() {
        let mut s = session(&WorldDefinition::nexus());
        s.player_mut().teleport(Vec3::new(0.0, 1.0, 4.0));
        let effects = s.tick(idle(), Duration::ZERO);
        assert_eq!(effects.len(), 1);
        let Effect::Handoff(url) = &effects[0] else {
            panic!("expected a hand-off, got {effects:?}");
        };
        assert_eq!(url.host_str(), Some("portal.pieter.com"));
        assert!(url.query().unwrap_or_default().contains("ref=nexus-worlds"));
    }

    #[test]
    fn triggers_see_the_post_movement_position() {
        // one step short of the return portal's radius; the step taken this
        // tick must count
        let mut s = session(&WorldDefinition::combat());
        s.player_mut().teleport(Vec3::new(0.0, 1.0, -8.46));
        let forward = MoveIntent {
            forward: true,
            ..MoveIntent::default()
        };
        let effects = s.tick(forward, Duration::ZERO);
        assert!(matches!(effects.as_slice(), [Effect::EnterWorld { .. }]));
    }

    #[test]
    fn racing_lap_through_session() {
        let mut s = session(&WorldDefinition::racing());
        let checkpoints: Vec<Vec3> = s
            .course()
            .map(|c| c.checkpoints().iter().map(|i| i.position()).collect())
            .unwrap_or_default();
        let mut laps = 0;
        for (i, cp) in checkpoints.iter().enumerate() {
            s.player_mut().teleport(*cp);
            let now = Duration::from_secs(10 * (i as u64 + 1));
            for effect in s.tick(idle(), now) {
                if matches!(effect, Effect::Notify(Notification::LapCompleted { .. })) {
                    laps += 1;
                }
            }
        }
        assert_eq!(laps, 1);
        assert_eq!(s.course().map(|c| c.laps_completed()), Some(1));
    }

    #[test]
    fn interactables_cover_every_behavior() {
        assert_eq!(session(&WorldDefinition::nexus()).interactables().count(), 0);
        assert_eq!(session(&WorldDefinition::combat()).interactables().count(), 1);
        assert_eq!(session(&WorldDefinition::magic()).interactables().count(), 2);
        assert_eq!(session(&WorldDefinition::racing()).interactables().count(), 4);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut s = session(&WorldDefinition::magic());
        s.player_mut().teleport(Vec3::new(-3.0, 1.0, 0.0));
        s.tick(idle(), Duration::ZERO);
        assert_eq!(s.drain_events().len(), 1);
        assert!(s.events().is_empty());
    }

    #[test]
    fn fresh_sessions_get_fresh_tokens() {
        let def = WorldDefinition::nexus();
        assert_ne!(session(&def).token(), session(&def).token());
    }
}
