use nexus_common::{SessionToken, WorldId};
use std::time::Duration;

use crate::catalog::WorldCatalog;
use crate::error::TransitionError;
use crate::session::WorldSession;

/// Record of a completed world switch. The host uses `retired` to tear down
/// the old world's scene and `token` to schedule ticks for the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: WorldId,
    pub to: WorldId,
    /// Token of the session that was dropped.
    pub retired: SessionToken,
    /// Token of the session that replaced it.
    pub token: SessionToken,
}

/// Which world is active, and its live session.
///
/// Exactly one world is active at any time. Worlds connect only through
/// nexus: every path between two sub-worlds passes through the hub. Every
/// entry builds a fresh session, so re-entering a world starts it over.
#[derive(Debug, Clone)]
pub struct WorldStateMachine {
    catalog: WorldCatalog,
    session: WorldSession,
}

impl WorldStateMachine {
    /// Start in nexus.
    pub fn new(catalog: WorldCatalog, now: Duration) -> Result<Self, TransitionError> {
        let session = WorldSession::new(catalog.definition(WorldId::Nexus)?, now)?;
        tracing::info!(token = %session.token(), "started in nexus");
        Ok(Self { catalog, session })
    }

    pub fn catalog(&self) -> &WorldCatalog {
        &self.catalog
    }

    pub fn active(&self) -> WorldId {
        self.session.world()
    }

    pub fn token(&self) -> SessionToken {
        self.session.token()
    }

    pub fn session(&self) -> &WorldSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut WorldSession {
        &mut self.session
    }

    /// Make `target` the active world.
    ///
    /// Entering the world that is already active does nothing and returns
    /// `Ok(None)`. Going straight from one sub-world to another is refused.
    /// The new session is fully built before the old one is dropped, so on
    /// error the machine is unchanged.
    pub fn enter_world(
        &mut self,
        target: WorldId,
        now: Duration,
    ) -> Result<Option<Transition>, TransitionError> {
        let from = self.active();
        if from == target {
            return Ok(None);
        }
        if !from.is_hub() && !target.is_hub() {
            return Err(TransitionError::InvalidTransition { from, to: target });
        }

        let _span = tracing::debug_span!("enter_world", %from, to = %target).entered();
        let session = WorldSession::new(self.catalog.definition(target)?, now)?;
        let retired = std::mem::replace(&mut self.session, session);
        let transition = Transition {
            from,
            to: target,
            retired: retired.token(),
            token: self.session.token(),
        };
        tracing::info!(
            retired = %transition.retired,
            token = %transition.token,
            "entered {target}"
        );
        Ok(Some(transition))
    }

    /// Take a portal that was evaluated while `from` was active. A request
    /// from a world that is no longer active is stale and refused.
    pub fn follow_portal(
        &mut self,
        from: WorldId,
        to: WorldId,
        now: Duration,
    ) -> Result<Option<Transition>, TransitionError> {
        if from != self.active() {
            return Err(TransitionError::InvalidTransition { from, to });
        }
        self.enter_world(to, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use nexus_common::MoveIntent;

    fn machine() -> WorldStateMachine {
        WorldStateMachine::new(WorldCatalog::default(), Duration::ZERO).unwrap()
    }

    #[test]
    fn starts_in_nexus() {
        let m = machine();
        assert_eq!(m.active(), WorldId::Nexus);
        assert_eq!(m.session().world(), WorldId::Nexus);
    }

    #[test]
    fn hub_reaches_every_sub_world_and_back() {
        for target in [WorldId::Combat, WorldId::Magic, WorldId::Racing] {
            let mut m = machine();
            let t = m.enter_world(target, Duration::ZERO).unwrap().unwrap();
            assert_eq!((t.from, t.to), (WorldId::Nexus, target));
            assert_eq!(m.active(), target);
            assert_eq!(t.token, m.token());

            let back = m.enter_world(WorldId::Nexus, Duration::ZERO).unwrap().unwrap();
            assert_eq!(back.retired, t.token);
            assert_eq!(m.active(), WorldId::Nexus);
        }
    }

    #[test]
    fn sub_world_to_sub_world_is_refused() {
        for from in [WorldId::Combat, WorldId::Magic, WorldId::Racing] {
            for to in [WorldId::Combat, WorldId::Magic, WorldId::Racing] {
                if from == to {
                    continue;
                }
                let mut m = machine();
                m.enter_world(from, Duration::ZERO).unwrap();
                let token = m.token();
                assert!(matches!(
                    m.enter_world(to, Duration::ZERO),
                    Err(TransitionError::InvalidTransition { .. })
                ));
                assert_eq!(m.active(), from);
                assert_eq!(m.token(), token);
            }
        }
    }

    #[test]
    fn entering_the_active_world_is_a_no_op() {
        let mut m = machine();
        let token = m.token();
        assert_eq!(m.enter_world(WorldId::Nexus, Duration::ZERO).unwrap(), None);
        assert_eq!(m.token(), token);
    }

    #[test]
    fn re_entering_resets_the_world() {
        let mut m = machine();
        m.enter_world(WorldId::Magic, Duration::ZERO).unwrap();
        m.session_mut().player_mut().teleport(Vec3::new(-3.0, 1.0, 0.0));
        m.session_mut().tick(MoveIntent::default(), Duration::ZERO);
        assert_eq!(m.session().runes().triggered_count(), 1);

        m.enter_world(WorldId::Nexus, Duration::ZERO).unwrap();
        m.enter_world(WorldId::Magic, Duration::ZERO).unwrap();
        assert_eq!(m.session().runes().triggered_count(), 0);
        assert_eq!(
            m.session().player().position(),
            m.catalog().definition(WorldId::Magic).unwrap().spawn
        );
    }

    #[test]
    fn stale_portal_request_is_refused() {
        let mut m = machine();
        m.enter_world(WorldId::Combat, Duration::ZERO).unwrap();
        assert!(m
            .follow_portal(WorldId::Nexus, WorldId::Magic, Duration::ZERO)
            .is_err());
        assert_eq!(m.active(), WorldId::Combat);

        let t = m
            .follow_portal(WorldId::Combat, WorldId::Nexus, Duration::ZERO)
            .unwrap();
        assert!(t.is_some());
        assert_eq!(m.active(), WorldId::Nexus);
    }

    #[test]
    fn only_nexus_is_reachable_from_a_sub_world() {
        let mut m = machine();
        m.enter_world(WorldId::Combat, Duration::ZERO).unwrap();
        let reachable: Vec<WorldId> = WorldId::ALL
            .into_iter()
            .filter(|&to| {
                let mut probe = m.clone();
                matches!(probe.enter_world(to, Duration::ZERO), Ok(Some(_)))
            })
            .collect();
        assert_eq!(reachable, vec![WorldId::Nexus]);
    }
}
