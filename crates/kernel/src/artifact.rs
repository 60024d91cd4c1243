use glam::Vec3;

use crate::definition::ArtifactDef;
use crate::error::Rejection;
use crate::event::{Effect, Notification, Outbox, SessionEvent};
use crate::interactable::{Interactable, Payload, TriggerState};

/// The single reward artifact of a session.
///
/// Absent until spawned; once collected the `collected` flag latches and
/// nothing about the artifact changes again.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSlot {
    def: Option<ArtifactDef>,
    artifact: Option<Interactable>,
    collected: bool,
}

impl ArtifactSlot {
    pub fn new(def: Option<ArtifactDef>) -> Self {
        Self {
            def,
            artifact: None,
            collected: false,
        }
    }

    pub fn artifact(&self) -> Option<&Interactable> {
        self.artifact.as_ref()
    }

    pub fn exists(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Place the artifact at its fixed spawn point. A second spawn is refused.
    pub(crate) fn spawn(&mut self, out: &mut Outbox) -> Result<(), Rejection> {
        if self.artifact.is_some() {
            return Err(Rejection::DuplicateActivation {
                name: "artifact".into(),
            });
        }
        let Some(def) = &self.def else {
            tracing::warn!("artifact requested but the world defines no spawn point");
            return Ok(());
        };
        tracing::info!(position = ?def.position, "artifact spawned");
        self.artifact = Some(Interactable::new(
            "artifact",
            def.position,
            def.radius,
            Payload::Artifact,
        ));
        out.record(SessionEvent::ArtifactSpawned {
            position: def.position,
        });
        Ok(())
    }

    /// Collect the artifact when the player reaches it.
    pub(crate) fn update(&mut self, player: Vec3, out: &mut Outbox) {
        if self.collected {
            return;
        }
        let Some(artifact) = self.artifact.as_mut() else {
            return;
        };
        if !artifact.contains(player) || artifact.fire(TriggerState::Consumed).is_err() {
            return;
        }
        self.collected = true;
        tracing::info!("artifact collected");
        out.record(SessionEvent::ArtifactCollected {
            position: artifact.position(),
        });
        out.notify(Notification::ArtifactCollected);
        if self.def.as_ref().is_some_and(|d| d.clear_input_on_collect) {
            out.effect(Effect::ResetInput);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(clear_input: bool) -> ArtifactSlot {
        ArtifactSlot::new(Some(ArtifactDef {
            position: Vec3::new(-5.0, 0.5, -5.0),
            radius: 1.5,
            clear_input_on_collect: clear_input,
        }))
    }

    #[test]
    fn nothing_to_collect_before_spawn() {
        let mut s = slot(false);
        let mut out = Outbox::default();
        s.update(Vec3::new(-5.0, 0.5, -5.0), &mut out);
        assert!(!s.is_collected());
        assert!(out.effects.is_empty());
    }

    #[test]
    fn spawns_once_at_fixed_point() {
        let mut s = slot(false);
        let mut out = Outbox::default();
        s.spawn(&mut out).unwrap();
        assert!(s.spawn(&mut out).is_err());
        let a = s.artifact().unwrap();
        assert_eq!(a.position(), Vec3::new(-5.0, 0.5, -5.0));
        assert!(a.is_armed());
        assert_eq!(out.events.len(), 1);
    }

    #[test]
    fn collects_once() {
        let mut s = slot(false);
        let mut out = Outbox::default();
        s.spawn(&mut out).unwrap();
        let at = Vec3::new(-5.0, 1.0, -5.0);
        s.update(at, &mut out);
        s.update(at, &mut out);
        s.update(at, &mut out);
        assert!(s.is_collected());
        assert_eq!(s.artifact().map(|a| a.state()), Some(TriggerState::Consumed));
        assert_eq!(
            out.effects,
            vec![Effect::Notify(Notification::ArtifactCollected)]
        );
    }

    #[test]
    fn collection_radius_is_one_and_a_half() {
        let mut s = slot(false);
        let mut out = Outbox::default();
        s.spawn(&mut out).unwrap();
        s.update(Vec3::new(-5.0, 0.5, -3.5), &mut out);
        assert!(!s.is_collected());
        s.update(Vec3::new(-5.0, 0.5, -3.6), &mut out);
        assert!(s.is_collected());
    }

    #[test]
    fn clears_input_after_notifying_when_configured() {
        let mut s = slot(true);
        let mut out = Outbox::default();
        s.spawn(&mut out).unwrap();
        s.update(Vec3::new(-5.0, 0.5, -5.0), &mut out);
        assert_eq!(
            out.effects,
            vec![
                Effect::Notify(Notification::ArtifactCollected),
                Effect::ResetInput
            ]
        );
    }

    #[test]
    fn spawn_without_definition_is_a_no_op() {
        let mut s = ArtifactSlot::new(None);
        let mut out = Outbox::default();
        assert!(s.spawn(&mut out).is_ok());
        assert!(!s.exists());
    }
}
