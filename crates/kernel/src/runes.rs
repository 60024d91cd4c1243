use glam::Vec3;
use std::collections::BTreeSet;

use crate::definition::RuneDef;
use crate::error::Rejection;
use crate::event::{Outbox, SessionEvent};
use crate::interactable::{Interactable, Payload, TriggerState};

/// Runes light up the first time the player touches them; the puzzle is
/// solved once every rune is lit.
#[derive(Debug, Clone, Default)]
pub struct RunePuzzle {
    runes: Vec<Interactable>,
    triggered: BTreeSet<String>,
}

impl RunePuzzle {
    pub fn new(defs: &[RuneDef]) -> Self {
        let runes = defs
            .iter()
            .map(|d| Interactable::new(d.name.clone(), d.position, d.radius, Payload::Rune))
            .collect();
        Self {
            runes,
            triggered: BTreeSet::new(),
        }
    }

    pub fn runes(&self) -> &[Interactable] {
        &self.runes
    }

    pub fn triggered_count(&self) -> usize {
        self.triggered.len()
    }

    pub fn total(&self) -> usize {
        self.runes.len()
    }

    /// True once every rune is triggered. A world without runes has no
    /// puzzle and is never solved.
    pub fn is_solved(&self) -> bool {
        !self.runes.is_empty() && self.triggered.len() == self.runes.len()
    }

    pub(crate) fn update(&mut self, player: Vec3, out: &mut Outbox) {
        for index in 0..self.runes.len() {
            if self.runes[index].contains(player) {
                if let Err(rejection) = self.activate(index, out) {
                    tracing::trace!(%rejection, "rune ignored");
                }
            }
        }
    }

    /// Armed → Triggered for the rune at `index`.
    pub(crate) fn activate(&mut self, index: usize, out: &mut Outbox) -> Result<(), Rejection> {
        let total = self.runes.len();
        let Some(rune) = self.runes.get_mut(index) else {
            return Ok(());
        };
        if self.triggered.contains(rune.name()) {
            return Err(Rejection::DuplicateActivation {
                name: rune.name().to_string(),
            });
        }
        rune.fire(TriggerState::Triggered)?;
        self.triggered.insert(rune.name().to_string());
        tracing::info!(
            rune = rune.name(),
            triggered = self.triggered.len(),
            total,
            "rune triggered"
        );
        out.record(SessionEvent::RuneTriggered {
            name: rune.name().to_string(),
            triggered: self.triggered.len(),
            total,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle() -> RunePuzzle {
        RunePuzzle::new(&[
            RuneDef {
                name: "rune1".into(),
                position: Vec3::new(-3.0, 1.0, 0.0),
                radius: 1.0,
            },
            RuneDef {
                name: "rune2".into(),
                position: Vec3::new(3.0, 1.0, 0.0),
                radius: 1.0,
            },
        ])
    }

    #[test]
    fn touching_a_rune_twice_counts_once() {
        let mut p = puzzle();
        let mut out = Outbox::default();
        let at = Vec3::new(-3.0, 1.0, 0.2);
        p.update(at, &mut out);
        p.update(at, &mut out);
        p.update(at, &mut out);
        assert_eq!(p.triggered_count(), 1);
        assert_eq!(out.events.len(), 1);
        assert!(!p.is_solved());
    }

    #[test]
    fn solved_after_all_runes() {
        let mut p = puzzle();
        let mut out = Outbox::default();
        p.update(Vec3::new(-3.0, 1.0, 0.0), &mut out);
        assert!(!p.is_solved());
        p.update(Vec3::new(3.0, 1.0, 0.0), &mut out);
        assert!(p.is_solved());
        assert_eq!(p.triggered_count(), p.total());
    }

    #[test]
    fn direct_reactivation_is_a_duplicate() {
        let mut p = puzzle();
        let mut out = Outbox::default();
        p.activate(1, &mut out).unwrap();
        assert_eq!(
            p.activate(1, &mut out),
            Err(Rejection::DuplicateActivation {
                name: "rune2".into()
            })
        );
        assert_eq!(p.triggered_count(), 1);
    }

    #[test]
    fn far_from_runes_nothing_happens() {
        let mut p = puzzle();
        let mut out = Outbox::default();
        p.update(Vec3::new(0.0, 1.0, 0.0), &mut out);
        assert_eq!(p.triggered_count(), 0);
        assert!(p.runes().iter().all(|r| r.is_armed()));
    }

    #[test]
    fn empty_puzzle_is_never_solved() {
        assert!(!RunePuzzle::default().is_solved());
    }
}
