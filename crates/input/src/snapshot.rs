use nexus_common::MoveIntent;
use std::collections::BTreeSet;

use crate::keys::{Key, KeyBindings};

/// Which physical keys are currently held.
///
/// The host feeds press/release events in; the game loop samples
/// [`InputSnapshot::intent`] once per tick. Unbound keys are tracked too so a
/// later rebinding sees the true held state.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    bindings: KeyBindings,
    held: BTreeSet<String>,
}

impl InputSnapshot {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key-down. Returns the logical key it maps to, if any.
    pub fn press(&mut self, physical: &str) -> Option<Key> {
        self.held.insert(physical.to_string());
        self.bindings.resolve(physical)
    }

    /// Record a key-up. Returns the logical key it maps to, if any.
    pub fn release(&mut self, physical: &str) -> Option<Key> {
        self.held.remove(physical);
        self.bindings.resolve(physical)
    }

    /// Whether any physical key bound to `key` is held.
    pub fn is_held(&self, key: Key) -> bool {
        self.held
            .iter()
            .any(|name| self.bindings.resolve(name) == Some(key))
    }

    /// Release every held key.
    pub fn reset_all(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!(released = self.held.len(), "input reset");
        }
        self.held.clear();
    }

    /// Number of physical keys held, bound or not.
    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Movement intent for the current tick.
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.is_held(Key::Forward),
            backward: self.is_held(Key::Backward),
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_physical_key_holds_the_logical_key() {
        let mut input = InputSnapshot::default();
        input.press("ArrowUp");
        assert!(input.is_held(Key::Forward));
        input.release("ArrowUp");
        assert!(!input.is_held(Key::Forward));

        input.press("w");
        assert!(input.is_held(Key::Forward));
    }

    #[test]
    fn releasing_one_of_two_bound_keys_keeps_key_held() {
        let mut input = InputSnapshot::default();
        input.press("w");
        input.press("ArrowUp");
        input.release("w");
        assert!(input.is_held(Key::Forward));
    }

    #[test]
    fn intent_reflects_held_keys() {
        let mut input = InputSnapshot::default();
        assert_eq!(input.press("w"), Some(Key::Forward));
        assert_eq!(input.press("ArrowRight"), Some(Key::Right));
        let intent = input.intent();
        assert!(intent.forward && intent.right);
        assert!(!intent.backward && !intent.left);
    }

    #[test]
    fn unbound_keys_are_tracked_but_not_movement() {
        let mut input = InputSnapshot::default();
        assert_eq!(input.press("Shift"), None);
        assert_eq!(input.held_count(), 1);
        assert!(input.intent().is_idle());
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut input = InputSnapshot::default();
        input.press("w");
        input.press("a");
        input.press("Shift");
        input.reset_all();
        assert_eq!(input.held_count(), 0);
        assert!(input.intent().is_idle());
    }
}
