use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A logical movement key. World logic only ever sees these, never the
/// physical key names that produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Forward, Key::Backward, Key::Left, Key::Right];
}

/// Maps physical key names (as reported by the host, e.g. `"w"` or
/// `"ArrowUp"`) to logical movement keys.
///
/// Several physical keys may map to the same logical key. Names are matched
/// exactly, so `"W"` and `"w"` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: BTreeMap<String, Key>,
}

impl KeyBindings {
    /// Bindings with no keys mapped.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind a physical key, replacing any previous binding for it.
    pub fn bind(&mut self, physical: impl Into<String>, key: Key) {
        self.bindings.insert(physical.into(), key);
    }

    /// Logical key for a physical key name, if bound.
    pub fn resolve(&self, physical: &str) -> Option<Key> {
        self.bindings.get(physical).copied()
    }

    /// All physical keys bound to `key`.
    pub fn physical_keys(&self, key: Key) -> impl Iterator<Item = &str> {
        self.bindings
            .iter()
            .filter(move |(_, k)| **k == key)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindings {
    /// WASD plus arrow keys.
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind("w", Key::Forward);
        b.bind("ArrowUp", Key::Forward);
        b.bind("s", Key::Backward);
        b.bind("ArrowDown", Key::Backward);
        b.bind("a", Key::Left);
        b.bind("ArrowLeft", Key::Left);
        b.bind("d", Key::Right);
        b.bind("ArrowRight", Key::Right);
        b
    }
}
