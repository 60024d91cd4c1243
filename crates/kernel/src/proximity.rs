use glam::Vec3;

/// Whether `a` lies strictly within `radius` of `b` (3D Euclidean distance).
///
/// This is the only geometric predicate in the kernel: every portal, enemy,
/// rune, artifact and checkpoint is a sphere-vs-point check.
pub fn inside(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance(b) < radius
}

/// A table of spherical triggers, each carrying a value.
///
/// Entries are kept in insertion order, so hits are reported in a stable
/// order across ticks.
#[derive(Debug, Clone)]
pub struct TriggerTable<T> {
    entries: Vec<TriggerEntry<T>>,
}

#[derive(Debug, Clone)]
struct TriggerEntry<T> {
    position: Vec3,
    radius: f32,
    value: T,
}

impl<T> TriggerTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, position: Vec3, radius: f32, value: T) {
        self.entries.push(TriggerEntry {
            position,
            radius,
            value,
        });
    }

    /// Entries whose sphere contains `point`, with their insertion index.
    pub fn hits(&self, point: Vec3) -> impl Iterator<Item = (usize, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| inside(point, e.position, e.radius))
            .map(|(i, e)| (i, &e.value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TriggerTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
