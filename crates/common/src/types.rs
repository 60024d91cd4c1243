use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of one of the four play areas.
///
/// Nexus is the hub: the initial world and the only one with outward portals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorldId {
    #[default]
    Nexus,
    Combat,
    Magic,
    Racing,
}

impl WorldId {
    /// All worlds in catalog order.
    pub const ALL: [WorldId; 4] = [
        WorldId::Nexus,
        WorldId::Combat,
        WorldId::Magic,
        WorldId::Racing,
    ];

    pub fn is_hub(self) -> bool {
        self == WorldId::Nexus
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorldId::Nexus => "nexus",
            WorldId::Combat => "combat",
            WorldId::Magic => "magic",
            WorldId::Racing => "racing",
        }
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown world `{0}` (expected nexus, combat, magic or racing)")]
pub struct ParseWorldIdError(pub String);

impl FromStr for WorldId {
    type Err = ParseWorldIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorldId::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseWorldIdError(s.to_string()))
    }
}

/// The movement keys held during one tick, sampled once from the input snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }
}

/// Identifies one live world session. Scheduled ticks carry the token they
/// were scheduled for; a tick whose token is no longer active is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.8}", &self.0.to_string()[..8])
    }
}

/// Player pose: position plus heading in radians (heading only changes in
/// vehicle worlds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub heading: f32,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            heading: 0.0,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_uniqueness() {
        let a = SessionToken::new();
        let b = SessionToken::new();
        assert_ne!(a, b);
    }

    #[test]
    fn nexus_is_the_default_and_only_hub() {
        assert_eq!(WorldId::default(), WorldId::Nexus);
        assert!(WorldId::Nexus.is_hub());
        assert!(!WorldId::Combat.is_hub());
        assert!(!WorldId::Magic.is_hub());
        assert!(!WorldId::Racing.is_hub());
    }

    #[test]
    fn world_id_parses_case_insensitively() {
        assert_eq!("Racing".parse::<WorldId>(), Ok(WorldId::Racing));
        assert_eq!("magic".parse::<WorldId>(), Ok(WorldId::Magic));
        assert!("lava".parse::<WorldId>().is_err());
    }

    #[test]
    fn world_id_display_round_trips_through_from_str() {
        for w in WorldId::ALL {
            assert_eq!(w.to_string().parse::<WorldId>(), Ok(w));
        }
    }

    #[test]
    fn idle_intent() {
        assert!(MoveIntent::default().is_idle());
        let i = MoveIntent {
            left: true,
            ..MoveIntent::default()
        };
        assert!(!i.is_idle());
    }

    #[test]
    fn pose_default_is_origin() {
        let p = Pose::default();
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.heading, 0.0);
    }
}
