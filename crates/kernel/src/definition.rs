use glam::Vec3;
use nexus_common::WorldId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

use crate::error::ConfigError;
use crate::player::Locomotion;

/// Static description of a world. Every session of the world is built from
/// this; nothing in it changes while the world is live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDefinition {
    pub id: WorldId,
    pub spawn: Vec3,
    #[serde(default)]
    pub locomotion: Locomotion,
    #[serde(default)]
    pub portals: Vec<PortalDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub runes: Vec<RuneDef>,
    /// Where the reward appears once the world's goal is met.
    #[serde(default)]
    pub artifact: Option<ArtifactDef>,
    #[serde(default)]
    pub course: Option<CourseDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalDef {
    pub label: String,
    pub position: Vec3,
    pub radius: f32,
    /// Display color as 0xRRGGBB. Visual only.
    #[serde(default)]
    pub color: u32,
    pub target: PortalTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortalTarget {
    World { world: WorldId },
    Handoff(HandoffConfig),
}

/// Parameters passed to the external site when the player leaves through
/// the hand-off portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffConfig {
    pub base_url: String,
    pub username: String,
    /// Player color as a hex string without `#`.
    pub color: String,
    pub speed: f32,
    pub referrer: String,
}

impl HandoffConfig {
    /// Destination with the player parameters as query string.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let speed = self.speed.to_string();
        Url::parse_with_params(
            &self.base_url,
            [
                ("username", self.username.as_str()),
                ("color", self.color.as_str()),
                ("speed", speed.as_str()),
                ("ref", self.referrer.as_str()),
            ],
        )
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            base_url: "https://portal.pieter.com".into(),
            username: "nexus-player".into(),
            color: "00ff88".into(),
            speed: 3.0,
            referrer: "nexus-worlds".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_pursuit_speed")]
    pub pursuit_speed: f32,
    #[serde(default = "default_enemy_radius")]
    pub defeat_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuneDef {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_rune_radius")]
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDef {
    pub position: Vec3,
    #[serde(default = "default_artifact_radius")]
    pub radius: f32,
    /// Release all held keys when the artifact is collected.
    #[serde(default)]
    pub clear_input_on_collect: bool,
}

/// An ordered ring of checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDef {
    pub checkpoints: Vec<Vec3>,
    #[serde(default = "default_checkpoint_radius")]
    pub radius: f32,
    /// How long a completed lap blocks the next completion.
    #[serde(default = "default_lap_cooldown_ms")]
    pub lap_cooldown_ms: u64,
}

fn default_pursuit_speed() -> f32 {
    0.02
}

fn default_enemy_radius() -> f32 {
    1.0
}

fn default_rune_radius() -> f32 {
    1.0
}

fn default_artifact_radius() -> f32 {
    1.5
}

fn default_checkpoint_radius() -> f32 {
    2.0
}

fn default_lap_cooldown_ms() -> u64 {
    1000
}

const PORTAL_RADIUS: f32 = 1.5;

fn portal(label: &str, position: Vec3, radius: f32, color: u32, world: WorldId) -> PortalDef {
    PortalDef {
        label: label.into(),
        position,
        radius,
        color,
        target: PortalTarget::World { world },
    }
}

impl WorldDefinition {
    /// Built-in definition for `id`.
    pub fn builtin(id: WorldId) -> Self {
        match id {
            WorldId::Nexus => Self::nexus(),
            WorldId::Combat => Self::combat(),
            WorldId::Magic => Self::magic(),
            WorldId::Racing => Self::racing(),
        }
    }

    fn empty(id: WorldId, spawn: Vec3) -> Self {
        Self {
            id,
            spawn,
            locomotion: Locomotion::Walk,
            portals: Vec::new(),
            enemies: Vec::new(),
            runes: Vec::new(),
            artifact: None,
            course: None,
        }
    }

    pub fn nexus() -> Self {
        let mut def = Self::empty(WorldId::Nexus, Vec3::new(0.0, 1.0, 0.0));
        def.portals = vec![
            portal(
                "Racing World",
                Vec3::new(-3.0, 1.0, -3.0),
                PORTAL_RADIUS,
                0xff5555,
                WorldId::Racing,
            ),
            portal(
                "Magic/Puzzle World",
                Vec3::new(0.0, 1.0, -4.0),
                PORTAL_RADIUS,
                0x55ff55,
                WorldId::Magic,
            ),
            portal(
                "Combat World",
                Vec3::new(3.0, 1.0, -3.0),
                PORTAL_RADIUS,
                0x5555ff,
                WorldId::Combat,
            ),
            PortalDef {
                label: "Vibe Jam Portal".into(),
                position: Vec3::new(0.0, 1.0, 4.0),
                radius: PORTAL_RADIUS,
                color: 0x00ff00,
                target: PortalTarget::Handoff(HandoffConfig::default()),
            },
        ];
        def
    }

    pub fn combat() -> Self {
        let mut def = Self::empty(WorldId::Combat, Vec3::new(0.0, 1.0, 0.0));
        def.portals = vec![portal(
            "Return to Nexus",
            Vec3::new(0.0, 1.0, -10.0),
            PORTAL_RADIUS,
            0xffff00,
            WorldId::Nexus,
        )];
        def.enemies = vec![EnemyDef {
            name: "enemy".into(),
            position: Vec3::new(5.0, 0.5, 5.0),
            pursuit_speed: default_pursuit_speed(),
            defeat_radius: default_enemy_radius(),
        }];
        def.artifact = Some(ArtifactDef {
            position: Vec3::new(-5.0, 0.5, -5.0),
            radius: default_artifact_radius(),
            clear_input_on_collect: false,
        });
        def
    }

    pub fn magic() -> Self {
        let mut def = Self::empty(WorldId::Magic, Vec3::new(0.0, 1.0, 0.0));
        def.portals = vec![portal(
            "Return to Nexus",
            Vec3::new(0.0, 1.0, 5.0),
            PORTAL_RADIUS,
            0x00ffff,
            WorldId::Nexus,
        )];
        def.runes = vec![
            RuneDef {
                name: "rune1".into(),
                position: Vec3::new(-3.0, 1.0, 0.0),
                radius: default_rune_radius(),
            },
            RuneDef {
                name: "rune2".into(),
                position: Vec3::new(3.0, 1.0, 0.0),
                radius: default_rune_radius(),
            },
        ];
        def.artifact = Some(ArtifactDef {
            position: Vec3::new(0.0, 2.0, 0.0),
            radius: default_artifact_radius(),
            clear_input_on_collect: true,
        });
        def
    }

    pub fn racing() -> Self {
        let mut def = Self::empty(WorldId::Racing, Vec3::new(0.0, 0.5, 0.0));
        def.locomotion = Locomotion::Vehicle;
        def.portals = vec![portal(
            "Return to Nexus",
            Vec3::new(0.0, 1.0, -15.0),
            2.0,
            0xff00ff,
            WorldId::Nexus,
        )];
        def.course = Some(CourseDef {
            checkpoints: vec![
                Vec3::new(0.0, 0.0, -30.0),
                Vec3::new(30.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 30.0),
                Vec3::new(-30.0, 0.0, 0.0),
            ],
            radius: default_checkpoint_radius(),
            lap_cooldown_ms: default_lap_cooldown_ms(),
        });
        def
    }

    /// Check the definition is playable.
    ///
    /// The hub may only lead out (to other worlds or the hand-off); every
    /// other world has exactly one portal, and it leads back to the hub.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = self.id;
        let radius_ok = |name: &str, radius: f32| {
            if radius > 0.0 && radius.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::InvalidRadius {
                    world,
                    name: name.to_string(),
                    radius,
                })
            }
        };

        for p in &self.portals {
            radius_ok(&p.label, p.radius)?;
            match &p.target {
                PortalTarget::World { world: target } => {
                    let allowed = if world.is_hub() {
                        !target.is_hub()
                    } else {
                        target.is_hub()
                    };
                    if !allowed {
                        return Err(ConfigError::IllegalPortal {
                            world,
                            label: p.label.clone(),
                            target: *target,
                        });
                    }
                }
                PortalTarget::Handoff(handoff) => {
                    if !world.is_hub() {
                        return Err(ConfigError::IllegalPortal {
                            world,
                            label: p.label.clone(),
                            target: world,
                        });
                    }
                    handoff
                        .url()
                        .map_err(|source| ConfigError::HandoffUrl { world, source })?;
                }
            }
        }
        if !world.is_hub() && self.portals.len() != 1 {
            return Err(ConfigError::ReturnPortal {
                world,
                found: self.portals.len(),
            });
        }

        for e in &self.enemies {
            radius_ok(&e.name, e.defeat_radius)?;
            if !(e.pursuit_speed >= 0.0 && e.pursuit_speed.is_finite()) {
                return Err(ConfigError::InvalidSpeed {
                    world,
                    name: e.name.clone(),
                    speed: e.pursuit_speed,
                });
            }
        }

        let mut rune_names = BTreeSet::new();
        for r in &self.runes {
            radius_ok(&r.name, r.radius)?;
            if !rune_names.insert(r.name.as_str()) {
                return Err(ConfigError::DuplicateRune {
                    world,
                    name: r.name.clone(),
                });
            }
        }

        match &self.artifact {
            Some(a) => radius_ok("artifact", a.radius)?,
            None if !self.enemies.is_empty() || !self.runes.is_empty() => {
                return Err(ConfigError::MissingArtifact { world });
            }
            None => {}
        }

        if let Some(course) = &self.course {
            if course.checkpoints.is_empty() {
                return Err(ConfigError::EmptyCourse { world });
            }
            radius_ok("checkpoint", course.radius)?;
        }

        Ok(())
    }
}
