use glam::Vec3;
use nexus_common::{MoveIntent, Pose};
use serde::{Deserialize, Serialize};

/// Displacement per held key per tick when walking.
pub const WALK_STEP: f32 = 0.05;
/// Speed gained or lost per tick while forward/backward is held.
pub const VEHICLE_ACCEL: f32 = 0.005;
pub const VEHICLE_MAX_SPEED: f32 = 0.3;
/// Most negative (reverse) speed.
pub const VEHICLE_MIN_SPEED: f32 = -0.1;
/// Per-tick speed multiplier while coasting.
pub const VEHICLE_COAST_DECAY: f32 = 0.98;
/// Heading change per tick while a turn key is held, in radians.
pub const VEHICLE_TURN_RATE: f32 = 0.03;
/// Coasting speeds below this magnitude snap to rest.
pub const VEHICLE_STOP_EPSILON: f32 = 1e-4;

/// How a world integrates movement input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locomotion {
    /// Fixed step per held key along the x/z axes.
    #[default]
    Walk,
    /// Accelerate, coast and steer along a heading.
    Vehicle,
}

/// The player avatar of one world session. Always alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pose: Pose,
    speed: f32,
}

impl Player {
    pub fn spawn_at(position: Vec3) -> Self {
        Self {
            pose: Pose::at(position),
            speed: 0.0,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn heading(&self) -> f32 {
        self.pose.heading
    }

    /// Current vehicle speed; always zero when walking.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Move the player without integrating input.
    pub fn teleport(&mut self, position: Vec3) {
        self.pose.position = position;
    }

    /// Integrate one tick of input and return the new pose.
    pub fn apply(&mut self, intent: MoveIntent, locomotion: Locomotion) -> Pose {
        match locomotion {
            Locomotion::Walk => self.walk(intent),
            Locomotion::Vehicle => self.drive(intent),
        }
        self.pose
    }

    // Diagonals are not normalized: two keys move ~1.41x as far.
    fn walk(&mut self, intent: MoveIntent) {
        let p = &mut self.pose.position;
        if intent.forward {
            p.z -= WALK_STEP;
        }
        if intent.backward {
            p.z += WALK_STEP;
        }
        if intent.left {
            p.x -= WALK_STEP;
        }
        if intent.right {
            p.x += WALK_STEP;
        }
    }

    fn drive(&mut self, intent: MoveIntent) {
        if intent.forward {
            self.speed = (self.speed + VEHICLE_ACCEL).min(VEHICLE_MAX_SPEED);
        } else if intent.backward {
            self.speed = (self.speed - VEHICLE_ACCEL).max(VEHICLE_MIN_SPEED);
        } else {
            self.speed *= VEHICLE_COAST_DECAY;
            if self.speed.abs() < VEHICLE_STOP_EPSILON {
                self.speed = 0.0;
            }
        }

        if intent.left {
            self.pose.heading += VEHICLE_TURN_RATE;
        }
        if intent.right {
            self.pose.heading -= VEHICLE_TURN_RATE;
        }

        let (sin, cos) = self.pose.heading.sin_cos();
        self.pose.position.x += sin * self.speed;
        self.pose.position.z += cos * self.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn held(forward: bool, backward: bool, left: bool, right: bool) -> MoveIntent {
        MoveIntent {
            forward,
            backward,
            left,
            right,
        }
    }

    #[test]
    fn walk_moves_along_axes() {
        let mut p = Player::spawn_at(Vec3::new(0.0, 1.0, 0.0));
        p.apply(held(true, false, false, false), Locomotion::Walk);
        assert!((p.position().z + WALK_STEP).abs() < EPS);
        p.apply(held(false, false, true, false), Locomotion::Walk);
        assert!((p.position().x + WALK_STEP).abs() < EPS);
        assert_eq!(p.position().y, 1.0);
        assert_eq!(p.speed(), 0.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(true, true, true, true), Locomotion::Walk);
        assert!(p.position().length() < EPS);
    }

    #[test]
    fn diagonal_walk_is_unnormalized() {
        // Two held keys give sqrt(2) times the single-key step. Kept as-is.
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(true, false, false, true), Locomotion::Walk);
        let moved = p.position().length();
        assert!((moved - WALK_STEP * std::f32::consts::SQRT_2).abs() < EPS);
    }

    #[test]
    fn vehicle_accelerates_to_cap_then_coasts() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        for _ in 0..60 {
            p.apply(held(true, false, false, false), Locomotion::Vehicle);
        }
        assert!((p.speed() - 0.3).abs() < EPS, "speed={}", p.speed());

        for _ in 0..20 {
            p.apply(held(true, false, false, false), Locomotion::Vehicle);
        }
        assert!(p.speed() <= VEHICLE_MAX_SPEED);

        p.apply(MoveIntent::default(), Locomotion::Vehicle);
        assert!((p.speed() - 0.294).abs() < EPS, "speed={}", p.speed());
    }

    #[test]
    fn vehicle_reverse_is_floored() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        for _ in 0..100 {
            p.apply(held(false, true, false, false), Locomotion::Vehicle);
        }
        assert!((p.speed() - VEHICLE_MIN_SPEED).abs() < EPS);
        // heading 0 drives along +z, so reversing moves toward -z
        assert!(p.position().z < 0.0);
    }

    #[test]
    fn forward_wins_over_backward() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(true, true, false, false), Locomotion::Vehicle);
        assert!((p.speed() - VEHICLE_ACCEL).abs() < EPS);
    }

    #[test]
    fn coasting_snaps_to_rest() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(true, false, false, false), Locomotion::Vehicle);
        let mut ticks = 0;
        while p.speed() != 0.0 {
            p.apply(MoveIntent::default(), Locomotion::Vehicle);
            ticks += 1;
            assert!(ticks < 1000, "coast-down never settled");
        }
        let rest = p.position();
        p.apply(MoveIntent::default(), Locomotion::Vehicle);
        assert_eq!(p.position(), rest);
    }

    #[test]
    fn vehicle_steers_by_heading() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(true, false, true, false), Locomotion::Vehicle);
        assert!((p.heading() - VEHICLE_TURN_RATE).abs() < EPS);
        let expected = Vec3::new(
            VEHICLE_TURN_RATE.sin() * VEHICLE_ACCEL,
            0.0,
            VEHICLE_TURN_RATE.cos() * VEHICLE_ACCEL,
        );
        assert!((p.position() - expected).length() < EPS);

        p.apply(held(false, false, false, true), Locomotion::Vehicle);
        assert!(p.heading().abs() < EPS);
    }

    #[test]
    fn turning_in_place_does_not_move() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(false, false, true, false), Locomotion::Vehicle);
        assert_eq!(p.position(), Vec3::ZERO);
        assert!(p.heading() > 0.0);
    }

    #[test]
    fn teleport_keeps_heading() {
        let mut p = Player::spawn_at(Vec3::ZERO);
        p.apply(held(false, false, true, false), Locomotion::Vehicle);
        p.teleport(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(p.heading() > 0.0);
    }
}
