use std::time::Duration;

/// Fixed-step loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Game time added per frame.
    pub tick: Duration,
    /// Stop after this many frames. `None` runs until the input runs out or
    /// the player leaves through the hand-off portal.
    pub max_frames: Option<u64>,
}

impl LoopConfig {
    /// One frame at 60 Hz.
    pub const DEFAULT_TICK: Duration = Duration::from_nanos(16_666_667);
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: Self::DEFAULT_TICK,
            max_frames: None,
        }
    }
}

/// Monotonic game time, advanced only by the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameClock {
    now: Duration,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.now += dt;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_ticks_make_about_a_second() {
        let mut clock = GameClock::new();
        for _ in 0..60 {
            clock.advance(LoopConfig::default().tick);
        }
        let drift = clock.now().as_secs_f64() - 1.0;
        assert!(drift.abs() < 1e-6, "drift={drift}");
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(GameClock::new().now(), Duration::ZERO);
    }
}
