use glam::Vec3;
use nexus_common::WorldId;
use nexus_kernel::{TriggerState, WorldDefinition, WorldSession};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Opaque handle to a scene built by a [`RenderSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneHandle(pub u64);

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// `construct` and `teardown` bracket the lifetime of one world session;
/// `render` is called once per tick in between. The sink reads the session
/// and never mutates it.
pub trait RenderSink {
    /// Build the static scene for a world.
    fn construct(&mut self, def: &WorldDefinition) -> SceneHandle;

    /// Release everything built for `scene`.
    fn teardown(&mut self, scene: SceneHandle);

    /// Draw one frame of the live session.
    fn render(
        &mut self,
        scene: SceneHandle,
        session: &WorldSession,
        view: &RenderView,
        now: Duration,
    );
}

/// Human-readable frame renderer for headless runs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    next_handle: u64,
    scenes: BTreeMap<SceneHandle, WorldId>,
    last_frame: String,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scenes constructed and not yet torn down.
    pub fn live_scenes(&self) -> usize {
        self.scenes.len()
    }

    pub fn scene_world(&self, scene: SceneHandle) -> Option<WorldId> {
        self.scenes.get(&scene).copied()
    }

    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Format one frame without recording it.
    pub fn format_frame(session: &WorldSession, view: &RenderView, now: Duration) -> String {
        let mut out = String::new();
        let pose = session.pose();
        let p = pose.position;
        let _ = writeln!(
            out,
            "=== {} (tick={}, session={}) ===",
            session.world(),
            session.ticks(),
            session.token()
        );
        let _ = writeln!(
            out,
            "Player: pos=({:.2}, {:.2}, {:.2}) heading={:.2} speed={:.3}",
            p.x,
            p.y,
            p.z,
            pose.heading,
            session.player().speed()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        for portal in session.portals() {
            let q = portal.position;
            let _ = writeln!(
                out,
                "  portal \"{}\" at ({:.1}, {:.1}, {:.1})",
                portal.label, q.x, q.y, q.z
            );
        }
        for item in session.interactables() {
            let q = item.position();
            let state = match item.state() {
                TriggerState::Armed => "armed",
                TriggerState::Triggered => "triggered",
                TriggerState::Consumed => "consumed",
            };
            let _ = writeln!(
                out,
                "  {} [{}] pos=({:.2}, {:.2}, {:.2})",
                item.name(),
                state,
                q.x,
                q.y,
                q.z
            );
        }
        if let Some(course) = session.course() {
            let _ = writeln!(
                out,
                "Lap: {:.2}s  next checkpoint {}  laps {}",
                course.current_lap_time(now).as_secs_f64(),
                course.index(),
                course.laps_completed()
            );
        }
        out
    }
}

impl RenderSink for DebugTextRenderer {
    fn construct(&mut self, def: &WorldDefinition) -> SceneHandle {
        self.next_handle += 1;
        let handle = SceneHandle(self.next_handle);
        self.scenes.insert(handle, def.id);
        tracing::debug!(world = %def.id, scene = handle.0, "scene constructed");
        handle
    }

    fn teardown(&mut self, scene: SceneHandle) {
        match self.scenes.remove(&scene) {
            Some(world) => tracing::debug!(%world, scene = scene.0, "scene torn down"),
            None => tracing::warn!(scene = scene.0, "teardown of unknown scene"),
        }
    }

    fn render(
        &mut self,
        scene: SceneHandle,
        session: &WorldSession,
        view: &RenderView,
        now: Duration,
    ) {
        if !self.scenes.contains_key(&scene) {
            tracing::warn!(scene = scene.0, "render to unknown scene skipped");
            return;
        }
        self.last_frame = Self::format_frame(session, view, now);
        self.frames += 1;
    }
}
