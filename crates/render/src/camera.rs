use glam::Vec3;
use nexus_common::WorldId;

use crate::renderer::RenderView;

/// Third-person follow camera.
///
/// Each tick the eye moves toward `player + offset` by `smoothing` (1.0 snaps)
/// and looks at the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    offset: Vec3,
    smoothing: f32,
    view: RenderView,
}

impl CameraRig {
    pub fn new(offset: Vec3, smoothing: f32, eye: Vec3) -> Self {
        Self {
            offset,
            smoothing: smoothing.clamp(0.0, 1.0),
            view: RenderView {
                eye,
                target: Vec3::ZERO,
                fov_degrees: 75.0,
            },
        }
    }

    /// The rig each world starts with. Only the racing camera trails the
    /// vehicle smoothly; the others stick to the player.
    pub fn for_world(world: WorldId) -> Self {
        match world {
            WorldId::Nexus => Self::new(Vec3::new(0.0, 1.0, 5.0), 1.0, Vec3::new(0.0, 2.0, 5.0)),
            WorldId::Combat => Self::new(Vec3::new(0.0, 6.0, 8.0), 1.0, Vec3::new(0.0, 5.0, 10.0)),
            WorldId::Magic => Self::new(Vec3::new(0.0, 5.0, 8.0), 1.0, Vec3::new(0.0, 3.0, 10.0)),
            WorldId::Racing => {
                Self::new(Vec3::new(0.0, 6.0, 12.0), 0.1, Vec3::new(0.0, 15.0, 0.0))
            }
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn view(&self) -> RenderView {
        self.view
    }

    /// Step the rig toward `player` and return the new view.
    pub fn follow(&mut self, player: Vec3) -> RenderView {
        let desired = player + self.offset;
        self.view.eye = self.view.eye.lerp(desired, self.smoothing);
        self.view.target = player;
        self.view
    }
}
