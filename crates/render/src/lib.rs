//! Rendering Adapter: renderer-agnostic scene sink.
//!
//! # Invariants
//! - Renderer cannot mutate world truth directly.
//! - Render state derives from the active session and view.
//! - Every constructed scene is torn down exactly once.
//!
//! Ships a debug text renderer for headless runs. The trait is stable; a GPU
//! backend plugs in without changing the game loop.

mod camera;
mod renderer;

pub use camera::CameraRig;
pub use renderer::{DebugTextRenderer, RenderSink, RenderView, SceneHandle};

pub fn crate_info() -> &'static str {
    "nexus-render v0.1.0"
}
