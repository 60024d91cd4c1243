use nexus_common::SessionToken;
use nexus_input::InputSnapshot;
use nexus_kernel::{ConfigError, Effect, Transition, TransitionError};
use nexus_render::{CameraRig, RenderSink, RenderView, SceneHandle};
use url::Url;

use crate::clock::LoopConfig;
use crate::context::GameContext;
use crate::ports::{Handoff, Notifier};

/// A scheduled frame, bound to the session it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub token: SessionToken,
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    FrameLimit { frames: u64 },
    InputExhausted { frames: u64 },
    HandedOff { frames: u64, url: Url },
}

#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error("world transition failed: {0}")]
    Transition(#[source] ConfigError),
}

/// Drives the active session one tick per frame and applies its effects to
/// the host: render sink, notifier, input snapshot and hand-off.
pub struct GameLoop<R, N, H> {
    ctx: GameContext,
    config: LoopConfig,
    renderer: R,
    notifier: N,
    handoff: H,
    scene: Option<SceneHandle>,
    camera: CameraRig,
    frames: u64,
    exit: Option<Url>,
}

impl<R, N, H> GameLoop<R, N, H>
where
    R: RenderSink,
    N: Notifier,
    H: Handoff,
{
    pub fn new(ctx: GameContext, config: LoopConfig, renderer: R, notifier: N, handoff: H) -> Self {
        let camera = CameraRig::for_world(ctx.machine.active());
        Self {
            ctx,
            config,
            renderer,
            notifier,
            handoff,
            scene: None,
            camera,
            frames: 0,
            exit: None,
        }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn handoff(&self) -> &H {
        &self.handoff
    }

    pub fn scene(&self) -> Option<SceneHandle> {
        self.scene
    }

    pub fn view(&self) -> RenderView {
        self.camera.view()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Destination of the hand-off, once the player has left.
    pub fn exit_url(&self) -> Option<&Url> {
        self.exit.as_ref()
    }

    /// Build the scene for the active world and schedule the first frame.
    pub fn start(&mut self) -> FrameRequest {
        if self.scene.is_none() {
            let world = self.ctx.machine.active();
            match self.ctx.machine.catalog().definition(world) {
                Ok(def) => self.scene = Some(self.renderer.construct(def)),
                Err(e) => tracing::warn!("no definition for {world}: {e}"),
            }
            self.camera = CameraRig::for_world(world);
        }
        FrameRequest {
            token: self.ctx.machine.token(),
        }
    }

    /// Run one frame. Returns the request for the next frame, or `None` when
    /// the request is stale or the loop has stopped.
    pub fn run_frame(&mut self, request: FrameRequest) -> Result<Option<FrameRequest>, LoopError> {
        if self.exit.is_some() {
            return Ok(None);
        }
        if request.token != self.ctx.machine.token() {
            tracing::trace!(token = %request.token, "stale frame dropped");
            return Ok(None);
        }

        let now = self.ctx.clock.advance(self.config.tick);
        let world = self.ctx.machine.active();
        let span = tracing::info_span!("tick", %world, frame = self.frames);
        let _enter = span.enter();

        let intent = self.ctx.input.intent();
        let effects = self.ctx.machine.session_mut().tick(intent, now);
        self.frames += 1;

        for effect in effects {
            match effect {
                Effect::Notify(notification) => self.notifier.notify(&notification),
                Effect::ResetInput => self.ctx.input.reset_all(),
                Effect::EnterWorld { from, to } => {
                    match self.ctx.machine.follow_portal(from, to, now) {
                        Ok(Some(transition)) => {
                            self.swap_scene(&transition)?;
                            // remaining effects belong to the retired session
                            break;
                        }
                        Ok(None) => {}
                        Err(TransitionError::InvalidTransition { from, to }) => {
                            tracing::debug!(%from, %to, "transition ignored");
                        }
                        Err(TransitionError::Config(e)) => return Err(LoopError::Transition(e)),
                    }
                }
                Effect::Handoff(url) => {
                    self.handoff.exit_process(&url);
                    if let Some(scene) = self.scene.take() {
                        self.renderer.teardown(scene);
                    }
                    tracing::info!(%url, "left through the hand-off portal");
                    self.exit = Some(url);
                    return Ok(None);
                }
            }
        }

        let session = self.ctx.machine.session();
        let view = self.camera.follow(session.pose().position);
        if let Some(scene) = self.scene {
            self.renderer.render(scene, session, &view, now);
        }

        Ok(Some(FrameRequest {
            token: self.ctx.machine.token(),
        }))
    }

    /// Run until `max_frames`, feeding input before each frame. `feed`
    /// returning false ends the run.
    pub fn run_with_input<F>(&mut self, max_frames: u64, mut feed: F) -> Result<LoopOutcome, LoopError>
    where
        F: FnMut(&mut InputSnapshot) -> bool,
    {
        let mut request = Some(self.start());
        let mut ran = 0;
        while let Some(req) = request {
            if ran >= max_frames {
                return Ok(LoopOutcome::FrameLimit { frames: self.frames });
            }
            if !feed(&mut self.ctx.input) {
                return Ok(LoopOutcome::InputExhausted { frames: self.frames });
            }
            request = self.run_frame(req)?;
            ran += 1;
        }
        match &self.exit {
            Some(url) => Ok(LoopOutcome::HandedOff {
                frames: self.frames,
                url: url.clone(),
            }),
            None => Ok(LoopOutcome::FrameLimit { frames: self.frames }),
        }
    }

    /// Run `max_frames` frames with whatever input is currently held, or
    /// the configured frame limit when `max_frames` is `None`.
    pub fn run_for(&mut self, max_frames: Option<u64>) -> Result<LoopOutcome, LoopError> {
        let limit = max_frames.or(self.config.max_frames).unwrap_or(u64::MAX);
        self.run_with_input(limit, |_| true)
    }

    fn swap_scene(&mut self, transition: &Transition) -> Result<(), LoopError> {
        if let Some(old) = self.scene.take() {
            self.renderer.teardown(old);
        }
        let def = self
            .ctx
            .machine
            .catalog()
            .definition(transition.to)
            .map_err(LoopError::Transition)?;
        self.scene = Some(self.renderer.construct(def));
        self.camera = CameraRig::for_world(transition.to);
        self.ctx.input.reset_all();
        Ok(())
    }
}
