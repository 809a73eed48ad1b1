//! Frame loop driver: input -> motion -> camera -> render.

use crate::camera::{CameraConfig, FollowCamera};
use crate::renderer::{FrameView, Renderer};
use citydrive_input::{Action, FrameInput, InputSnapshot, InputSource};
use citydrive_kernel::{MotionConfig, MotionController};

/// Whether the loop should keep running after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Exit,
}

/// Owns the car and its camera for one session.
///
/// Single-threaded: `update` is called once per frame, then `render`.
#[derive(Debug, Clone)]
pub struct DriveLoop {
    motion: MotionController,
    camera: FollowCamera,
}

impl DriveLoop {
    pub fn new(motion: MotionConfig, camera: CameraConfig, aspect: f32) -> Self {
        let motion = MotionController::new(motion);
        let mut camera = FollowCamera::with_config(aspect, camera);
        camera.track(0.0, &motion.world_transform());
        Self { motion, camera }
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    /// Integrate one frame. Quit ends the session without integrating.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) -> FrameControl {
        if input.is_held(Action::Quit) {
            tracing::info!(frame = self.motion.frame(), "quit requested");
            return FrameControl::Exit;
        }
        self.motion.update(input, dt);
        self.camera.track(dt, &self.motion.world_transform());
        FrameControl::Continue
    }

    pub fn frame_view(&self) -> FrameView {
        FrameView {
            car_world: self.motion.world_transform(),
            view: self.camera.view(),
            projection: self.camera.projection(),
            eye: self.camera.eye(),
            telemetry: self.motion.state(),
        }
    }

    pub fn render<R: Renderer>(&self, renderer: &R) -> R::Output {
        renderer.render(&self.frame_view())
    }

    /// Drain `source`, calling `on_frame` after every integrated frame.
    /// Returns the number of frames integrated.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_frame: F) -> u64
    where
        S: InputSource + ?Sized,
        F: FnMut(&DriveLoop),
    {
        let mut frames = 0;
        while let Some(FrameInput { input, dt }) = source.poll() {
            if self.update(&input, dt) == FrameControl::Exit {
                break;
            }
            frames += 1;
            on_frame(self);
        }
        tracing::debug!(frames, "session ended");
        frames
    }
}
