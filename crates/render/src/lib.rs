//! Presentation side of the drive demo: follow camera, renderer interface,
//! and the frame loop that ties input, motion and camera together.
//!
//! # Invariants
//! - Renderers never mutate motion or camera state.
//! - The camera derives from the car's world transform, never the reverse.
//! - One update then one render per frame, on a single thread.

mod camera;
mod frame;
mod renderer;

pub use camera::{CameraConfig, FollowCamera};
pub use frame::{DriveLoop, FrameControl};
pub use renderer::{DebugTextRenderer, FrameView, JsonRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "citydrive-render v0.1.0"
}
