use citydrive_kernel::{JumpState, MotionState};
use glam::{Mat4, Vec3};
use serde::Serialize;

/// Everything a renderer needs for one frame.
///
/// The scene is drawn with `view`/`projection` only; the car additionally
/// uses `car_world`. `telemetry` is for overlays and debugging.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameView {
    pub car_world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub telemetry: MotionState,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a frame view and produces output. It never mutates
/// motion or camera state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame: the static scene, then the car.
    fn render(&self, frame: &FrameView) -> Self::Output;
}

/// Headless stand-in for the GPU renderer.
///
/// Produces a human-readable description of what would be drawn.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameView) -> String {
        let t = &frame.telemetry;
        let p = t.position;
        let target = frame.car_world.w_axis.truncate();
        let mut out = String::new();
        out.push_str(&format!("=== Frame {} ===\n", t.frame));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1})\n",
            frame.eye.x, frame.eye.y, frame.eye.z, target.x, target.y, target.z
        ));
        out.push_str(&format!(
            "Car: pos=({:.2}, {:.2}, {:.2}) heading={:.1}deg {}\n",
            p.x,
            p.y,
            p.z,
            t.heading.to_degrees(),
            match t.jump {
                JumpState::Grounded => "grounded",
                JumpState::Airborne => "airborne",
            }
        ));
        out.push_str(&format!(
            "  speed={:.2} accel={:.2} hold_fwd={:.2} hold_back={:.2}\n",
            t.speed, t.acceleration, t.holding_time_forward, t.holding_time_backward
        ));
        out
    }
}

/// Renders a frame as one line of JSON.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Output = Result<String, serde_json::Error>;

    fn render(&self, frame: &FrameView) -> Self::Output {
        serde_json::to_string(frame)
    }
}
