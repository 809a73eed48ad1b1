//! Motion kernel: the per-frame car integrator.
//!
//! # Invariants
//! - Orientation stays a unit quaternion and only changes by yaw.
//! - Speed is never negative; acceleration never drops below its floor.
//! - At most one holding-time accumulator is nonzero.
//! - Height never exceeds the jump apex, and never drops below the resting
//!   height once the car has touched the ground.
//! - `update` does no I/O; all state is owned by the controller.

pub mod config;
pub mod jump;
pub mod motion;

pub use config::{ConfigError, FallIntegration, HoldingReset, JumpConfig, MotionConfig};
pub use jump::{JumpState, VerticalStep};
pub use motion::{MotionController, MotionState};

pub fn crate_info() -> &'static str {
    "citydrive-kernel v0.1.0"
}
