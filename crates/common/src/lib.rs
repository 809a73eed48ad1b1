//! Shared types for the drive demo: axis conventions and the car pose.
//!
//! # Conventions
//! - Right-handed coordinates, +Y up.
//! - A model faces -Z when its orientation is the identity.

pub mod types;

pub use types::{FORWARD, Pose, RIGHT, UP, yaw_of};

pub fn crate_info() -> &'static str {
    "citydrive-common v0.1.0"
}
