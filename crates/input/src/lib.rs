//! Input: polled key state mapped to driving actions.
//!
//! # Invariants
//! - The motion core consumes `InputSnapshot`s, never raw key codes.
//! - A snapshot is re-polled every frame; held means held for the whole frame.

pub mod action;
pub mod bindings;
pub mod snapshot;
pub mod source;

pub use action::Action;
pub use bindings::{Key, KeyBindings};
pub use snapshot::InputSnapshot;
pub use source::{FrameInput, InputScript, InputSource, ScriptSegment, ScriptedInput};

/// Errors from key mapping and input scripts.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
    #[error("script parse error: {0}")]
    Script(#[from] serde_yaml::Error),
    #[error("segment {segment} has invalid dt {dt}")]
    InvalidDt { segment: usize, dt: f32 },
}

pub fn crate_info() -> &'static str {
    "citydrive-input v0.1.0"
}
