//! Vertical motion as an explicit two-state machine.
//!
//! This is a toy mechanic, not projectile motion: a takeoff teleports the car
//! up to the apex in one frame, after which it drops by a fixed amount each
//! frame until it touches the ground.

use crate::config::{FallIntegration, JumpConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Airborne,
}

/// Result of one vertical transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStep {
    pub state: JumpState,
    /// Absolute height after the step.
    pub height: f32,
    /// `height` minus the height before the step.
    pub delta: f32,
}

impl JumpState {
    /// State at session start.
    pub fn initial(config: &JumpConfig) -> Self {
        if config.start_airborne {
            JumpState::Airborne
        } else {
            JumpState::Grounded
        }
    }

    pub fn is_airborne(self) -> bool {
        self == JumpState::Airborne
    }

    /// Advance one frame.
    ///
    /// Jump held while grounded takes off; every other case falls. Holding
    /// jump while airborne does not hold the car up.
    pub fn advance(
        self,
        jump_held: bool,
        height: f32,
        dt: f32,
        config: &JumpConfig,
    ) -> VerticalStep {
        match (self, jump_held) {
            (JumpState::Grounded, true) => takeoff(height, config),
            _ => fall(self, height, dt, config),
        }
    }
}

/// Grounded -> Airborne. Adds the impulse, capped at the apex.
pub fn takeoff(height: f32, config: &JumpConfig) -> VerticalStep {
    let next = (height + config.impulse).min(config.apex);
    VerticalStep {
        state: JumpState::Airborne,
        height: next,
        delta: next - height,
    }
}

/// Drop by one frame's fall distance. Reaching the resting height or below
/// snaps to it and lands; otherwise the state is kept.
pub fn fall(state: JumpState, height: f32, dt: f32, config: &JumpConfig) -> VerticalStep {
    let drop = match config.fall_integration {
        FallIntegration::PerFrame => config.fall_step,
        FallIntegration::TimeScaled => config.fall_speed * dt,
    };
    let next = height - drop;
    let (state, next) = if next <= config.resting_height {
        (JumpState::Grounded, config.resting_height)
    } else {
        (state, next)
    };
    VerticalStep {
        state,
        height: next,
        delta: next - height,
    }
}
