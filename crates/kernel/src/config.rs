//! Tuning values for the motion integrator.
//!
//! Defaults reproduce the feel of the demo, including its quirks:
//! the fall is a fixed step per frame, holding times survive key release,
//! and the car starts airborne.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Errors from loading or validating motion and camera tuning.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("jump apex {apex} must be above resting height {resting}")]
    ApexBelowRest { apex: f32, resting: f32 },
    #[error("{field} range is empty: {low} must be below {high}")]
    EmptyRange {
        field: &'static str,
        low: f32,
        high: f32,
    },
    #[error("initial acceleration {initial} is below the floor {floor}")]
    InitialBelowFloor { initial: f32, floor: f32 },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check that `value` is finite and strictly positive.
pub fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// What happens to the holding-time accumulators when neither
/// accelerate nor decelerate is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingReset {
    /// Keep both values; only pressing the opposite key clears one.
    /// Re-pressing the same key resumes the ramp where it stopped.
    #[default]
    OnOppositeKey,
    /// Clear both as soon as no direction key is held.
    OnRelease,
}

/// How the fall distance of a frame is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallIntegration {
    /// `fall_step` units every frame regardless of frame time.
    #[default]
    PerFrame,
    /// `fall_speed * dt` units per frame.
    TimeScaled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Height added on the takeoff frame.
    pub impulse: f32,
    /// Ascent is capped here.
    pub apex: f32,
    /// Per-frame drop for `FallIntegration::PerFrame`.
    pub fall_step: f32,
    /// Units per second for `FallIntegration::TimeScaled`.
    pub fall_speed: f32,
    pub fall_integration: FallIntegration,
    /// Height the car snaps to when it reaches the ground.
    pub resting_height: f32,
    /// Begin the session airborne, so the first frames fall to the ground.
    pub start_airborne: bool,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            impulse: 80.0,
            apex: 80.0,
            fall_step: 3.0,
            fall_speed: 180.0,
            fall_integration: FallIntegration::PerFrame,
            resting_height: 1.0,
            start_airborne: true,
        }
    }
}

impl JumpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("jump.impulse", self.impulse)?;
        require_positive("jump.apex", self.apex)?;
        require_positive("jump.fall_step", self.fall_step)?;
        require_positive("jump.fall_speed", self.fall_speed)?;
        require_positive("jump.resting_height", self.resting_height)?;
        if self.apex <= self.resting_height {
            return Err(ConfigError::ApexBelowRest {
                apex: self.apex,
                resting: self.resting_height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Yaw rate while a turn key is held, radians per second.
    pub rotation_speed: f32,
    pub initial_acceleration: f32,
    /// Floor the acceleration factor cannot be reduced below.
    pub min_acceleration: f32,
    pub holding_reset: HoldingReset,
    pub jump: JumpConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rotation_speed: FRAC_PI_2,
            initial_acceleration: 1.0,
            min_acceleration: 1.0,
            holding_reset: HoldingReset::OnOppositeKey,
            jump: JumpConfig::default(),
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("rotation_speed", self.rotation_speed)?;
        require_positive("min_acceleration", self.min_acceleration)?;
        require_positive("initial_acceleration", self.initial_acceleration)?;
        if self.initial_acceleration < self.min_acceleration {
            return Err(ConfigError::InitialBelowFloor {
                initial: self.initial_acceleration,
                floor: self.min_acceleration,
            });
        }
        self.jump.validate()
    }

    /// Parse from YAML and validate. Missing fields take their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON and validate. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
