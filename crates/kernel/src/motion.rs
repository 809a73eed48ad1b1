use crate::config::{ConfigError, HoldingReset, MotionConfig};
use crate::jump::JumpState;
use citydrive_common::{FORWARD, Pose, UP, yaw_of};
use citydrive_input::{Action, InputSnapshot};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Read-only copy of the controller state, for telemetry and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub frame: u64,
    pub orientation: Quat,
    /// Yaw about +Y in radians, derived from `orientation`.
    pub heading: f32,
    pub speed: f32,
    pub acceleration: f32,
    pub holding_time_forward: f32,
    pub holding_time_backward: f32,
    pub position: Vec3,
    pub direction: Vec3,
    pub jump: JumpState,
}

/// Integrates per-frame driving input into orientation, speed and position.
///
/// Owned by the frame loop and updated once per frame. Orientation, speed,
/// acceleration, holding times, position and jump state are the source of
/// truth; direction and world transform are recomputed from them.
#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    orientation: Quat,
    speed: f32,
    acceleration: f32,
    holding_forward: f32,
    holding_backward: f32,
    position: Vec3,
    direction: Vec3,
    jump: JumpState,
    world: Mat4,
    frame: u64,
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl MotionController {
    /// Create a controller at the origin, facing `FORWARD`, at rest.
    ///
    /// The config is trusted; use `try_new` for values read from a file.
    pub fn new(config: MotionConfig) -> Self {
        let orientation = Quat::IDENTITY;
        let position = Vec3::ZERO;
        Self {
            orientation,
            speed: 0.0,
            acceleration: config.initial_acceleration,
            holding_forward: 0.0,
            holding_backward: 0.0,
            position,
            direction: orientation * FORWARD,
            jump: JumpState::initial(&config.jump),
            world: Pose::new(position, orientation).world_matrix(),
            frame: 0,
            config,
        }
    }

    /// Validate `config`, then create a controller.
    pub fn try_new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn holding_time_forward(&self) -> f32 {
        self.holding_forward
    }

    pub fn holding_time_backward(&self) -> f32 {
        self.holding_backward
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector the car faces, recomputed every frame.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    /// Number of frames integrated so far. Zero-length frames do not count.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Rotation followed by translation, as of the last update.
    pub fn world_transform(&self) -> Mat4 {
        self.world
    }

    pub fn state(&self) -> MotionState {
        MotionState {
            frame: self.frame,
            orientation: self.orientation,
            heading: yaw_of(self.orientation),
            speed: self.speed,
            acceleration: self.acceleration,
            holding_time_forward: self.holding_forward,
            holding_time_backward: self.holding_backward,
            position: self.position,
            direction: self.direction,
            jump: self.jump,
        }
    }

    /// Advance one frame.
    ///
    /// Order matters and matches the demo: turn, recompute direction, ramp
    /// speed, vertical step, acceleration modifiers, clamp speed, translate.
    /// A frame with `dt <= 0` (or non-finite) integrates nothing.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            tracing::trace!(dt, "skipping zero-length frame");
            self.refresh_derived();
            return;
        }

        self.turn(input, dt);
        self.direction = self.orientation * FORWARD;
        self.ramp_speed(input, dt);
        self.step_vertical(input.is_held(Action::Jump), dt);
        self.modify_acceleration(input, dt);
        self.speed = self.speed.max(0.0);
        self.position += self.direction * self.speed * dt;
        self.world = self.pose().world_matrix();
        self.frame += 1;

        tracing::trace!(
            frame = self.frame,
            speed = self.speed,
            acceleration = self.acceleration,
            x = self.position.x,
            y = self.position.y,
            z = self.position.z,
            "motion"
        );
    }

    fn refresh_derived(&mut self) {
        self.direction = self.orientation * FORWARD;
        self.world = self.pose().world_matrix();
    }

    fn turn(&mut self, input: &InputSnapshot, dt: f32) {
        let yaw = self.config.rotation_speed * dt;
        if input.is_held(Action::TurnLeft) {
            self.orientation = self.orientation * Quat::from_axis_angle(UP, yaw);
        }
        if input.is_held(Action::TurnRight) {
            self.orientation = self.orientation * Quat::from_axis_angle(UP, -yaw);
        }
        // keep unit length across long sessions
        self.orientation = self.orientation.normalize();
    }

    /// Speed grows by `acceleration * holding_time` each frame, so the
    /// longer a key is held the faster the change.
    fn ramp_speed(&mut self, input: &InputSnapshot, dt: f32) {
        if input.is_held(Action::Accelerate) {
            self.holding_forward += dt;
            self.holding_backward = 0.0;
            self.speed += self.acceleration * self.holding_forward;
        } else if input.is_held(Action::Decelerate) {
            self.holding_backward += dt;
            self.holding_forward = 0.0;
            self.speed -= self.acceleration * self.holding_backward;
        } else if self.config.holding_reset == HoldingReset::OnRelease {
            self.holding_forward = 0.0;
            self.holding_backward = 0.0;
        }
    }

    fn step_vertical(&mut self, jump_held: bool, dt: f32) {
        let step = self
            .jump
            .advance(jump_held, self.position.y, dt, &self.config.jump);
        if step.state != self.jump {
            match step.state {
                JumpState::Airborne => tracing::debug!(frame = self.frame, "takeoff"),
                JumpState::Grounded => tracing::debug!(frame = self.frame, "landed"),
            }
        }
        self.jump = step.state;
        self.position.y = step.height;
    }

    fn modify_acceleration(&mut self, input: &InputSnapshot, dt: f32) {
        if input.is_held(Action::BoostAcceleration) {
            self.acceleration += dt;
        }
        if input.is_held(Action::ReduceAcceleration) {
            self.acceleration = (self.acceleration - dt).max(self.config.min_acceleration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallIntegration, JumpConfig};
    use std::f32::consts::PI;

    const DT: f32 = 1.0 / 60.0;

    fn held(actions: &[Action]) -> InputSnapshot {
        actions.iter().copied().collect()
    }

    fn grounded_config() -> MotionConfig {
        MotionConfig {
            jump: JumpConfig {
                start_airborne: false,
                ..JumpConfig::default()
            },
            ..MotionConfig::default()
        }
    }

    /// Splitmix64 step, for reproducible pseudo-random input sequences.
    fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn random_input(seed: &mut u64) -> (InputSnapshot, f32) {
        let bits = splitmix64(seed);
        let input = Action::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, a)| *a)
            .collect();
        // dt in [0, 0.1), including exact zeros
        let dt = ((bits >> 16) % 100) as f32 / 1000.0;
        (input, dt)
    }

    #[test]
    fn starts_at_rest() {
        let m = MotionController::default();
        assert_eq!(m.orientation(), Quat::IDENTITY);
        assert_eq!(m.speed(), 0.0);
        assert_eq!(m.acceleration(), 1.0);
        assert_eq!(m.position(), Vec3::ZERO);
        assert_eq!(m.direction(), FORWARD);
        assert_eq!(m.jump_state(), JumpState::Airborne);
        assert_eq!(m.world_transform(), Mat4::IDENTITY);
    }

    #[test]
    fn try_new_rejects_bad_config() {
        let config = MotionConfig {
            rotation_speed: f32::NAN,
            ..MotionConfig::default()
        };
        assert!(MotionController::try_new(config).is_err());
    }

    #[test]
    fn first_frame_falls_to_resting_height() {
        let mut m = MotionController::default();
        m.update(&InputSnapshot::new(), DT);
        assert_eq!(m.jump_state(), JumpState::Grounded);
        assert_eq!(m.position().y, 1.0);
    }

    #[test]
    fn turning_left_for_one_and_a_half_seconds() {
        let mut m = MotionController::default();
        let input = held(&[Action::TurnLeft]);
        for _ in 0..90 {
            m.update(&input, DT);
        }
        let heading = yaw_of(m.orientation());
        assert!((heading - 3.0 * PI / 4.0).abs() < 1e-3, "heading={heading}");
        assert!((m.orientation().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn turning_right_is_negative_yaw() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::TurnRight]), 0.5);
        assert!((yaw_of(m.orientation()) + PI / 4.0).abs() < 1e-4);
    }

    #[test]
    fn opposite_turns_cancel() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::TurnLeft, Action::TurnRight]), 0.25);
        assert!(yaw_of(m.orientation()).abs() < 1e-5);
    }

    #[test]
    fn speed_ramps_with_holding_time() {
        let mut m = MotionController::default();
        let input = held(&[Action::Accelerate]);
        let mut speeds = Vec::new();
        for _ in 0..3 {
            m.update(&input, 1.0);
            speeds.push(m.speed());
        }
        assert_eq!(m.holding_time_forward(), 3.0);
        assert_eq!(speeds, vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn car_moves_along_its_heading() {
        let mut m = MotionController::new(grounded_config());
        m.update(&held(&[Action::Accelerate]), 1.0);
        // speed 1 for 1s straight ahead along -Z
        let p = m.position();
        assert!((p.z + 1.0).abs() < 1e-5);
        assert!(p.x.abs() < 1e-5);
        assert_eq!(m.world_transform().w_axis.truncate(), p);
    }

    #[test]
    fn turn_is_applied_before_translation() {
        let mut m = MotionController::new(grounded_config());
        m.update(&held(&[Action::Accelerate, Action::TurnLeft]), 1.0);
        // after a quarter turn left the car faces -X
        let p = m.position();
        assert!((p.x + 1.0).abs() < 1e-4, "{p:?}");
        assert!(p.z.abs() < 1e-4, "{p:?}");
    }

    #[test]
    fn decelerate_never_reverses() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::Accelerate]), 1.0);
        m.update(&held(&[Action::Decelerate]), 1.0);
        assert_eq!(m.speed(), 0.0);
        assert_eq!(m.holding_time_forward(), 0.0);
        assert_eq!(m.holding_time_backward(), 1.0);
    }

    #[test]
    fn accelerate_wins_when_both_held() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::Accelerate, Action::Decelerate]), 1.0);
        assert_eq!(m.speed(), 1.0);
        assert_eq!(m.holding_time_backward(), 0.0);
    }

    #[test]
    fn holding_time_survives_release_by_default() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::Accelerate]), 1.0);
        m.update(&InputSnapshot::new(), 1.0);
        assert_eq!(m.holding_time_forward(), 1.0);
        // re-press resumes the ramp: 1 + 2
        m.update(&held(&[Action::Accelerate]), 1.0);
        assert_eq!(m.speed(), 3.0);
    }

    #[test]
    fn holding_time_resets_on_release_when_configured() {
        let mut m = MotionController::new(MotionConfig {
            holding_reset: HoldingReset::OnRelease,
            ..MotionConfig::default()
        });
        m.update(&held(&[Action::Accelerate]), 1.0);
        m.update(&InputSnapshot::new(), 1.0);
        assert_eq!(m.holding_time_forward(), 0.0);
        m.update(&held(&[Action::Accelerate]), 1.0);
        assert_eq!(m.speed(), 2.0);
    }

    #[test]
    fn acceleration_boost_and_floor() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::BoostAcceleration]), 0.5);
        m.update(&held(&[Action::BoostAcceleration]), 0.5);
        assert!((m.acceleration() - 2.0).abs() < 1e-6);
        m.update(&held(&[Action::ReduceAcceleration]), 5.0);
        assert_eq!(m.acceleration(), 1.0);
    }

    #[test]
    fn acceleration_applies_from_next_frame() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::Accelerate, Action::BoostAcceleration]), 1.0);
        assert_eq!(m.speed(), 1.0);
        assert_eq!(m.acceleration(), 2.0);
        m.update(&held(&[Action::Accelerate]), 1.0);
        assert_eq!(m.speed(), 1.0 + 2.0 * 2.0);
    }

    #[test]
    fn jump_is_clamped_to_apex() {
        let mut m = MotionController::default();
        m.update(&InputSnapshot::new(), DT);
        m.update(&held(&[Action::Jump]), 10.0);
        assert_eq!(m.jump_state(), JumpState::Airborne);
        assert_eq!(m.position().y, 80.0);
    }

    #[test]
    fn release_after_apex_falls_then_lands() {
        let mut m = MotionController::default();
        m.update(&InputSnapshot::new(), DT);
        m.update(&held(&[Action::Jump]), DT);
        let mut prev = m.position().y;
        let mut frames = 0;
        while m.jump_state() == JumpState::Airborne {
            m.update(&InputSnapshot::new(), DT);
            frames += 1;
            let y = m.position().y;
            if m.jump_state() == JumpState::Airborne {
                assert_eq!(prev - y, 3.0);
            }
            prev = y;
        }
        assert_eq!(frames, 27);
        assert_eq!(m.position().y, 1.0);
    }

    #[test]
    fn time_scaled_fall_lands_in_same_time_at_sixty_hz() {
        let mut m = MotionController::new(MotionConfig {
            jump: JumpConfig {
                fall_integration: FallIntegration::TimeScaled,
                start_airborne: false,
                ..JumpConfig::default()
            },
            ..MotionConfig::default()
        });
        m.update(&InputSnapshot::new(), DT);
        m.update(&held(&[Action::Jump]), DT);
        let mut frames = 0;
        while m.jump_state() == JumpState::Airborne && frames < 100 {
            m.update(&InputSnapshot::new(), DT);
            frames += 1;
        }
        assert!((26..=28).contains(&frames), "frames={frames}");
    }

    #[test]
    fn time_scaled_fall_stays_above_rest_after_grounding() {
        let mut m = MotionController::new(MotionConfig {
            jump: JumpConfig {
                fall_integration: FallIntegration::TimeScaled,
                start_airborne: false,
                ..JumpConfig::default()
            },
            ..MotionConfig::default()
        });
        let dt = 7.95 / 180.0;
        m.update(&InputSnapshot::new(), dt);
        m.update(&held(&[Action::Jump]), dt);
        let mut lowest = f32::MAX;
        let mut frames = 0;
        while m.jump_state() == JumpState::Airborne && frames < 100 {
            m.update(&InputSnapshot::new(), dt);
            lowest = lowest.min(m.position().y);
            frames += 1;
        }
        assert_eq!(m.jump_state(), JumpState::Grounded);
        assert!(lowest >= 1.0, "lowest={lowest}");
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut m = MotionController::default();
        m.update(&held(&[Action::Accelerate]), 1.0);
        let before = m.state();
        let all: InputSnapshot = Action::ALL.into_iter().collect();
        m.update(&all, 0.0);
        m.update(&all, f32::NAN);
        assert_eq!(m.state(), before);
    }

    #[test]
    fn invariants_hold_under_random_input() {
        let mut seed = 0x5eed_u64;
        let mut m = MotionController::default();
        let mut reached_ground = false;
        for _ in 0..5_000 {
            let (input, dt) = random_input(&mut seed);
            m.update(&input, dt);

            assert!((m.orientation().length() - 1.0).abs() < 1e-4);
            assert!(m.speed() >= 0.0);
            assert!(m.acceleration() >= 1.0);
            assert!(m.holding_time_forward() == 0.0 || m.holding_time_backward() == 0.0);
            assert!(m.position().y <= 80.0);
            if m.jump_state() == JumpState::Grounded {
                reached_ground = true;
            }
            if reached_ground {
                assert!(m.position().y >= 1.0, "y={}", m.position().y);
            }
            assert!((m.direction().length() - 1.0).abs() < 1e-4);
        }
        assert!(reached_ground);
    }
}
