use citydrive_common::{RIGHT, UP};
use citydrive_kernel::ConfigError;
use citydrive_kernel::config::require_positive;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_3, PI};

/// Projection and chase parameters for `FollowCamera`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Offset along the target's right axis and along world up.
    pub distance: f32,
    /// Rate at which the lerp factor toward the target's right axis grows.
    pub angle_follow_speed: f32,
    /// Minimum cosine between consecutive right axes for smoothing to continue.
    pub angle_threshold: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_3,
            near: 0.1,
            far: 100_000.0,
            distance: 1000.0,
            angle_follow_speed: 0.015,
            angle_threshold: 0.85,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("camera.fov", self.fov)?;
        if self.fov >= PI {
            return Err(ConfigError::EmptyRange {
                field: "camera.fov",
                low: self.fov,
                high: PI,
            });
        }
        require_positive("camera.near", self.near)?;
        require_positive("camera.far", self.far)?;
        if self.near >= self.far {
            return Err(ConfigError::EmptyRange {
                field: "camera.near/far",
                low: self.near,
                high: self.far,
            });
        }
        require_positive("camera.distance", self.distance)?;
        require_positive("camera.angle_follow_speed", self.angle_follow_speed)?;
        if !(-1.0..=1.0).contains(&self.angle_threshold) {
            return Err(ConfigError::EmptyRange {
                field: "camera.angle_threshold",
                low: -1.0,
                high: self.angle_threshold,
            });
        }
        Ok(())
    }
}

/// Chase camera that sits above and to the right of a moving target.
///
/// The right axis it offsets along eases toward the target's right axis while
/// the target turns smoothly, and stops easing (restarting from zero) after
/// a sharp change of heading between two frames.
/// Camera motion is presentation only; it never feeds back into the car.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    config: CameraConfig,
    aspect: f32,
    projection: Mat4,
    view: Mat4,
    eye: Vec3,
    current_right: Vec3,
    past_right: Vec3,
    right_interpolator: f32,
}

impl FollowCamera {
    pub fn new(aspect: f32) -> Self {
        Self::with_config(aspect, CameraConfig::default())
    }

    /// The projection is fixed here. A non-positive or non-finite aspect
    /// ratio falls back to 1.
    pub fn with_config(aspect: f32, config: CameraConfig) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            tracing::warn!(aspect, "invalid aspect ratio, using 1.0");
            1.0
        };
        let projection = Mat4::perspective_rh(config.fov, aspect, config.near, config.far);
        let mut camera = Self {
            config,
            aspect,
            projection,
            view: Mat4::IDENTITY,
            eye: Vec3::ZERO,
            current_right: RIGHT,
            past_right: RIGHT,
            right_interpolator: 0.0,
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Right axis the camera is currently offset along.
    pub fn right(&self) -> Vec3 {
        self.current_right
    }

    /// Track `target` (a world matrix) for one frame; returns `(view, projection)`.
    pub fn update(&mut self, dt: f32, target: &Mat4) -> (Mat4, Mat4) {
        self.track(dt, target);
        (self.view, self.projection)
    }

    /// Same as `update`, for callers that read the matrices through the accessors.
    pub fn track(&mut self, dt: f32, target: &Mat4) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let target_position = target.w_axis.truncate();
        let target_right = target.x_axis.truncate();

        if target_right.dot(self.past_right) > self.config.angle_threshold {
            self.right_interpolator =
                (self.right_interpolator + dt * self.config.angle_follow_speed).min(1.0);
            let t = self.right_interpolator * self.right_interpolator;
            self.current_right = self.current_right.lerp(target_right, t);
        } else {
            self.right_interpolator = 0.0;
        }
        self.past_right = target_right;

        self.look_at(target_position);
    }

    fn look_at(&mut self, target: Vec3) {
        let d = self.config.distance;
        self.eye = target + self.current_right * d + UP * d;
        // horizontal axis perpendicular to the offset; crossing back gives
        // an up vector orthogonal to `current_right`
        let ground_axis = UP.cross(self.current_right);
        let up = self.current_right.cross(ground_axis);
        self.view = Mat4::look_at_rh(self.eye, target, up);
    }
}
