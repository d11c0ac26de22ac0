use std::ops::Range;

use glam::*;

/// The view and projection of a camera.
pub trait CameraTrait {
    /// Get the view matrix.
    fn view(&self) -> Mat4;

    /// Get the projection matrix.
    fn projection(&self, aspect_ratio: f32) -> Mat4;
}

/// The placement computed for a newly loaded asset.
///
/// See [`CameraFramer`](crate::CameraFramer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// The position of the camera.
    pub pos: Vec3,
    /// The point the camera orbits around.
    pub target: Vec3,
    /// The far clip plane distance.
    pub far: f32,
    /// The maximum orbit distance.
    pub max_distance: f32,
}

/// An orbiting camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// The position of the camera.
    pub pos: Vec3,
    /// The point the camera looks at and orbits around.
    pub target: Vec3,
    /// The z range of the camera.
    pub z: Range<f32>,
    /// The vertical FOV.
    pub vertical_fov: f32,
    /// The minimum orbit distance.
    pub min_distance: f32,
    /// The maximum orbit distance.
    pub max_distance: f32,

    saved: Option<(Vec3, Vec3)>,
}

impl Camera {
    /// Up direction, point clouds are Z-up.
    pub const UP: Vec3 = Vec3::Z;

    /// The pitch limit.
    pub const PITCH_LIMIT: Range<f32> =
        -std::f32::consts::FRAC_PI_2 + 1e-3..std::f32::consts::FRAC_PI_2 - 1e-3;

    /// Create a new camera.
    pub fn new(z: Range<f32>, vertical_fov: f32) -> Self {
        Self {
            pos: -Vec3::Y,
            target: Vec3::ZERO,
            z,
            vertical_fov,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            saved: None,
        }
    }

    /// Apply a framed [`CameraState`] and save it as the reset state.
    pub fn apply_state(&mut self, state: &CameraState) {
        self.pos = state.pos;
        self.target = state.target;
        self.z.end = state.far;
        self.max_distance = state.max_distance;
        self.save_state();
    }

    /// Save the current pose, restored by [`Camera::reset`].
    pub fn save_state(&mut self) {
        self.saved = Some((self.pos, self.target));
    }

    /// Restore the pose saved by [`Camera::save_state`].
    ///
    /// Returns whether there was a saved pose.
    pub fn reset(&mut self) -> bool {
        match self.saved {
            Some((pos, target)) => {
                self.pos = pos;
                self.target = target;
                true
            }
            None => false,
        }
    }

    /// Get the distance to the target.
    pub fn distance(&self) -> f32 {
        self.pos.distance(self.target)
    }

    /// Rotate around the target.
    ///
    /// Yaw turns around [`Camera::UP`], pitch is kept within [`Camera::PITCH_LIMIT`].
    pub fn orbit_by(&mut self, yaw: f32, pitch: f32) {
        let offset = self.pos - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let azimuth = offset.y.atan2(offset.x) + yaw;
        let elevation = ((offset.z / radius).clamp(-1.0, 1.0).asin() + pitch)
            .clamp(Self::PITCH_LIMIT.start, Self::PITCH_LIMIT.end);

        self.pos = self.target
            + radius
                * vec3(
                    elevation.cos() * azimuth.cos(),
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                );
    }

    /// Scale the distance to the target.
    ///
    /// The distance is clamped between [`Camera::min_distance`] and [`Camera::max_distance`].
    pub fn dolly_by(&mut self, factor: f32) {
        let offset = self.pos - self.target;
        let distance = (offset.length() * factor).clamp(self.min_distance, self.max_distance);
        self.pos = self.target + offset.normalize_or(-Vec3::Y) * distance;
    }

    /// Move both the camera and the target in the view plane.
    pub fn pan_by(&mut self, right: f32, up: f32) {
        let delta = self.get_right() * right + self.get_up() * up;
        self.pos += delta;
        self.target += delta;
    }

    /// Get the forward vector.
    pub fn get_forward(&self) -> Vec3 {
        (self.target - self.pos).normalize_or(Vec3::Y)
    }

    /// Get the right vector.
    pub fn get_right(&self) -> Vec3 {
        self.get_forward().cross(Self::UP).normalize_or(Vec3::X)
    }

    /// Get the up vector of the view plane.
    pub fn get_up(&self) -> Vec3 {
        self.get_right().cross(self.get_forward())
    }
}

impl CameraTrait for Camera {
    fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.pos, self.target, Self::UP)
    }

    fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.vertical_fov, aspect_ratio, self.z.start, self.z.end)
    }
}
