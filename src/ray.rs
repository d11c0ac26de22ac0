use glam::*;

use crate::CameraTrait;

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin.
    pub origin: Vec3,
    /// The normalized direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create the ray from the camera through the normalized device coordinates.
    pub fn from_camera(camera: &impl CameraTrait, ndc: Vec2, aspect_ratio: f32) -> Self {
        let view = camera.view();
        let inv_view_proj = (camera.projection(aspect_ratio) * view).inverse();

        let origin = view.inverse().col(3).xyz();
        let through = inv_view_proj.project_point3(ndc.extend(0.5));

        Self::new(origin, through - origin)
    }

    /// Get the point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Get the point on the ray closest to the point.
    ///
    /// Points behind the origin are closest to the origin.
    pub fn closest_point_to_point(&self, point: Vec3) -> Vec3 {
        let t = (point - self.origin).dot(self.direction);
        self.at(t.max(0.0))
    }

    /// Get the squared distance from the ray to the point.
    pub fn distance_sq_to_point(&self, point: Vec3) -> f32 {
        self.closest_point_to_point(point).distance_squared(point)
    }
}
