use glam::*;

use crate::{Camera, PointCloudAsset, PointGroup, Ray};

/// The default distance around each point counted as a hit, in world units.
pub const DEFAULT_PICK_THRESHOLD: f32 = 0.05;

/// A point hit by a [`Ray`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The index of the owning [`PointGroup`] in the asset.
    pub group: usize,
    /// The index of the point in the group.
    pub index: usize,
    /// The distance from the ray origin to the closest point on the ray.
    pub distance: f32,
    /// The distance from the ray to the point.
    pub distance_to_ray: f32,
    /// The world position of the point.
    pub point: Vec3,
}

/// Map pointer pixel coordinates to normalized device coordinates.
///
/// Pixel Y grows downward, normalized Y grows upward.
pub fn normalize_pointer(pointer: Vec2, viewport: UVec2) -> Vec2 {
    let viewport = viewport.max(UVec2::ONE).as_vec2();
    vec2(
        pointer.x / viewport.x * 2.0 - 1.0,
        -(pointer.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Intersect the ray against every point of the groups.
///
/// A point is hit when it lies strictly within `threshold` of the ray. Points behind the origin
/// are measured from the origin. The hits are sorted by [`PickResult::distance_to_ray`], closest
/// first.
pub fn intersect_points<'a>(
    ray: &Ray,
    groups: impl IntoIterator<Item = &'a PointGroup>,
    threshold: f32,
) -> Vec<PickResult> {
    let threshold_sq = threshold * threshold;

    let mut hits = groups
        .into_iter()
        .enumerate()
        .flat_map(|(group, points)| {
            points
                .world_positions()
                .enumerate()
                .map(move |(index, point)| (group, index, point))
        })
        .filter_map(|(group, index, point)| {
            let distance_to_ray_sq = ray.distance_sq_to_point(point);
            if distance_to_ray_sq >= threshold_sq {
                return None;
            }

            Some(PickResult {
                group,
                index,
                distance: ray.origin.distance(ray.closest_point_to_point(point)),
                distance_to_ray: distance_to_ray_sq.sqrt(),
                point,
            })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| {
        a.distance_to_ray
            .partial_cmp(&b.distance_to_ray)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    hits
}

/// Resolves pointer events to the nearest point of an asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Picker {
    /// The distance around each point counted as a hit.
    pub threshold: f32,
}

impl Picker {
    /// Create a new picker.
    pub const fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Pick the point under the pointer.
    ///
    /// Returns [`None`] if no point lies within [`Picker::threshold`] of the pointer ray.
    pub fn pick(
        &self,
        camera: &Camera,
        asset: &PointCloudAsset,
        pointer: Vec2,
        viewport: UVec2,
    ) -> Option<PickResult> {
        let ndc = normalize_pointer(pointer, viewport);
        let aspect_ratio = viewport.x.max(1) as f32 / viewport.y.max(1) as f32;
        let ray = Ray::from_camera(camera, ndc, aspect_ratio);

        self.pick_ray(&ray, asset)
    }

    /// Pick the point closest to the ray.
    ///
    /// The whole ray is tested, points outside the camera clip range are still pickable.
    pub fn pick_ray(&self, ray: &Ray, asset: &PointCloudAsset) -> Option<PickResult> {
        let hit = intersect_points(ray, &asset.groups, self.threshold)
            .into_iter()
            .next();

        match &hit {
            Some(hit) => log::debug!(
                "Picked point {} of group {} at distance {}",
                hit.index,
                hit.group,
                hit.distance
            ),
            None => log::debug!("No point picked"),
        }

        hit
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(DEFAULT_PICK_THRESHOLD)
    }
}
