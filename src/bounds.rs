use glam::*;

/// An axis-aligned bounding volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// The minimum corner.
    pub min: Vec3,
    /// The maximum corner.
    pub max: Vec3,
}

impl BoundingVolume {
    /// Create a new bounding volume from its corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create the minimal bounding volume enclosing the points.
    ///
    /// Returns [`None`] if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(Self::new(first, first), |bounds, point| {
            bounds.extend(point)
        }))
    }

    /// Grow the bounding volume to include the point.
    pub fn extend(self, point: Vec3) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }

    /// Grow the bounding volume to include another bounding volume.
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Get the center.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the length of the diagonal.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Check if the point lies inside, boundary included.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}
