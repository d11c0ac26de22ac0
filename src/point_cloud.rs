use std::io::{BufRead, Write};

use bytemuck::Zeroable;
use glam::*;

use crate::{BoundingVolume, Error};

/// The color every point starts with.
pub const DEFAULT_POINT_COLOR: U8Vec4 = U8Vec4::new(255, 255, 255, 255);

bitflags::bitflags! {
    /// The parts of a [`PointGroup`] changed since the renderer last uploaded it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointGroupUpdate: u8 {
        /// The positions were moved.
        const POSITIONS = 1 << 0;
        /// At least one color was overwritten.
        const COLORS = 1 << 1;
        /// The transform matrix was recomputed.
        const MATRIX = 1 << 2;
    }
}

/// A group of points with per-point colors.
///
/// Positions and colors are parallel sequences, see [`PointGroup::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub colors: Vec<U8Vec4>,

    /// The translation of the group.
    pub pos: Vec3,
    /// The rotation of the group.
    pub rot: Quat,
    /// The scale of the group.
    pub scale: Vec3,
    /// The transform composed from [`PointGroup::pos`], [`PointGroup::rot`] and
    /// [`PointGroup::scale`] by [`PointGroup::update_matrix`].
    pub matrix: Mat4,
    /// Whether [`Scene::update_matrices`](crate::Scene::update_matrices) recomputes
    /// [`PointGroup::matrix`] every frame.
    pub matrix_auto_update: bool,

    updates: PointGroupUpdate,
}

impl PointGroup {
    /// Create a new point group with every color set to [`DEFAULT_POINT_COLOR`].
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        let colors = vec![DEFAULT_POINT_COLOR; positions.len()];
        Self::with_colors(name, positions, colors)
    }

    /// Create a new point group with explicit colors.
    pub fn with_colors(name: impl Into<String>, positions: Vec<Vec3>, colors: Vec<U8Vec4>) -> Self {
        Self {
            name: name.into(),
            positions,
            colors,
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
            matrix_auto_update: true,
            updates: PointGroupUpdate::all(),
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the group has no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check that every position has a color.
    pub fn validate(&self) -> Result<(), Error> {
        if self.positions.len() != self.colors.len() {
            return Err(Error::ColorCountMismatch {
                group: self.name.clone(),
                positions: self.positions.len(),
                colors: self.colors.len(),
            });
        }

        Ok(())
    }

    /// Move the geometry in place.
    pub fn translate(&mut self, offset: Vec3) {
        self.positions.iter_mut().for_each(|p| *p += offset);
        self.updates |= PointGroupUpdate::POSITIONS;
    }

    /// Recompute [`PointGroup::matrix`].
    pub fn update_matrix(&mut self) {
        self.matrix = Mat4::from_scale_rotation_translation(self.scale, self.rot, self.pos);
        self.updates |= PointGroupUpdate::MATRIX;
    }

    /// Get the world position of a point.
    pub fn world_position(&self, index: usize) -> Option<Vec3> {
        self.positions
            .get(index)
            .map(|p| self.matrix.transform_point3(*p))
    }

    /// Get the world positions of all points.
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .iter()
            .map(|p| self.matrix.transform_point3(*p))
    }

    /// Get the world-space bounding volume.
    pub fn bounding_volume(&self) -> Option<BoundingVolume> {
        BoundingVolume::from_points(self.world_positions())
    }

    /// Overwrite the color of a single point.
    pub fn set_color(&mut self, index: usize, color: U8Vec4) -> Result<(), Error> {
        let count = self.colors.len();
        let entry = self
            .colors
            .get_mut(index)
            .ok_or_else(|| Error::PointOutOfRange {
                group: self.name.clone(),
                index,
                count,
            })?;

        *entry = color;
        self.updates |= PointGroupUpdate::COLORS;

        Ok(())
    }

    /// Get the pending updates.
    pub fn updates(&self) -> PointGroupUpdate {
        self.updates
    }

    /// Clear the pending updates, called once the renderer has uploaded them.
    pub fn clear_updates(&mut self) {
        self.updates = PointGroupUpdate::empty();
    }
}

/// A point cloud asset made of one or more [`PointGroup`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudAsset {
    pub name: String,
    pub groups: Vec<PointGroup>,
}

impl PointCloudAsset {
    /// Create a new asset.
    pub fn new(name: impl Into<String>, groups: Vec<PointGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    /// Check the asset is well formed.
    ///
    /// An asset needs at least one group, and each group needs one color per position.
    pub fn validate(&self) -> Result<(), Error> {
        if self.groups.is_empty() {
            return Err(Error::EmptyAsset(self.name.clone()));
        }

        self.groups.iter().try_for_each(PointGroup::validate)
    }

    /// Get the total number of points.
    pub fn point_count(&self) -> usize {
        self.groups.iter().map(PointGroup::len).sum()
    }

    /// Get the world-space bounding volume of all groups.
    pub fn bounding_volume(&self) -> Option<BoundingVolume> {
        self.groups
            .iter()
            .filter_map(PointGroup::bounding_volume)
            .reduce(BoundingVolume::union)
    }

    /// Move the geometry of every group so the center lands on the origin.
    ///
    /// The asset is authored Z-up, so the Z offset keeps the sign of the center.
    pub fn recenter(&mut self, center: Vec3) {
        let offset = vec3(-center.x, -center.y, center.z);
        log::debug!("Recentering {} by {offset}", self.name);

        self.groups.iter_mut().for_each(|g| g.translate(offset));
    }

    /// Stop recomputing group matrices every frame, after computing them once.
    pub fn freeze_transforms(&mut self) {
        self.groups.iter_mut().for_each(|g| {
            g.matrix_auto_update = false;
            g.update_matrix();
        });
    }

    /// Read a PLY point cloud into a single group asset.
    ///
    /// The vertex element must be binary little endian `x y z` floats followed by
    /// `red green blue alpha` uchars.
    pub fn read_ply(reader: &mut impl BufRead, name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        let count = Self::read_ply_header(reader)?;
        let (positions, colors) = Self::read_ply_points(reader, count)?;

        log::debug!("Read {count} points for {name}");

        Ok(Self::new(
            name.clone(),
            vec![PointGroup::with_colors(name, positions, colors)],
        ))
    }

    /// Read a PLY header, returns the vertex count.
    fn read_ply_header(reader: &mut impl BufRead) -> Result<usize, Error> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.as_str().trim().to_lowercase() != "ply" {
            return Err(Error::NotPly);
        }

        let mut count = 0;
        let mut properties = Vec::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Err(Error::PlyHeaderNotFound);
            }

            let line = line.trim();
            if line.starts_with("end_header") {
                break;
            } else if let Some(format) = line.strip_prefix("format ") {
                if format != "binary_little_endian 1.0" {
                    return Err(Error::PlyUnsupportedFormat(format.to_string()));
                }
            } else if line.starts_with("element vertex") {
                count = line
                    .split_whitespace()
                    .nth(2)
                    .ok_or(Error::PlyVertexCountNotFound)?
                    .parse()?;
            } else if let Some(property) = line.strip_prefix("property ") {
                properties.push(property.to_string());
            }
        }

        if properties != PLY_PROPERTIES {
            return Err(Error::PlyUnsupportedFormat(format!(
                "vertex properties [{}]",
                properties.join(", ")
            )));
        }

        Ok(count)
    }

    /// Read the PLY points through [`PlyPointPod`].
    ///
    /// The vertex count is untrusted, memory grows with the points actually read.
    fn read_ply_points(
        reader: &mut impl BufRead,
        count: usize,
    ) -> Result<(Vec<Vec3>, Vec<U8Vec4>), Error> {
        let capacity = count.min(PLY_PREALLOCATED_POINTS);
        let mut positions = Vec::with_capacity(capacity);
        let mut colors = Vec::with_capacity(capacity);
        for read in 0..count {
            let mut point = PlyPointPod::zeroed();
            match reader.read_exact(bytemuck::bytes_of_mut(&mut point)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(Error::PlyVertexCountExceedsData { count, read });
                }
                Err(e) => return Err(e.into()),
            }
            positions.push(point.pos);
            colors.push(point.color);
        }

        Ok((positions, colors))
    }

    /// Write the points of every group to a PLY file, in world space.
    pub fn write_ply(&self, writer: &mut impl Write) -> Result<(), Error> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format binary_little_endian 1.0")?;
        writeln!(writer, "element vertex {}", self.point_count())?;
        for property in PLY_PROPERTIES {
            writeln!(writer, "property {property}")?;
        }
        writeln!(writer, "end_header")?;

        self.groups
            .iter()
            .flat_map(|g| g.world_positions().zip(g.colors.iter()))
            .map(|(pos, color)| PlyPointPod { pos, color: *color })
            .try_for_each(|point| writer.write_all(bytemuck::bytes_of(&point)))?;

        Ok(())
    }
}

/// The most points reserved up front when reading a PLY.
const PLY_PREALLOCATED_POINTS: usize = 1 << 16;

/// The vertex properties of a point cloud PLY.
const PLY_PROPERTIES: [&str; 7] = [
    "float x",
    "float y",
    "float z",
    "uchar red",
    "uchar green",
    "uchar blue",
    "uchar alpha",
];

/// The POD representation of a PLY point.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlyPointPod {
    pub pos: Vec3,
    pub color: U8Vec4,
}
