use glam::*;

use crate::{Error, PickResult, PointCloudAsset};

/// The default highlight color, opaque red.
pub const DEFAULT_HIGHLIGHT_COLOR: U8Vec4 = U8Vec4::new(255, 0, 0, 255);

/// Marks picked points with a color.
///
/// Previous highlights are kept, each call only recolors its own point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlighter {
    /// The highlight color.
    pub color: U8Vec4,
}

impl Highlighter {
    /// Create a new highlighter.
    pub const fn new(color: U8Vec4) -> Self {
        Self { color }
    }

    /// Recolor the picked point.
    ///
    /// An out of range group or point means the pick does not belong to the asset.
    pub fn highlight(&self, asset: &mut PointCloudAsset, pick: &PickResult) -> Result<(), Error> {
        let count = asset.groups.len();
        let group = asset
            .groups
            .get_mut(pick.group)
            .ok_or(Error::GroupOutOfRange {
                group: pick.group,
                count,
            })?;

        group.set_color(pick.index, self.color)?;

        log::debug!("Highlighted point {} of group {}", pick.index, group.name);

        Ok(())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_COLOR)
    }
}
