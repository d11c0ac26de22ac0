use crate::{PointCloudAsset, PointGroup};

/// The scene holding the currently loaded asset.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scene {
    asset: Option<PointCloudAsset>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current point cloud asset.
    pub fn asset(&self) -> Option<&PointCloudAsset> {
        self.asset.as_ref()
    }

    /// Get the current point cloud asset mutably.
    pub fn asset_mut(&mut self) -> Option<&mut PointCloudAsset> {
        self.asset.as_mut()
    }

    /// Attach an asset, returns the previously attached one.
    pub fn attach(&mut self, asset: PointCloudAsset) -> Option<PointCloudAsset> {
        log::debug!("Attaching {} to scene", asset.name);
        self.asset.replace(asset)
    }

    /// Detach the current asset.
    pub fn detach(&mut self) -> Option<PointCloudAsset> {
        self.asset.take().inspect(|asset| {
            log::debug!("Detached {} from scene", asset.name);
        })
    }

    /// Get the point groups of the current asset.
    pub fn groups(&self) -> &[PointGroup] {
        self.asset
            .as_ref()
            .map_or(&[][..], |asset| asset.groups.as_slice())
    }

    /// Recompute the matrices of groups with [`PointGroup::matrix_auto_update`].
    pub fn update_matrices(&mut self) {
        if let Some(asset) = self.asset.as_mut() {
            asset
                .groups
                .iter_mut()
                .filter(|g| g.matrix_auto_update)
                .for_each(PointGroup::update_matrix);
        }
    }

    /// Clear the pending updates of every group once uploaded.
    pub fn clear_updates(&mut self) {
        if let Some(asset) = self.asset.as_mut() {
            asset.groups.iter_mut().for_each(PointGroup::clear_updates);
        }
    }
}
