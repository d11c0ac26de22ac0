use std::collections::HashMap;

use glam::*;

use crate::{CameraState, PointCloudAsset, ViewerConfig};

/// The identifier of the large sample cloud.
pub const BIG_CLOUD_ASSET: &str = "assets/big_cloud.glb";

/// The identifier of the small sample cloud.
pub const SMALL_CLOUD_ASSET: &str = "assets/small_cloud.glb";

/// The default far clip plane distance.
pub const DEFAULT_FAR: f32 = 1000.0;

/// The default maximum orbit distance, large enough to never limit zooming out.
pub const DEFAULT_MAX_DISTANCE: f32 = 10_000_000.0;

/// A hand-tuned camera placement for an asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    /// The camera position.
    pub position: Vec3,
    /// The look-at target.
    pub look_at: Vec3,
}

impl CameraPreset {
    /// The preset for [`BIG_CLOUD_ASSET`].
    pub const BIG_CLOUD: Self = Self::new(vec3(120.0, 0.0, 50.0), vec3(0.0, 0.0, -30.0));

    /// The preset for any asset without its own.
    pub const DEFAULT: Self = Self::new(vec3(0.0, -60.0, 0.0), vec3(0.0, 0.0, -30.0));

    /// Create a new preset.
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Places the camera so a newly loaded asset is fully visible.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFramer {
    /// The presets keyed by asset identifier.
    pub presets: HashMap<String, CameraPreset>,
    /// The preset for unknown assets.
    pub default_preset: CameraPreset,
    /// The minimum far clip plane distance.
    pub far: f32,
    /// The maximum orbit distance.
    pub max_distance: f32,
}

impl CameraFramer {
    /// Create a new framer without any per-asset preset.
    pub fn new(default_preset: CameraPreset, far: f32, max_distance: f32) -> Self {
        Self {
            presets: HashMap::new(),
            default_preset,
            far,
            max_distance,
        }
    }

    /// Add a preset for an asset.
    pub fn with_preset(mut self, asset_id: impl Into<String>, preset: CameraPreset) -> Self {
        self.presets.insert(asset_id.into(), preset);
        self
    }

    /// Get the preset for an asset, falling back to [`CameraFramer::default_preset`].
    pub fn preset(&self, asset_id: &str) -> &CameraPreset {
        self.presets.get(asset_id).unwrap_or(&self.default_preset)
    }

    /// Frame a newly loaded asset.
    ///
    /// The asset is recentered on its bounding volume and its transforms are frozen. Assets
    /// without any point are left in place.
    ///
    /// The far plane is [`CameraFramer::far`] unless the asset does not fit in it, then it is
    /// extended to the preset distance plus the asset diagonal. With the default preset and far
    /// plane this happens for diagonals above about 856 units.
    pub fn frame(&self, asset_id: &str, asset: &mut PointCloudAsset) -> CameraState {
        let bounds = asset.bounding_volume();
        match bounds {
            Some(bounds) => asset.recenter(bounds.center()),
            None => log::warn!("Asset {asset_id} has no points to frame"),
        }
        asset.freeze_transforms();

        let preset = self.preset(asset_id);
        let extent = bounds.map_or(0.0, |b| b.diagonal());
        let far = self
            .far
            .max(preset.position.distance(preset.look_at) + extent);

        log::debug!("Framing {asset_id} from {} with far plane {far}", preset.position);

        CameraState {
            pos: preset.position,
            target: preset.look_at,
            far,
            max_distance: self.max_distance,
        }
    }
}

impl Default for CameraFramer {
    fn default() -> Self {
        ViewerConfig::default().framer()
    }
}
