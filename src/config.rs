use std::collections::HashMap;

use glam::*;

use crate::{
    BIG_CLOUD_ASSET, Camera, CameraFramer, CameraPreset, DEFAULT_FAR, DEFAULT_HIGHLIGHT_COLOR,
    DEFAULT_MAX_DISTANCE, DEFAULT_PICK_THRESHOLD, Highlighter, Picker,
};

/// The configuration of a [`Viewer`](crate::Viewer).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// The distance around each point counted as a pick hit.
    pub pick_threshold: f32,
    /// The near clip plane distance.
    pub near: f32,
    /// The far clip plane distance, may be extended for large assets.
    pub far: f32,
    /// The vertical FOV in radians.
    pub vertical_fov: f32,
    /// The maximum orbit distance.
    pub max_distance: f32,
    /// The color of picked points.
    pub highlight_color: U8Vec4,
    /// The camera presets keyed by asset identifier.
    pub presets: HashMap<String, CameraPreset>,
    /// The camera preset for assets not in [`ViewerConfig::presets`].
    pub default_preset: CameraPreset,
}

impl ViewerConfig {
    /// Create the camera.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(self.near..self.far, self.vertical_fov);
        camera.max_distance = self.max_distance;
        camera
    }

    /// Create the camera framer.
    pub fn framer(&self) -> CameraFramer {
        CameraFramer {
            presets: self.presets.clone(),
            default_preset: self.default_preset,
            far: self.far,
            max_distance: self.max_distance,
        }
    }

    /// Create the picker.
    pub fn picker(&self) -> Picker {
        Picker::new(self.pick_threshold)
    }

    /// Create the highlighter.
    pub fn highlighter(&self) -> Highlighter {
        Highlighter::new(self.highlight_color)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pick_threshold: DEFAULT_PICK_THRESHOLD,
            near: 1.0,
            far: DEFAULT_FAR,
            vertical_fov: 60f32.to_radians(),
            max_distance: DEFAULT_MAX_DISTANCE,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            presets: HashMap::from([(BIG_CLOUD_ASSET.to_string(), CameraPreset::BIG_CLOUD)]),
            default_preset: CameraPreset::DEFAULT,
        }
    }
}
