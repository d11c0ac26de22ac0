use glam::*;

use crate::{Camera, Error, Scene};

/// Draws a [`Scene`] from a [`Camera`].
///
/// Groups report what changed since the last frame through
/// [`PointGroup::updates`](crate::PointGroup::updates), so only those parts need uploading.
/// The updates are cleared by the [`Viewer`](crate::Viewer) after each successful render.
pub trait Renderer {
    /// Render the scene.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Error>;

    /// Resize the render target.
    fn resize(&mut self, _size: UVec2) {}
}
