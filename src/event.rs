use std::collections::VecDeque;

use glam::*;

/// An input event handled by the [`Viewer`](crate::Viewer).
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// A pointer click at pixel coordinates.
    Click { pointer: Vec2 },
    /// The viewport was resized.
    Resize { size: UVec2 },
    /// Orbit around the target by yaw and pitch, in radians.
    Orbit { delta: Vec2 },
    /// Scale the distance to the target.
    Zoom { factor: f32 },
    /// Move the camera and target in the view plane.
    Pan { delta: Vec2 },
    /// Restore the camera placement of the last load.
    ResetCamera,
    /// Load an asset.
    Load { url: String },
    /// Retry the last failed load.
    Retry,
}

/// A source of [`ViewerEvent`].
pub trait EventSource {
    /// Get the next event, if any.
    fn poll_event(&mut self) -> Option<ViewerEvent>;
}

impl EventSource for VecDeque<ViewerEvent> {
    fn poll_event(&mut self) -> Option<ViewerEvent> {
        self.pop_front()
    }
}
