mod bounds;
mod camera;
mod config;
mod error;
mod event;
mod framer;
mod highlighter;
mod loader;
mod picker;
mod point_cloud;
mod ray;
mod redraw;
mod renderer;
mod scene;

use glam::*;

pub use bounds::*;
pub use camera::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use framer::*;
pub use highlighter::*;
pub use loader::*;
pub use picker::*;
pub use point_cloud::*;
pub use ray::*;
pub use redraw::*;
pub use renderer::*;
pub use scene::*;

pub use glam;

/// The lifecycle of the asset shown by the [`Viewer`].
#[derive(Debug, Clone, PartialEq)]
pub enum AssetState {
    /// Nothing is loaded.
    Empty,
    /// An asset is being loaded.
    Loading { url: String },
    /// An asset is attached to the scene.
    Displayed { url: String },
    /// The last load failed, see [`Viewer::retry`].
    Unavailable { url: String, reason: String },
}

impl AssetState {
    /// Get the url of the asset, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Loading { url } | Self::Displayed { url } | Self::Unavailable { url, .. } => {
                Some(url.as_str())
            }
        }
    }
}

/// A load started by [`Viewer::request_load`].
struct PendingLoad {
    url: String,
    receiver: oneshot::Receiver<LoadResult>,
    token: CancellationToken,
}

impl std::fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLoad")
            .field("url", &self.url)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// The point cloud viewer.
///
/// Loads an asset at a time, frames the camera around it, and highlights the points clicked on.
/// All state is owned here and mutated from the thread driving the viewer, input comes in
/// through [`Viewer::handle_event`] or an [`EventSource`] passed to [`Viewer::pump`].
#[derive(Debug)]
pub struct Viewer<L: AssetLoader, R: Renderer> {
    pub loader: L,
    pub renderer: R,

    pub framer: CameraFramer,
    pub picker: Picker,
    pub highlighter: Highlighter,

    scene: Scene,
    camera: Camera,
    redraw: RedrawScheduler,
    viewport: UVec2,
    state: AssetState,
    pending: Option<PendingLoad>,
}

impl<L: AssetLoader, R: Renderer> Viewer<L, R> {
    /// Create a new viewer with the default [`ViewerConfig`].
    pub fn new(loader: L, renderer: R, viewport: UVec2) -> Self {
        Self::new_with(loader, renderer, viewport, ViewerConfig::default())
    }

    /// Create a new viewer with all options.
    pub fn new_with(loader: L, renderer: R, viewport: UVec2, config: ViewerConfig) -> Self {
        log::debug!("Creating camera");
        let camera = config.camera();

        log::debug!("Creating camera framer");
        let framer = config.framer();

        log::debug!("Creating picker");
        let picker = config.picker();

        log::debug!("Creating highlighter");
        let highlighter = config.highlighter();

        log::info!("Viewer created");

        Self {
            loader,
            renderer,

            framer,
            picker,
            highlighter,

            scene: Scene::new(),
            camera,
            redraw: RedrawScheduler::new(),
            viewport,
            state: AssetState::Empty,
            pending: None,
        }
    }

    /// Get the asset state.
    pub fn state(&self) -> &AssetState {
        &self.state
    }

    /// Get the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get the displayed asset.
    pub fn asset(&self) -> Option<&PointCloudAsset> {
        self.scene.asset()
    }

    /// Get the displayed asset mutably.
    ///
    /// A redraw is requested so the changes are rendered in the next frame.
    pub fn asset_mut(&mut self) -> Option<&mut PointCloudAsset> {
        let asset = self.scene.asset_mut();
        if asset.is_some() {
            self.redraw.request();
        }
        asset
    }

    /// Get the camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Get the viewport size.
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Check if a redraw is pending.
    pub fn is_redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    /// Start loading an asset.
    ///
    /// A load still pending is cancelled, and a displayed asset is unloaded first. Call
    /// [`Viewer::poll_load`] to display the asset once loaded.
    pub fn request_load(&mut self, url: impl Into<String>) {
        let url = url.into();

        if let Some(pending) = self.pending.take() {
            log::warn!("Cancelling load of {} superseded by {url}", pending.url);
            pending.token.cancel();
        }

        if let Some(asset) = self.scene.detach() {
            log::info!("Unloaded {}", asset.name);
            self.redraw.request();
        }

        log::info!("Loading {url}");
        let token = CancellationToken::new();
        let receiver = self.loader.load(&url, token.clone());

        self.state = AssetState::Loading { url: url.clone() };
        self.pending = Some(PendingLoad {
            url,
            receiver,
            token,
        });
    }

    /// Check on the pending load without blocking.
    ///
    /// Returns whether the load has finished and the asset is displayed. A failed load moves
    /// the viewer to [`AssetState::Unavailable`] and returns the error.
    pub fn poll_load(&mut self) -> Result<bool, Error> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };

        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::TryRecvError::Empty) => {
                self.pending = Some(pending);
                return Ok(false);
            }
            Err(oneshot::TryRecvError::Disconnected) => Err(oneshot::RecvError.into()),
        };

        self.complete_load(pending.url, result).map(|()| true)
    }

    /// Load an asset and display it.
    ///
    /// This is [`Viewer::request_load`] followed by waiting for the loader.
    pub async fn load(&mut self, url: impl Into<String>) -> Result<(), Error> {
        self.request_load(url);

        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let result = match pending.receiver.await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };

        self.complete_load(pending.url, result)
    }

    /// Reload the asset of the last failed load.
    pub fn retry(&mut self) -> Result<(), Error> {
        match &self.state {
            AssetState::Unavailable { url, .. } => {
                let url = url.clone();
                log::info!("Retrying {url}");
                self.request_load(url);
                Ok(())
            }
            _ => Err(Error::NothingToRetry),
        }
    }

    /// Validate, frame and attach a loaded asset.
    fn complete_load(&mut self, url: String, result: LoadResult) -> Result<(), Error> {
        let framed = result.and_then(|mut asset| {
            asset.validate()?;
            let camera_state = self.framer.frame(&url, &mut asset);
            Ok((asset, camera_state))
        });

        self.redraw.request();

        match framed {
            Ok((asset, camera_state)) => {
                log::info!(
                    "Displaying {url}, {} points in {} groups",
                    asset.point_count(),
                    asset.groups.len()
                );

                self.camera.apply_state(&camera_state);
                self.scene.attach(asset);
                self.state = AssetState::Displayed { url };
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {url}: {e}");

                self.state = AssetState::Unavailable {
                    url,
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Pick and highlight the point under the pointer.
    ///
    /// Returns the picked point, or [`None`] if nothing is under the pointer. A pick that does
    /// not belong to the asset means the asset is corrupted, it is unloaded and the viewer moves
    /// to [`AssetState::Unavailable`].
    pub fn click(&mut self, pointer: Vec2) -> Result<Option<PickResult>, Error> {
        let Some(asset) = self.scene.asset_mut() else {
            return Ok(None);
        };

        let Some(pick) = self
            .picker
            .pick(&self.camera, asset, pointer, self.viewport)
        else {
            return Ok(None);
        };

        if let Err(e) = self.highlighter.highlight(asset, &pick) {
            log::error!("Failed to highlight point {}: {e}", pick.index);

            self.scene.detach();
            self.state = AssetState::Unavailable {
                url: self.state.url().unwrap_or_default().to_string(),
                reason: e.to_string(),
            };
            self.redraw.request();
            return Err(e);
        }

        self.redraw.request();
        Ok(Some(pick))
    }

    /// Resize the viewport.
    pub fn resize(&mut self, size: UVec2) {
        log::debug!("Viewport resized to {size}");

        self.viewport = size;
        self.renderer.resize(size);
        self.redraw.request();
    }

    /// Orbit the camera around its target.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.camera.orbit_by(yaw, pitch);
        self.redraw.request();
    }

    /// Scale the camera distance to its target.
    pub fn zoom(&mut self, factor: f32) {
        self.camera.dolly_by(factor);
        self.redraw.request();
    }

    /// Pan the camera in the view plane.
    pub fn pan(&mut self, right: f32, up: f32) {
        self.camera.pan_by(right, up);
        self.redraw.request();
    }

    /// Restore the camera placement of the last load.
    pub fn reset_camera(&mut self) {
        if self.camera.reset() {
            self.redraw.request();
        }
    }

    /// Handle an input event.
    pub fn handle_event(&mut self, event: ViewerEvent) -> Result<(), Error> {
        match event {
            ViewerEvent::Click { pointer } => self.click(pointer).map(|_| ()),
            ViewerEvent::Resize { size } => {
                self.resize(size);
                Ok(())
            }
            ViewerEvent::Orbit { delta } => {
                self.orbit(delta.x, delta.y);
                Ok(())
            }
            ViewerEvent::Zoom { factor } => {
                self.zoom(factor);
                Ok(())
            }
            ViewerEvent::Pan { delta } => {
                self.pan(delta.x, delta.y);
                Ok(())
            }
            ViewerEvent::ResetCamera => {
                self.reset_camera();
                Ok(())
            }
            ViewerEvent::Load { url } => {
                self.request_load(url);
                Ok(())
            }
            ViewerEvent::Retry => self.retry(),
        }
    }

    /// Handle every event of the source, check on the pending load, then render the frame.
    ///
    /// Event and load errors are logged and reflected in [`Viewer::state`], only render
    /// errors are returned. Returns whether a frame was rendered.
    pub fn pump(&mut self, source: &mut impl EventSource) -> Result<bool, Error> {
        while let Some(event) = source.poll_event() {
            if let Err(e) = self.handle_event(event) {
                log::error!("Failed to handle event: {e}");
            }
        }

        if let Err(e) = self.poll_load() {
            log::debug!("Pending load finished with error: {e}");
        }

        self.frame()
    }

    /// Render if a redraw was requested since the last frame.
    ///
    /// Returns whether a frame was rendered.
    pub fn frame(&mut self) -> Result<bool, Error> {
        if !self.redraw.take() {
            return Ok(false);
        }

        self.scene.update_matrices();
        self.renderer.render(&self.scene, &self.camera)?;
        self.scene.clear_updates();

        Ok(true)
    }
}
