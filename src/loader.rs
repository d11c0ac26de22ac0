use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{Error, PointCloudAsset};

/// The result of loading an asset.
pub type LoadResult = Result<PointCloudAsset, Error>;

/// A shared flag telling a loader its result is no longer wanted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a new token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check if the token is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fetches and parses point cloud assets.
pub trait AssetLoader {
    /// Start loading the asset at `url`.
    ///
    /// The result is delivered through the returned receiver without blocking the caller. Once
    /// `token` is cancelled the loader may drop the sender without sending anything.
    fn load(&self, url: &str, token: CancellationToken) -> oneshot::Receiver<LoadResult>;
}

/// A loader serving assets from memory, resolving immediately.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    assets: HashMap<String, PointCloudAsset>,
}

impl MemoryLoader {
    /// Create a new empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset served at `url`.
    pub fn with_asset(mut self, url: impl Into<String>, asset: PointCloudAsset) -> Self {
        self.insert(url, asset);
        self
    }

    /// Add an asset served at `url`, replacing any previous one.
    pub fn insert(&mut self, url: impl Into<String>, asset: PointCloudAsset) {
        self.assets.insert(url.into(), asset);
    }
}

impl AssetLoader for MemoryLoader {
    fn load(&self, url: &str, token: CancellationToken) -> oneshot::Receiver<LoadResult> {
        let (tx, rx) = oneshot::channel();

        let result = if token.is_cancelled() {
            Err(Error::LoadCancelled {
                url: url.to_string(),
            })
        } else {
            self.assets
                .get(url)
                .cloned()
                .ok_or_else(|| Error::AssetNotFound(url.to_string()))
        };

        if let Err(e) = tx.send(result) {
            log::error!("Error occurred while sending asset {url}: {e:?}");
        }

        rx
    }
}

/// A loader reading PLY point clouds from disk on a background thread.
///
/// Urls are resolved relative to [`PlyFileLoader::root`].
#[derive(Debug, Clone)]
pub struct PlyFileLoader {
    pub root: PathBuf,
}

impl PlyFileLoader {
    /// Create a new loader.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the PLY file, named after its file stem.
    pub fn read(path: &Path) -> LoadResult {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut reader = BufReader::new(File::open(path)?);
        PointCloudAsset::read_ply(&mut reader, name)
    }
}

impl AssetLoader for PlyFileLoader {
    fn load(&self, url: &str, token: CancellationToken) -> oneshot::Receiver<LoadResult> {
        let (tx, rx) = oneshot::channel();
        let path = self.root.join(url);
        let url = url.to_string();

        log::debug!("Loading {}", path.display());
        let spawned = std::thread::Builder::new()
            .name(format!("load {url}"))
            .spawn(move || {
                if token.is_cancelled() {
                    log::debug!("Skipped cancelled load of {url}");
                    return;
                }

                let result = Self::read(&path);

                if token.is_cancelled() {
                    log::debug!("Dropped cancelled load of {url}");
                    return;
                }

                if let Err(e) = tx.send(result) {
                    log::error!("Error occurred while sending asset {url}: {e:?}");
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn loader thread: {e}");
        }

        rx
    }
}
