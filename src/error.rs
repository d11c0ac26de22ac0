use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("vertex count not found in PLY header")]
    PlyVertexCountNotFound,
    #[error("{0}")]
    PlyVertexCountParseFailed(#[from] std::num::ParseIntError),
    #[error("not a PLY file")]
    NotPly,
    #[error("PLY header not found")]
    PlyHeaderNotFound,
    #[error("PLY header declares {count} vertices but only {read} are present")]
    PlyVertexCountExceedsData { count: usize, read: usize },
    #[error("unsupported PLY format: {0}")]
    PlyUnsupportedFormat(String),
    #[error("{0}")]
    LoadOneShotReceive(#[from] oneshot::RecvError),
    #[error("loading of {url} was cancelled")]
    LoadCancelled { url: String },
    #[error("asset {0} not found")]
    AssetNotFound(String),
    #[error("asset {0} has no point groups")]
    EmptyAsset(String),
    #[error("point group {group} has {positions} positions but {colors} colors")]
    ColorCountMismatch {
        group: String,
        positions: usize,
        colors: usize,
    },
    #[error("point group index {group} out of range, asset has {count} groups")]
    GroupOutOfRange { group: usize, count: usize },
    #[error("point index {index} out of range, point group {group} has {count} points")]
    PointOutOfRange {
        group: String,
        index: usize,
        count: usize,
    },
    #[error("no failed load to retry")]
    NothingToRetry,
    #[error("render failed: {0}")]
    Render(String),
}
