use std::path::PathBuf;

use point_cloud_viewer::{
    AssetLoader, CancellationToken, Error, MemoryLoader, PlyFileLoader,
};

use crate::common::given;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "point-cloud-viewer-{name}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir");
    dir
}

#[test]
fn test_cancellation_token_cancel_should_be_seen_by_clones() {
    let token = CancellationToken::new();
    let clone = token.clone();

    assert!(!clone.is_cancelled());
    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn test_memory_loader_load_should_resolve_with_asset() {
    let loader = MemoryLoader::new().with_asset("cloud", given::four_points());

    let asset = pollster::block_on(loader.load("cloud", CancellationToken::new()))
        .expect("receive")
        .expect("asset");

    assert_eq!(asset, given::four_points());
}

#[test]
fn test_memory_loader_load_when_missing_should_return_not_found() {
    let loader = MemoryLoader::new();

    let result = pollster::block_on(loader.load("missing", CancellationToken::new()))
        .expect("receive");

    assert!(matches!(result, Err(Error::AssetNotFound(url)) if url == "missing"));
}

#[test]
fn test_memory_loader_load_when_cancelled_should_return_cancelled() {
    let loader = MemoryLoader::new().with_asset("cloud", given::four_points());
    let token = CancellationToken::new();
    token.cancel();

    let result = pollster::block_on(loader.load("cloud", token)).expect("receive");

    assert!(matches!(result, Err(Error::LoadCancelled { url }) if url == "cloud"));
}

#[test]
fn test_ply_file_loader_load_should_read_file_relative_to_root() {
    let dir = temp_dir("read");
    let mut file = std::fs::File::create(dir.join("cloud.ply")).expect("file");
    given::four_points().write_ply(&mut file).expect("write ply");
    drop(file);

    let loader = PlyFileLoader::new(&dir);
    let asset = pollster::block_on(loader.load("cloud.ply", CancellationToken::new()))
        .expect("receive")
        .expect("asset");

    assert_eq!(asset.name, "cloud");
    assert_eq!(asset.groups[0].positions, given::four_points().groups[0].positions);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_ply_file_loader_load_when_file_missing_should_return_io_error() {
    let loader = PlyFileLoader::new(temp_dir("missing"));

    let result = pollster::block_on(loader.load("missing.ply", CancellationToken::new()))
        .expect("receive");

    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_ply_file_loader_load_when_cancelled_should_not_send() {
    let loader = PlyFileLoader::new(temp_dir("cancelled"));
    let token = CancellationToken::new();
    token.cancel();

    let result = pollster::block_on(loader.load("cloud.ply", token));

    assert!(result.is_err());
}
