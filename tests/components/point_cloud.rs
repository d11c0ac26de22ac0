use std::io::Cursor;

use point_cloud_viewer::{
    DEFAULT_POINT_COLOR, Error, PointCloudAsset, PointGroup, PointGroupUpdate, glam::*,
};

use crate::common::given;

#[test]
fn test_point_group_new_should_give_every_point_the_default_color() {
    let group = PointGroup::new("group", vec![Vec3::ZERO, Vec3::ONE, Vec3::X]);

    assert_eq!(group.len(), 3);
    assert_eq!(group.colors, vec![DEFAULT_POINT_COLOR; 3]);
    assert_eq!(DEFAULT_POINT_COLOR, U8Vec4::new(255, 255, 255, 255));
    assert!(group.validate().is_ok());
}

#[test]
fn test_point_group_validate_when_counts_differ_should_return_error() {
    let group = PointGroup::with_colors(
        "mismatched",
        vec![Vec3::ZERO, Vec3::ONE],
        vec![DEFAULT_POINT_COLOR],
    );

    assert!(matches!(
        group.validate(),
        Err(Error::ColorCountMismatch {
            positions: 2,
            colors: 1,
            ..
        })
    ));
}

#[test]
fn test_point_group_set_color_when_index_out_of_range_should_return_error() {
    let mut group = PointGroup::new("group", vec![Vec3::ZERO]);
    group.clear_updates();

    assert!(matches!(
        group.set_color(1, U8Vec4::ZERO),
        Err(Error::PointOutOfRange {
            index: 1,
            count: 1,
            ..
        })
    ));
    assert!(group.updates().is_empty());
}

#[test]
fn test_point_group_set_color_should_mark_colors_updated() {
    let mut group = PointGroup::new("group", vec![Vec3::ZERO, Vec3::ONE]);
    group.clear_updates();

    group.set_color(0, U8Vec4::new(1, 2, 3, 4)).expect("set color");

    assert_eq!(group.colors[0], U8Vec4::new(1, 2, 3, 4));
    assert_eq!(group.updates(), PointGroupUpdate::COLORS);
}

#[test]
fn test_point_cloud_asset_validate_when_no_groups_should_return_error() {
    let asset = PointCloudAsset::new("empty", Vec::new());

    assert!(matches!(asset.validate(), Err(Error::EmptyAsset(name)) if name == "empty"));
}

#[test]
fn test_point_cloud_asset_recenter_should_center_bounds_on_x_and_y() {
    let mut asset = PointCloudAsset::new(
        "offset",
        vec![
            PointGroup::new("a", vec![vec3(10.0, 20.0, 4.0), vec3(12.0, 21.0, 5.0)]),
            PointGroup::new("b", vec![vec3(14.0, 26.0, 6.0)]),
        ],
    );
    let center = asset.bounding_volume().expect("bounds").center();

    asset.recenter(center);

    let recentered = asset.bounding_volume().expect("bounds").center();
    assert!(recentered.x.abs() < 1e-5);
    assert!(recentered.y.abs() < 1e-5);
    assert!((recentered.z - 2.0 * center.z).abs() < 1e-5);
    assert!(
        asset
            .groups
            .iter()
            .all(|g| g.updates().contains(PointGroupUpdate::POSITIONS))
    );
}

#[test]
fn test_point_cloud_asset_freeze_transforms_should_compute_matrix_once() {
    let mut asset = given::four_points();
    asset.groups[0].pos = vec3(1.0, 2.0, 3.0);

    asset.freeze_transforms();

    let group = &asset.groups[0];
    assert!(!group.matrix_auto_update);
    assert_eq!(group.world_position(1), Some(vec3(2.0, 2.0, 3.0)));
    assert_eq!(group.world_position(4), None);
}

#[test]
fn test_point_cloud_asset_point_count_should_sum_groups() {
    let mut asset = given::four_points();
    asset.groups.push(PointGroup::new("more", vec![Vec3::ONE; 3]));

    assert_eq!(asset.point_count(), 7);
}

#[test]
fn test_point_cloud_asset_write_ply_then_read_ply_should_keep_points_and_colors() {
    let mut asset = given::four_points();
    asset.groups[0]
        .set_color(2, U8Vec4::new(255, 0, 0, 255))
        .expect("set color");

    let mut bytes = Vec::new();
    asset.write_ply(&mut bytes).expect("write ply");
    let read = PointCloudAsset::read_ply(&mut Cursor::new(bytes), "read").expect("read ply");

    assert_eq!(read.name, "read");
    assert_eq!(read.groups.len(), 1);
    assert_eq!(read.groups[0].positions, asset.groups[0].positions);
    assert_eq!(read.groups[0].colors, asset.groups[0].colors);
}

#[test]
fn test_point_cloud_asset_read_ply_when_not_ply_should_return_error() {
    let result = PointCloudAsset::read_ply(&mut Cursor::new(b"obj\n".to_vec()), "bad");

    assert!(matches!(result, Err(Error::NotPly)));
}

#[test]
fn test_point_cloud_asset_read_ply_when_ascii_should_return_unsupported_format() {
    let header = b"ply\nformat ascii 1.0\nelement vertex 1\nend_header\n".to_vec();

    let result = PointCloudAsset::read_ply(&mut Cursor::new(header), "ascii");

    assert!(matches!(result, Err(Error::PlyUnsupportedFormat(format)) if format == "ascii 1.0"));
}

#[test]
fn test_point_cloud_asset_read_ply_when_header_unterminated_should_return_error() {
    let header = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\n".to_vec();

    let result = PointCloudAsset::read_ply(&mut Cursor::new(header), "unterminated");

    assert!(matches!(result, Err(Error::PlyHeaderNotFound)));
}

#[test]
fn test_point_cloud_asset_read_ply_when_vertex_count_missing_should_return_error() {
    let header = b"ply\nformat binary_little_endian 1.0\nelement vertex\nend_header\n".to_vec();

    let result = PointCloudAsset::read_ply(&mut Cursor::new(header), "no count");

    assert!(matches!(result, Err(Error::PlyVertexCountNotFound)));
}

#[test]
fn test_point_cloud_asset_read_ply_when_properties_differ_should_return_unsupported_format() {
    let header = b"ply\n\
        format binary_little_endian 1.0\n\
        element vertex 1\n\
        property float x\n\
        property float y\n\
        property float z\n\
        end_header\n"
        .to_vec();

    let result = PointCloudAsset::read_ply(&mut Cursor::new(header), "no colors");

    assert!(matches!(result, Err(Error::PlyUnsupportedFormat(_))));
}

#[test]
fn test_point_cloud_asset_read_ply_when_truncated_should_return_vertex_count_error() {
    let mut bytes = Vec::new();
    given::four_points().write_ply(&mut bytes).expect("write ply");
    bytes.truncate(bytes.len() - 4);

    let result = PointCloudAsset::read_ply(&mut Cursor::new(bytes), "truncated");

    assert!(matches!(
        result,
        Err(Error::PlyVertexCountExceedsData { count: 4, read: 3 })
    ));
}

#[test]
fn test_point_cloud_asset_read_ply_when_vertex_count_huge_should_return_error() {
    let mut bytes = b"ply\n\
        format binary_little_endian 1.0\n\
        element vertex 4000000000000000000\n\
        property float x\n\
        property float y\n\
        property float z\n\
        property uchar red\n\
        property uchar green\n\
        property uchar blue\n\
        property uchar alpha\n\
        end_header\n"
        .to_vec();
    bytes.extend_from_slice(bytemuck::bytes_of(&[1.0f32, 2.0, 3.0]));
    bytes.extend_from_slice(&[255, 0, 0, 255]);

    let result = PointCloudAsset::read_ply(&mut Cursor::new(bytes), "huge");

    assert!(matches!(
        result,
        Err(Error::PlyVertexCountExceedsData {
            count: 4_000_000_000_000_000_000,
            read: 1,
        })
    ));
}
