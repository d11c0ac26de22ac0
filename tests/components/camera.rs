use point_cloud_viewer::{Camera, CameraState, CameraTrait, glam::*};

use crate::common::given;

fn framed_camera() -> Camera {
    let mut camera = given::camera();
    camera.apply_state(&CameraState {
        pos: vec3(0.0, -60.0, 0.0),
        target: vec3(0.0, 0.0, -30.0),
        far: 1000.0,
        max_distance: 100.0,
    });
    camera
}

#[test]
fn test_camera_apply_state_should_set_pose_far_and_max_distance() {
    let camera = framed_camera();

    assert_eq!(camera.pos, vec3(0.0, -60.0, 0.0));
    assert_eq!(camera.target, vec3(0.0, 0.0, -30.0));
    assert_eq!(camera.z.end, 1000.0);
    assert_eq!(camera.max_distance, 100.0);
}

#[test]
fn test_camera_reset_when_moved_should_restore_applied_state() {
    let mut camera = framed_camera();

    camera.orbit_by(1.0, 0.3);
    camera.pan_by(5.0, -2.0);
    assert_ne!(camera.pos, vec3(0.0, -60.0, 0.0));

    assert!(camera.reset());
    assert_eq!(camera.pos, vec3(0.0, -60.0, 0.0));
    assert_eq!(camera.target, vec3(0.0, 0.0, -30.0));
}

#[test]
fn test_camera_reset_when_never_saved_should_return_false() {
    let mut camera = given::camera();
    let pos = camera.pos;

    assert!(!camera.reset());
    assert_eq!(camera.pos, pos);
}

#[test]
fn test_camera_orbit_by_should_keep_distance_to_target() {
    let mut camera = framed_camera();
    let distance = camera.distance();

    camera.orbit_by(0.7, -0.2);

    assert!((camera.distance() - distance).abs() < 1e-3);
    assert_eq!(camera.target, vec3(0.0, 0.0, -30.0));
}

#[test]
fn test_camera_orbit_by_when_pitch_exceeds_limit_should_stay_below_pole() {
    let mut camera = framed_camera();

    camera.orbit_by(0.0, 10.0);

    let offset = camera.pos - camera.target;
    assert!(offset.z < offset.length());
    assert!(offset.truncate().length() > 0.0);
}

#[test]
fn test_camera_dolly_by_should_clamp_to_max_distance() {
    let mut camera = framed_camera();

    camera.dolly_by(1000.0);

    assert!((camera.distance() - 100.0).abs() < 1e-3);
}

#[test]
fn test_camera_pan_by_should_move_pos_and_target_together() {
    let mut camera = framed_camera();
    let offset = camera.pos - camera.target;

    camera.pan_by(3.0, 1.0);

    assert!((camera.pos - camera.target - offset).length() < 1e-4);
    assert_ne!(camera.target, vec3(0.0, 0.0, -30.0));
}

#[test]
fn test_camera_view_should_place_target_in_front_of_camera() {
    let camera = given::camera();

    let target = camera.view().transform_point3(camera.target);

    assert!(target.x.abs() < 1e-4);
    assert!(target.y.abs() < 1e-4);
    assert!(target.z < 0.0);
}
