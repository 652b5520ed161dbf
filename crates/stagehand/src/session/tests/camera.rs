use approx::assert_relative_eq;

use super::session;
use crate::foundation::math::Vec3;

fn camera_at(session: &crate::session::Session) -> Vec3 {
    session.world_position("camera").unwrap()
}

#[test]
fn test_yaw_then_forward() {
    let mut session = session();
    session.camera_yaw(90.0);
    session.camera_move_forward(1.0);
    assert_relative_eq!(camera_at(&session), Vec3::new(1.0, 0.0, 5.0), epsilon = 1e-5);
}

#[test]
fn test_pitch_and_roll_use_local_axes() {
    let mut session = session();
    session.camera_pitch(90.0);
    session.camera_move_forward(1.0);
    assert_relative_eq!(camera_at(&session), Vec3::new(0.0, -1.0, 5.0), epsilon = 1e-5);
    
    let mut session = super::session();
    session.camera_roll(90.0);
    session.camera_move_right(1.0);
    assert_relative_eq!(camera_at(&session), Vec3::new(0.0, 1.0, 5.0), epsilon = 1e-5);
}

#[test]
fn test_yaw_keeps_horizon_level() {
    let mut session = session();
    session.camera_pitch(30.0);
    session.camera_yaw(90.0);
    session.camera_move_right(1.0);
    
    // Local X stays horizontal after a world-axis yaw
    let position = camera_at(&session);
    assert_relative_eq!(position.y, 0.0, epsilon = 1e-5);
}

#[test]
fn test_camera_moves_need_a_scene() {
    let mut session = crate::session::Session::new(
        Default::default(),
        Box::new(crate::render::HeadlessSurface::new(32, 32)),
    );
    session.camera_move_up(3.0);
    assert!(session.world_position("camera").is_none());
}

#[test]
fn test_up_moves_along_local_y() {
    let mut session = session();
    session.camera_move_up(2.0);
    session.camera_move_right(-1.0);
    assert_relative_eq!(camera_at(&session), Vec3::new(-1.0, 2.0, 5.0), epsilon = 1e-5);
}
