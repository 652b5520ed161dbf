use approx::assert_relative_eq;

use super::{cube, number, session};
use crate::foundation::math::Vec3;
use crate::scene::ShapeKind;

#[test]
fn test_detach_preserves_world_position() {
    let mut session = session();
    cube(&mut session, "b");
    session.create_primitive("a", ShapeKind::Sphere, "#ffffff");
    session.set_property("b", "position.x", "5");
    
    session.attach("a", "b", 0.0);
    assert_relative_eq!(session.world_position("a").unwrap(), Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-5);
    
    session.detach("a");
    assert_relative_eq!(number(&mut session, "a", "position.x"), 5.0, epsilon = 1e-5);
    let root = session.stage().unwrap().root;
    assert_eq!(session.graph().parent(session.resolve("a").unwrap()), Some(root));
}

#[test]
fn test_detach_keeps_rotated_pose() {
    let mut session = session();
    cube(&mut session, "b");
    session.create_primitive("a", ShapeKind::Sphere, "#ffffff");
    session.set_property("b", "position.x", "5");
    session.set_property("b", "rotation.y", "45");
    
    session.attach("a", "b", 2.0);
    let before = session.world_position("a").unwrap();
    let half_diagonal = 2.0 * std::f32::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(before, Vec3::new(5.0 - half_diagonal, 0.0, -half_diagonal), epsilon = 1e-4);
    
    session.detach("a");
    assert_relative_eq!(session.world_position("a").unwrap(), before, epsilon = 1e-4);
    assert_relative_eq!(number(&mut session, "a", "rotation.y"), 45.0, epsilon = 1e-3);
}

#[test]
fn test_attach_resets_local_pose() {
    let mut session = session();
    cube(&mut session, "parent");
    cube(&mut session, "child");
    session.set_property("child", "rotation.z", "30");
    
    session.attach("child", "parent", 3.0);
    assert_relative_eq!(number(&mut session, "child", "position.z"), -3.0, epsilon = 1e-6);
    assert_relative_eq!(number(&mut session, "child", "rotation.z"), 0.0, epsilon = 1e-6);
}

#[test]
fn test_attach_refuses_cycles_and_unknown_ids() {
    let mut session = session();
    cube(&mut session, "outer");
    cube(&mut session, "inner");
    session.attach("inner", "outer", 1.0);
    
    session.attach("outer", "inner", 1.0);
    let outer = session.resolve("outer").unwrap();
    assert_eq!(session.graph().parent(outer), session.stage().map(|s| s.root));
    
    session.attach("ghost", "outer", 1.0);
    session.attach("inner", "ghost", 1.0);
    assert_eq!(session.graph().parent(session.resolve("inner").unwrap()), Some(outer));
}

#[test]
fn test_camera_attachment_is_stable_over_ticks() {
    let mut session = session();
    cube(&mut session, "hud");
    session.attach("hud", "camera", 2.0);
    assert_eq!(session.camera_attachments().len(), 1);
    assert_relative_eq!(session.camera_attachments()[0].distance, -2.0);
    
    session.camera_yaw(30.0);
    session.camera_move_right(1.5);
    
    let camera = session.resolve("camera").unwrap();
    for ticks in [1, 4, 10] {
        for _ in 0..ticks {
            session.tick();
        }
        let node = session.graph().get(camera).unwrap();
        let expected = node.position + node.quaternion() * Vec3::new(0.0, 0.0, -2.0);
        assert_relative_eq!(session.world_position("hud").unwrap(), expected, epsilon = 1e-4);
    }
}

#[test]
fn test_camera_attachment_lives_under_root() {
    let mut session = session();
    cube(&mut session, "parent");
    cube(&mut session, "hud");
    session.attach("hud", "parent", 1.0);
    session.attach("hud", "camera", 1.0);
    session.attach("hud", "camera", 3.0);
    
    let stage = session.stage().unwrap();
    let hud = session.resolve("hud").unwrap();
    assert_eq!(session.graph().parent(hud), Some(stage.root));
    assert_eq!(session.camera_attachments().len(), 1);
    
    session.tick();
    assert_relative_eq!(session.world_position("hud").unwrap(), Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
    
    session.detach("hud");
    assert!(session.camera_attachments().is_empty());
    session.camera_move_up(4.0);
    session.tick();
    assert_relative_eq!(session.world_position("hud").unwrap(), Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
}

#[test]
fn test_look_at_uses_world_position() {
    let mut session = session();
    cube(&mut session, "eye");
    cube(&mut session, "anchor");
    session.create_primitive("target", ShapeKind::Sphere, "#ffffff");
    session.set_property("anchor", "position.x", "4");
    session.attach("target", "anchor", 0.0);
    
    session.look_at("eye", "target");
    let eye = session.resolve("eye").unwrap();
    let facing = session.graph().get(eye).unwrap().quaternion() * Vec3::z();
    assert_relative_eq!(facing, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_detach_under_mirrored_parent() {
    let mut session = session();
    cube(&mut session, "mirror");
    session.create_primitive("a", ShapeKind::Sphere, "#ffffff");
    session.set_property("mirror", "scale", "{\"x\": -1}");
    session.set_property("mirror", "rotation.y", "30");
    session.set_property("mirror", "position.x", "2");
    
    session.attach("a", "mirror", 1.5);
    session.set_property("a", "rotation.z", "20");
    session.set_property("a", "scale.y", "2");
    
    let a = session.resolve("a").unwrap();
    let before = session.graph().world_matrix(a);
    assert!(before.fixed_view::<3, 3>(0, 0).into_owned().determinant() < 0.0);
    
    session.detach("a");
    assert_eq!(session.graph().parent(a), session.stage().map(|s| s.root));
    assert_relative_eq!(session.graph().world_matrix(a), before, epsilon = 1e-4);
}
