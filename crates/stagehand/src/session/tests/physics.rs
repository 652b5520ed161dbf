use approx::assert_relative_eq;

use super::{cube, number, session};
use crate::properties::Reading;
use crate::scene::ShapeKind;

#[test]
fn test_gravity_accumulates() {
    let mut session = session();
    assert_eq!(session.get_gravity(), Reading::Text("0,0,0".into()));
    
    session.enable_physics(true);
    assert_eq!(session.get_gravity(), Reading::Text("0,-9.82,0".into()));
    
    session.set_gravity(0.0, -10.0, 0.0);
    session.change_gravity(0.0, -1.0, 0.0);
    assert_eq!(session.get_gravity(), Reading::Text("0,-11,0".into()));
    
    session.enable_physics(false);
    session.set_gravity(1.0, 1.0, 1.0);
    assert_eq!(session.get_gravity(), Reading::Text("0,0,0".into()));
    session.enable_physics(true);
    assert_eq!(session.get_gravity(), Reading::Text("0,-11,0".into()));
}

#[test]
fn test_static_body_has_zero_mass() {
    let mut session = session();
    session.enable_physics(true);
    cube(&mut session, "floor");
    
    session.add_body("floor", true, 50.0, "floor");
    let binding = session.physics().binding("floor").copied().unwrap();
    assert_eq!(binding.mass, 0.0);
    assert_eq!(session.physics().world().unwrap().mass(binding.body), Some(0.0));
}

#[test]
fn test_bind_requires_enabled_physics_and_mesh() {
    let mut session = session();
    cube(&mut session, "box");
    
    session.add_body("box", false, 1.0, "box");
    assert!(!session.physics().is_bound("box"));
    
    session.enable_physics(true);
    session.add_body("box", false, 1.0, "missing");
    assert!(!session.physics().is_bound("box"));
}

#[test]
fn test_bodies_drive_meshes_each_tick() {
    let mut session = session();
    session.enable_physics(true);
    cube(&mut session, "crate");
    session.set_property("crate", "position.y", "10");
    session.add_body("crate", false, 1.0, "crate");
    
    for _ in 0..20 {
        session.tick();
    }
    assert!(number(&mut session, "crate", "position.y") < 10.0);
    
    let paused = number(&mut session, "crate", "position.y");
    session.enable_physics(false);
    session.tick();
    assert_relative_eq!(number(&mut session, "crate", "position.y"), paused);
}

#[test]
fn test_attach_tears_down_physics() {
    let mut session = session();
    session.enable_physics(true);
    cube(&mut session, "x");
    cube(&mut session, "y");
    session.add_body("x", false, 1.0, "x");
    let body = session.physics().binding("x").unwrap().body;
    
    session.attach("x", "y", 1.0);
    assert!(!session.physics().is_bound("x"));
    assert!(!session.physics().world().unwrap().contains(body));
    
    session.set_velocity("x", 5.0, 0.0, 0.0);
    session.tick();
    assert_relative_eq!(number(&mut session, "x", "position.z"), -1.0, epsilon = 1e-6);
}

#[test]
fn test_velocity_moves_body() {
    let mut session = session();
    session.enable_physics(true);
    session.set_gravity(0.0, 0.0, 0.0);
    session.create_primitive("puck", ShapeKind::Cylinder, "#222222");
    session.add_body("puck", false, 1.0, "puck");
    
    session.set_velocity("puck", 6.0, 0.0, 0.0);
    for _ in 0..60 {
        session.tick();
    }
    assert_relative_eq!(number(&mut session, "puck", "position.x"), 6.0, epsilon = 0.1);
}
