use approx::assert_relative_eq;

use super::{cube, headless, last_frame, number, queue, session};
use crate::assets::{AssetError, AssetPayload, ModelData, ModelPart};
use crate::core::config::SessionConfig;
use crate::foundation::math::Vec3;
use crate::properties::Reading;
use crate::render::HeadlessSurface;
use crate::scene::{Background, Color, Material, ShapeKind, TextureMapping, TextureRef, TextureSlot, AABB};
use crate::session::Session;

fn ship() -> AssetPayload {
    let part = |name: &str, x: f32| ModelPart {
        name: name.to_string(),
        bounds: AABB::new(Vec3::new(x - 1.0, -1.0, -1.0), Vec3::new(x + 1.0, 1.0, 1.0)),
        material: Material::standard(Color::from_hex(0x3366ff)),
    };
    AssetPayload::Model(ModelData { parts: vec![part("hull", 0.0), part("wing", 2.0)] })
}

#[test]
fn test_model_arrives_later() {
    let mut session = session();
    session.load_model("ship", "ship.obj", Some("ship.mtl"));
    assert_eq!(queue(&mut session).pending().len(), 1);
    
    // Not resolvable until the load completes
    session.set_property("ship", "position.x", "3");
    session.add_to_scene("ship");
    assert!(session.resolve("ship").is_none());
    assert_eq!(session.get_property("ship", "position.x"), Reading::Empty);
    
    assert!(queue(&mut session).complete("ship.obj", Ok(ship())));
    session.pump_assets();
    
    let group = session.resolve("ship").unwrap();
    assert_eq!(session.graph().children(group).len(), 2);
    assert_eq!(session.graph().parent(group), session.stage().map(|s| s.root));
    assert_eq!(number(&mut session, "ship", "position.x"), 0.0);
    
    session.set_property("ship", "position.x", "3");
    session.tick();
    assert_eq!(last_frame(&session).unwrap().mesh_count(), 2);
    assert_relative_eq!(session.world_position("ship").unwrap(), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_failed_model_stays_unresolved() {
    let mut session = session();
    session.load_model("ghost", "ghost.obj", None);
    queue(&mut session).complete("ghost.obj", Err(AssetError::NotFound("ghost.obj".into())));
    session.pump_assets();
    
    assert!(session.resolve("ghost").is_none());
    session.tick();
    assert!(last_frame(&session).unwrap().drawables.is_empty());
}

#[test]
fn test_skybox_sets_background_and_draws() {
    let mut session = session();
    session.set_skybox("sky.jpg");
    assert_eq!(headless(&session).presented(), 0);
    
    let texture = TextureRef { url: "sky.jpg".into(), mapping: TextureMapping::EquirectangularReflection };
    queue(&mut session).complete("sky.jpg", Ok(AssetPayload::Texture(texture.clone())));
    session.pump_assets();
    
    assert_eq!(headless(&session).presented(), 1);
    assert_eq!(last_frame(&session).unwrap().background, Background::Skybox(texture));
}

#[test]
fn test_factories_wait_for_engine() {
    let mut session = Session::new(SessionConfig::default(), Box::new(HeadlessSurface::new(64, 64)));
    session.create_primitive("early", ShapeKind::Sphere, "#ffffff");
    session.load_model("early_model", "model.obj", None);
    assert!(session.resolve("early").is_none());
    
    session.initialize_engine();
    session.create_primitive("late", ShapeKind::Sphere, "#ffffff");
    assert!(session.resolve("late").is_some());
}

#[test]
fn test_texture_applies_to_every_face() {
    let mut session = session();
    cube(&mut session, "crate");
    session.set_texture("crate", TextureSlot::Skin, "wood.png");
    
    for face in 0..6 {
        let path = format!("material.{}.map", face);
        assert_eq!(session.get_property("crate", &path), Reading::Text("wood.png".into()));
    }
    assert_eq!(session.get_property("crate", "material.color"), Reading::Text("#ffffff".into()));
}

#[test]
fn test_texture_at_index_touches_one_face() {
    let mut session = session();
    cube(&mut session, "dice");
    session.set_texture_at_index("dice", 2, TextureSlot::Bumps, "pips.png");
    
    assert_eq!(session.get_property("dice", "material.2.normalMap"), Reading::Text("pips.png".into()));
    assert_eq!(session.get_property("dice", "material.1.normalMap"), Reading::Empty);
    
    // Out of range is ignored
    session.set_texture_at_index("dice", 9, TextureSlot::Bumps, "pips.png");
    assert_eq!(session.get_property("dice", "material.length"), Reading::Number(6.0));
}

#[test]
fn test_texture_at_index_reaches_into_models() {
    let mut session = session();
    session.load_model("ship", "ship.obj", None);
    queue(&mut session).complete("ship.obj", Ok(ship()));
    session.pump_assets();
    
    session.set_texture_at_index("ship", 0, TextureSlot::Roughness, "rough.png");
    let group = session.resolve("ship").unwrap();
    let hull = session.graph().children(group)[0];
    let crate::scene::ObjectKind::Mesh(mesh) = &session.graph().get(hull).unwrap().kind else {
        panic!("model parts are meshes");
    };
    let crate::scene::MaterialSet::Single(material) = &mesh.materials else {
        panic!("model parts carry one material");
    };
    assert_eq!(material.roughness_map.as_ref().map(|t| t.url.as_str()), Some("rough.png"));
}
