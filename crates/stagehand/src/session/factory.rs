//! Object factories and deferred assets
//!
//! Primitives and lights are created immediately and registered without
//! being added to the scene. Models and skyboxes are requested from the
//! fetcher and take effect when [`Session::pump_assets`] applies their
//! completion.

use super::{color_arg, FlareEntry, Session};
use crate::assets::{AssetPayload, AssetRequest, ModelData};
use crate::scene::{
    Background, Color, Flare, FlareElement, Geometry, Light, LightKind, Material, MaterialSet, Mesh, Node, NodeKey,
    ObjectKind, ShapeKind, TextureRef, TextureSlot,
};

/// Flares draw after everything else
const FLARE_RENDER_ORDER: i32 = 999;

impl Session {
    /// Register a primitive mesh as `id`
    pub fn create_primitive(&mut self, id: &str, shape: ShapeKind, color: &str) {
        if !self.engine_loaded {
            return;
        }
        let material = Material::standard(color_arg(color));
        let mesh = Mesh {
            geometry: Geometry::primitive(shape),
            materials: MaterialSet::uniform(material, shape.material_slots()),
        };
        let key = self.graph.insert(Node::new(ObjectKind::Mesh(mesh)).with_name(id));
        self.registry.register(id, key);
        log::debug!("Created {:?} '{}'", shape, id);
    }
    
    /// Register a light as `id`. Point lights may bring a lens flare,
    /// which goes straight into the scene.
    pub fn create_light(&mut self, id: &str, kind: LightKind, color: &str, intensity: f32, wants_flare: bool) {
        if !self.engine_loaded {
            return;
        }
        let light = Light::new(kind, color_arg(color), intensity);
        let tint = light.color;
        let key = self.graph.insert(Node::new(ObjectKind::Light(light)).with_name(id));
        self.registry.register(id, key);
        
        if wants_flare && kind == LightKind::Point {
            self.create_flare(key, tint);
        }
        log::debug!("Created {:?} light '{}'", kind, id);
    }
    
    fn create_flare(&mut self, light: NodeKey, tint: Color) {
        let Some(stage) = self.stage else {
            log::debug!("Lens flare skipped: no scene");
            return;
        };
        
        let elements = self
            .config
            .flare
            .elements
            .iter()
            .map(|element| FlareElement {
                texture: element.texture.clone(),
                size: element.size,
                distance: element.distance,
                color: element.tinted.then_some(tint),
            })
            .collect();
        
        let mut node = Node::new(ObjectKind::Flare(Flare { elements }));
        node.frustum_culled = false;
        node.render_order = FLARE_RENDER_ORDER;
        let flare = self.graph.insert(node);
        self.graph.add(stage.root, flare);
        self.flares.push(FlareEntry { light, flare });
    }
    
    /// Request an OBJ model (with optional MTL) to be registered as `id`
    pub fn load_model(&mut self, id: &str, model_url: &str, material_url: Option<&str>) {
        if !self.engine_loaded {
            return;
        }
        self.fetcher.request(AssetRequest::Model {
            id: id.to_string(),
            model_url: model_url.to_string(),
            material_url: material_url.filter(|url| !url.is_empty()).map(str::to_string),
        });
    }
    
    /// Request an equirectangular skybox
    pub fn set_skybox(&mut self, url: &str) {
        if self.stage.is_none() {
            return;
        }
        self.fetcher.request(AssetRequest::Skybox { url: url.to_string() });
    }
    
    /// Apply a texture to every material of every mesh under `id`.
    /// An empty `url` clears the slot.
    pub fn set_texture(&mut self, id: &str, slot: TextureSlot, url: &str) {
        let Some(key) = self.resolve(id) else { return };
        for node in self.graph.descendants(key) {
            if let Some(ObjectKind::Mesh(mesh)) = self.graph.get_mut(node).map(|n| &mut n.kind) {
                for material in mesh.materials.iter_mut() {
                    material.apply_texture(slot, url);
                }
            }
        }
    }
    
    /// Apply a texture to one material of `id` (or of its first child mesh)
    pub fn set_texture_at_index(&mut self, id: &str, index: usize, slot: TextureSlot, url: &str) {
        let Some(key) = self.resolve(id) else { return };
        let is_mesh = |k: &NodeKey| matches!(self.graph.get(*k).map(|n| &n.kind), Some(ObjectKind::Mesh(_)));
        let target = if is_mesh(&key) {
            Some(key)
        } else {
            self.graph.children(key).iter().find(|k| is_mesh(*k)).copied()
        };
        
        let Some(target) = target else { return };
        if let Some(ObjectKind::Mesh(mesh)) = self.graph.get_mut(target).map(|n| &mut n.kind) {
            if let Some(material) = mesh.materials.get_mut(index) {
                material.apply_texture(slot, url);
            }
        }
    }
    
    /// Apply every finished asset request
    pub fn pump_assets(&mut self) {
        for completion in self.fetcher.poll() {
            match (completion.request, completion.result) {
                (AssetRequest::Model { id, .. }, Ok(AssetPayload::Model(model))) => self.place_model(&id, model),
                (AssetRequest::Skybox { .. }, Ok(AssetPayload::Texture(texture))) => self.apply_skybox(texture),
                (request, Ok(_)) => log::warn!("Unexpected payload for '{}'", request.url()),
                (request, Err(e)) => log::warn!("Failed to load '{}': {}", request.url(), e),
            }
        }
    }
    
    fn place_model(&mut self, id: &str, model: ModelData) {
        let group = self.graph.insert(Node::new(ObjectKind::Group).with_name(id));
        for part in model.parts {
            let mesh = Mesh {
                geometry: Geometry { shape: None, bounds: part.bounds },
                materials: MaterialSet::Single(part.material),
            };
            let key = self.graph.insert(Node::new(ObjectKind::Mesh(mesh)).with_name(part.name));
            self.graph.add(group, key);
        }
        self.registry.register(id, group);
        
        if let Some(stage) = self.stage {
            self.graph.add(stage.root, group);
        }
        self.graph.update_world_matrices(group);
        log::info!("Model '{}' loaded ({} meshes)", id, self.graph.children(group).len());
    }
    
    fn apply_skybox(&mut self, texture: TextureRef) {
        let Some(stage) = self.stage else { return };
        if let Some(ObjectKind::Scene(scene)) = self.graph.get_mut(stage.root).map(|n| &mut n.kind) {
            scene.environment = Some(texture.clone());
            scene.background = Background::Skybox(texture);
        }
        self.draw(stage);
    }
}
