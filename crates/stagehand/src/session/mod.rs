//! # Session
//!
//! The explicit context every command runs against. A session owns the
//! scene graph, the id registry, the physics layer, the flare and
//! camera-attachment lists, the render surface and the asset fetcher.
//!
//! ## Error policy
//!
//! Session operations never fail. An unknown id, a scene that has not been
//! initialised, physics being disabled or an unresolved property path all
//! turn the operation into a no-op, so a command stream racing deferred
//! asset loads never stalls.
//!
//! ## Layout
//!
//! - `composition`: attach/detach, add/remove, look-at
//! - `frame`: the per-tick synchronisation and draw
//! - `lifecycle`: scene clear
//! - `factory`: primitives, lights, models, textures, skybox
//! - `camera`: camera rotation and movement
//! - `physics`: physics commands

mod composition;
mod frame;
mod lifecycle;
mod factory;
mod camera;
mod physics;

#[cfg(test)]
mod tests;

use crate::assets::{AssetFetcher, LocalFileFetcher};
use crate::core::config::SessionConfig;
use crate::foundation::math::Vec3;
use crate::physics::PhysicsLayer;
use crate::properties::{Attr, PropertyAccessor, Reading, Value};
use crate::render::{RenderSurface, SurfaceSettings};
use crate::scene::{
    Background, Camera, Color, Node, NodeKey, ObjectKind, ObjectRegistry, SceneGraph, SceneRoot,
};

/// Id the scene root is registered under
pub const SCENE_ID: &str = "scene";
/// Id the camera is registered under
pub const CAMERA_ID: &str = "camera";

/// Root and camera created by scene initialisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Scene root
    pub root: NodeKey,
    /// Active camera; not a child of the root
    pub camera: NodeKey,
}

/// A point light's lens flare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlareEntry {
    /// Light being tracked
    pub light: NodeKey,
    /// Flare node under the root
    pub flare: NodeKey,
}

/// An object glued in front of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAttachment {
    /// Attached node, parented to the root
    pub child: NodeKey,
    /// Signed offset along the camera's local Z; negative is ahead
    pub distance: f32,
}

/// Decode a color argument: hex sigils, packed integers, color names
pub(crate) fn color_arg(raw: &str) -> Color {
    let attr = match Value::decode(raw) {
        Value::Integer(i) => Attr::Number(i as f64),
        Value::Structured(json) => Attr::from(json),
        Value::Text(text) => Attr::Text(text),
        Value::Reference(_) => return Color::WHITE,
    };
    let mut color = Color::WHITE;
    color.assign(&attr);
    color
}

/// Scene-composition session
pub struct Session {
    config: SessionConfig,
    graph: SceneGraph,
    registry: ObjectRegistry,
    stage: Option<Stage>,
    surface: Box<dyn RenderSurface>,
    fetcher: Box<dyn AssetFetcher>,
    physics: PhysicsLayer,
    flares: Vec<FlareEntry>,
    camera_attachments: Vec<CameraAttachment>,
    engine_loaded: bool,
    frame_sequence: u64,
}

impl Session {
    /// New session drawing onto `surface`, fetching assets from the
    /// working directory
    pub fn new(config: SessionConfig, surface: Box<dyn RenderSurface>) -> Self {
        let physics = PhysicsLayer::new(config.physics.clone());
        Self {
            config,
            graph: SceneGraph::new(),
            registry: ObjectRegistry::new(),
            stage: None,
            surface,
            fetcher: Box::new(LocalFileFetcher::new(".")),
            physics,
            flares: Vec::new(),
            camera_attachments: Vec::new(),
            engine_loaded: false,
            frame_sequence: 0,
        }
    }
    
    /// Builder: replace the asset fetcher
    pub fn with_fetcher(mut self, fetcher: Box<dyn AssetFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }
    
    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
    
    /// Scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }
    
    /// Id registry
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }
    
    /// Physics layer
    pub fn physics(&self) -> &PhysicsLayer {
        &self.physics
    }
    
    /// Root and camera, once the scene is initialised
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }
    
    /// Render surface
    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }
    
    /// Asset fetcher
    pub fn fetcher_mut(&mut self) -> &mut dyn AssetFetcher {
        self.fetcher.as_mut()
    }
    
    /// Active lens flares
    pub fn flares(&self) -> &[FlareEntry] {
        &self.flares
    }
    
    /// Objects glued to the camera
    pub fn camera_attachments(&self) -> &[CameraAttachment] {
        &self.camera_attachments
    }
    
    /// Whether `initialize_engine` has run
    pub fn is_engine_loaded(&self) -> bool {
        self.engine_loaded
    }
    
    /// Node registered as `id`, if it is still alive
    pub fn resolve(&self, id: &str) -> Option<NodeKey> {
        self.registry.resolve(id).filter(|key| self.graph.contains(*key))
    }
    
    /// World position of the object registered as `id`
    pub fn world_position(&self, id: &str) -> Option<Vec3> {
        self.resolve(id).map(|key| self.graph.world_transform(key).position)
    }
    
    /// Bring up the engine. Factory commands are ignored until this runs.
    pub fn initialize_engine(&mut self) {
        if !self.engine_loaded {
            log::info!("Engine loaded");
            self.engine_loaded = true;
        }
    }
    
    /// Create a fresh root and camera and configure the surface.
    ///
    /// `background` is used as the opaque clear color unless `transparent`.
    /// Re-initialising replaces root and camera; registered objects and the
    /// physics world survive.
    pub fn initialize_scene(&mut self, transparent: bool, background: &str) {
        if !self.engine_loaded {
            log::debug!("initialize_scene ignored: engine not loaded");
            return;
        }
        
        let (width, height) = match self.surface.size() {
            (w, h) if w > 0 && h > 0 => (w, h),
            _ => (self.config.surface.width, self.config.surface.height),
        };
        let clear_color = color_arg(background);
        
        let root = self.graph.insert(
            Node::new(ObjectKind::Scene(SceneRoot {
                background: if transparent { Background::Transparent } else { Background::Color(clear_color) },
                environment: None,
            }))
            .with_name(SCENE_ID),
        );
        
        let lens = &self.config.camera;
        let [x, y, z] = lens.position;
        let camera = self.graph.insert(
            Node::new(ObjectKind::Camera(Camera {
                fov: lens.fov,
                aspect: width as f32 / height.max(1) as f32,
                near: lens.near,
                far: lens.far,
                zoom: 1.0,
            }))
            .with_name(CAMERA_ID)
            .with_position(Vec3::new(x, y, z)),
        );
        
        self.surface.configure(&SurfaceSettings { width, height, transparent, clear_color });
        self.registry.register(SCENE_ID, root);
        self.registry.register(CAMERA_ID, camera);
        self.stage = Some(Stage { root, camera });
        
        log::info!("Scene initialised ({}x{}, transparent: {})", width, height, transparent);
    }
    
    /// Assign a property from a raw argument (`@id`, `#hex`, JSON or text)
    pub fn set_property(&mut self, id: &str, path: &str, raw: &str) {
        PropertyAccessor::new(&mut self.graph, &self.registry).set(id, path, raw);
    }
    
    /// Add to a numeric property
    pub fn change_property(&mut self, id: &str, path: &str, delta: f64) {
        PropertyAccessor::new(&mut self.graph, &self.registry).change(id, path, delta);
    }
    
    /// Read a property
    pub fn get_property(&mut self, id: &str, path: &str) -> Reading {
        PropertyAccessor::new(&mut self.graph, &self.registry).get(id, path)
    }
}
