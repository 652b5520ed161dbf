//! Id ↔ body ↔ mesh bindings
//!
//! A binding hands a mesh's transform over to a rigid body. The collision
//! box is sized once, from the mesh's world bounds at bind time. Every
//! operation is a silent no-op while physics is disabled.

use std::collections::HashMap;

use rapier3d::prelude::RigidBodyHandle;

use super::world::{BoxBody, PhysicsWorld};
use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{NodeKey, SceneGraph};

/// One body driving one mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBinding {
    /// Rapier body
    pub body: RigidBodyHandle,
    /// Node whose local transform follows the body
    pub mesh: NodeKey,
    /// Effective mass; zero for static bodies
    pub mass: f32,
    /// Half extents of the collision box
    pub half_extents: Vec3,
}

/// The session's physics: an optional world plus its bindings
pub struct PhysicsLayer {
    config: PhysicsConfig,
    world: Option<PhysicsWorld>,
    enabled: bool,
    bindings: HashMap<String, PhysicsBinding>,
}

impl PhysicsLayer {
    /// Disabled layer; the world is built on first enable
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            world: None,
            enabled: false,
            bindings: HashMap::new(),
        }
    }
    
    /// Enable or disable simulation. Disabling keeps the world and its
    /// bodies; enabling again resumes them.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled && self.world.is_none() {
            log::info!("Physics: creating world (gravity {:?})", self.config.gravity);
            self.world = Some(PhysicsWorld::new(&self.config));
        }
    }
    
    /// Whether bodies are being stepped
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.world.is_some()
    }
    
    /// The world, if it has been created
    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }
    
    fn active_mut(&mut self) -> Option<&mut PhysicsWorld> {
        if self.enabled {
            self.world.as_mut()
        } else {
            None
        }
    }
    
    /// Current gravity, `None` while disabled
    pub fn gravity(&self) -> Option<Vec3> {
        self.world.as_ref().filter(|_| self.enabled).map(PhysicsWorld::gravity)
    }
    
    /// Replace gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        if let Some(world) = self.active_mut() {
            world.set_gravity(gravity);
        }
    }
    
    /// Add to gravity
    pub fn change_gravity(&mut self, delta: Vec3) {
        if let Some(world) = self.active_mut() {
            let gravity = world.gravity() + delta;
            world.set_gravity(gravity);
        }
    }
    
    /// Bind a box body sized from `mesh`'s world bounds under `id`.
    ///
    /// Static bodies get zero mass whatever was asked for. Only dynamic
    /// bodies start with the mesh's orientation. A previous binding under
    /// the same id is replaced and its body removed.
    pub fn bind(&mut self, id: &str, is_static: bool, mass: f32, mesh: NodeKey, graph: &SceneGraph) -> bool {
        if !self.enabled || !graph.contains(mesh) {
            return false;
        }
        
        let mass = if is_static || !mass.is_finite() || mass <= 0.0 { 0.0 } else { mass };
        let bounds = graph.bounding_box(mesh);
        let (center, half_extents) = if bounds.is_empty() {
            (Vec3::zeros(), Vec3::zeros())
        } else {
            (bounds.center(), bounds.size() * 0.5)
        };
        let rotation = match graph.get(mesh) {
            Some(node) if mass > 0.0 => node.quaternion(),
            _ => Quat::identity(),
        };
        
        let previous = self.bindings.get(id).map(|b| b.body);
        let Some(world) = self.active_mut() else {
            return false;
        };
        if let Some(previous) = previous {
            if !world.remove_body(previous) {
                log::warn!("Physics: stale body handle for '{}'", id);
            }
        }
        let body = world.add_box(&BoxBody { position: center, rotation, half_extents, mass });
        
        log::debug!("Physics: bound '{}' (mass {}, half extents {:?})", id, mass, half_extents);
        self.bindings.insert(id.to_string(), PhysicsBinding { body, mesh, mass, half_extents });
        true
    }
    
    /// Tear down the binding under `id`, enabled or not
    pub fn unbind(&mut self, id: &str) -> bool {
        let Some(binding) = self.bindings.remove(id) else {
            return false;
        };
        if let Some(world) = self.world.as_mut() {
            if !world.remove_body(binding.body) {
                log::warn!("Physics: stale body handle for '{}'", id);
            }
        }
        true
    }
    
    /// Overwrite the linear velocity of the body bound to `id`
    pub fn set_velocity(&mut self, id: &str, velocity: Vec3) {
        let Some(body) = self.bindings.get(id).map(|b| b.body) else {
            return;
        };
        if let Some(world) = self.active_mut() {
            world.set_linear_velocity(body, velocity);
        }
    }
    
    /// Binding under `id`
    pub fn binding(&self, id: &str) -> Option<&PhysicsBinding> {
        self.bindings.get(id)
    }
    
    /// Whether `id` is bound
    pub fn is_bound(&self, id: &str) -> bool {
        self.bindings.contains_key(id)
    }
    
    /// Number of bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
    
    /// Step once and copy every body pose onto its mesh's local transform
    pub fn step(&mut self, graph: &mut SceneGraph) {
        let Some(world) = self.active_mut() else {
            return;
        };
        world.step();
        
        let Some(world) = self.world.as_ref() else {
            return;
        };
        for binding in self.bindings.values() {
            let Some((position, rotation)) = world.pose(binding.body) else {
                continue;
            };
            if let Some(node) = graph.get_mut(binding.mesh) {
                node.position = position;
                node.set_quaternion(&rotation);
            }
        }
    }
    
    /// Remove every body and binding; the world itself survives
    pub fn clear(&mut self) {
        if let Some(world) = self.world.as_mut() {
            world.clear();
        }
        self.bindings.clear();
    }
}
