//! Physics commands
//!
//! Thin id-resolving wrappers over [`PhysicsLayer`](crate::physics::PhysicsLayer).

use super::Session;
use crate::foundation::math::Vec3;
use crate::properties::Reading;

impl Session {
    /// Enable or pause simulation; the world is created on first enable
    pub fn enable_physics(&mut self, enabled: bool) {
        self.physics.set_enabled(enabled);
    }
    
    /// Replace gravity
    pub fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
        self.physics.set_gravity(Vec3::new(x, y, z));
    }
    
    /// Add to gravity
    pub fn change_gravity(&mut self, x: f32, y: f32, z: f32) {
        self.physics.change_gravity(Vec3::new(x, y, z));
    }
    
    /// Gravity as `"x,y,z"`; `"0,0,0"` while physics is off
    pub fn get_gravity(&self) -> Reading {
        let g = self.physics.gravity().unwrap_or_else(Vec3::zeros);
        Reading::Text(format!("{},{},{}", g.x, g.y, g.z))
    }
    
    /// Bind a box body named `id` to the mesh registered as `mesh_id`
    pub fn add_body(&mut self, id: &str, is_static: bool, mass: f32, mesh_id: &str) {
        if !self.physics.is_enabled() {
            return;
        }
        let Some(mesh) = self.resolve(mesh_id) else {
            log::warn!("Cannot bind physics body [{}] to missing mesh [{}]", id, mesh_id);
            return;
        };
        self.graph.update_world_matrices(mesh);
        self.physics.bind(id, is_static, mass, mesh, &self.graph);
    }
    
    /// Overwrite the velocity of the body named `id`
    pub fn set_velocity(&mut self, id: &str, x: f32, y: f32, z: f32) {
        self.physics.set_velocity(id, Vec3::new(x, y, z));
    }
}
