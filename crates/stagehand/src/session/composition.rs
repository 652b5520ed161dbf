//! Scene membership and reparenting
//!
//! Attaching to the camera does not parent anything under the camera
//! node. The child is put under the root and recorded as a
//! [`CameraAttachment`]; the frame loop re-glues it every tick.

use super::{CameraAttachment, Session};
use crate::foundation::math::{Euler, Vec3};

impl Session {
    /// Put `id` directly under the scene root
    pub fn add_to_scene(&mut self, id: &str) {
        let (Some(stage), Some(key)) = (self.stage, self.resolve(id)) else {
            return;
        };
        self.graph.add(stage.root, key);
        self.graph.update_world_matrices(key);
    }
    
    /// Take `id` out of the scene root, along with its lens flare
    pub fn remove_from_scene(&mut self, id: &str) {
        let (Some(stage), Some(key)) = (self.stage, self.resolve(id)) else {
            return;
        };
        self.graph.remove(stage.root, key);
        
        if let Some(index) = self.flares.iter().position(|entry| entry.light == key) {
            let entry = self.flares.remove(index);
            self.graph.remove_node(entry.flare);
        }
    }
    
    /// Attach `child_id` to `parent_id`, `distance` units in front of it.
    ///
    /// Any physics binding of the child is torn down first. Attaching to
    /// the camera records a camera attachment; anything else reparents the
    /// child at `(0, 0, -distance)` with identity rotation.
    pub fn attach(&mut self, child_id: &str, parent_id: &str, distance: f32) {
        let (Some(child), Some(parent)) = (self.resolve(child_id), self.resolve(parent_id)) else {
            return;
        };
        
        if self.physics.unbind(child_id) {
            log::debug!("attach: physics body '{}' removed", child_id);
        }
        self.camera_attachments.retain(|attachment| attachment.child != child);
        
        match self.stage {
            Some(stage) if parent == stage.camera => {
                self.graph.detach(child);
                self.graph.add(stage.root, child);
                self.camera_attachments.push(CameraAttachment { child, distance: -distance });
                if let Some(node) = self.graph.get_mut(child) {
                    node.rotation = Euler::default();
                }
            }
            _ => {
                if !self.graph.add(parent, child) {
                    log::debug!("attach: '{}' cannot be placed under '{}'", child_id, parent_id);
                    return;
                }
                if let Some(node) = self.graph.get_mut(child) {
                    node.position = Vec3::new(0.0, 0.0, -distance);
                    node.rotation = Euler::default();
                }
            }
        }
        self.graph.update_world_matrices(child);
    }
    
    /// Undo `attach`, keeping the object where it currently appears
    pub fn detach(&mut self, id: &str) {
        let Some(key) = self.resolve(id) else {
            return;
        };
        
        if let Some(index) = self.camera_attachments.iter().position(|a| a.child == key) {
            self.camera_attachments.remove(index);
            return;
        }
        
        let Some(stage) = self.stage else {
            return;
        };
        match self.graph.parent(key) {
            Some(parent) if parent != stage.root => {
                let world = self.graph.world_transform(key);
                self.graph.add(stage.root, key);
                if let Some(node) = self.graph.get_mut(key) {
                    node.set_local_transform(&world);
                }
                self.graph.update_world_matrices(key);
            }
            _ => {}
        }
    }
    
    /// Turn `id` to face the world position of `target_id`
    pub fn look_at(&mut self, id: &str, target_id: &str) {
        let (Some(key), Some(target)) = (self.resolve(id), self.resolve(target_id)) else {
            return;
        };
        let target_position = self.graph.world_transform(target).position;
        self.graph.look_at(key, target_position);
    }
}
