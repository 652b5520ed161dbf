//! Camera controls
//!
//! Yaw turns about the world up axis so the horizon stays level; pitch and
//! roll turn about the camera's own axes. Movement is along local axes,
//! with positive forward distances moving along local +Z.

use super::{Session, CAMERA_ID};
use crate::foundation::math::Vec3;
use crate::scene::Node;

impl Session {
    fn with_camera(&mut self, f: impl FnOnce(&mut Node)) {
        let Some(key) = self.resolve(CAMERA_ID) else { return };
        if let Some(node) = self.graph.get_mut(key) {
            f(node);
        }
        self.graph.update_world_matrices(key);
    }
    
    /// Turn about world Y by `degrees`
    pub fn camera_yaw(&mut self, degrees: f32) {
        self.with_camera(|camera| camera.rotate_on_world_axis(&Vec3::y(), degrees.to_radians()));
    }
    
    /// Turn about local X by `degrees`
    pub fn camera_pitch(&mut self, degrees: f32) {
        self.with_camera(|camera| camera.rotate_on_axis(&Vec3::x(), degrees.to_radians()));
    }
    
    /// Turn about local Z by `degrees`
    pub fn camera_roll(&mut self, degrees: f32) {
        self.with_camera(|camera| camera.rotate_on_axis(&Vec3::z(), degrees.to_radians()));
    }
    
    /// Move along local Z
    pub fn camera_move_forward(&mut self, distance: f32) {
        self.with_camera(|camera| camera.translate_on_axis(&Vec3::z(), distance));
    }
    
    /// Move along local X
    pub fn camera_move_right(&mut self, distance: f32) {
        self.with_camera(|camera| camera.translate_on_axis(&Vec3::x(), distance));
    }
    
    /// Move along local Y
    pub fn camera_move_up(&mut self, distance: f32) {
        self.with_camera(|camera| camera.translate_on_axis(&Vec3::y(), distance));
    }
}
