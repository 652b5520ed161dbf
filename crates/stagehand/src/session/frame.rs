//! Per-tick synchronisation
//!
//! One tick runs, in order: physics step and body → mesh copy, flare
//! tracking, camera-attachment gluing, world-matrix refresh and a single
//! draw. Gluing must rotate before it translates so the offset follows the
//! camera's current facing.

use super::{Session, Stage};
use crate::foundation::math::Vec3;
use crate::render::Frame;

impl Session {
    /// Run one frame
    pub fn tick(&mut self) {
        self.physics.step(&mut self.graph);
        self.sync_flares();
        self.sync_camera_attachments();
        
        if let Some(stage) = self.stage {
            self.draw(stage);
        }
    }
    
    fn sync_flares(&mut self) {
        for entry in &self.flares {
            let Some(light) = self.graph.get(entry.light) else { continue };
            let (position, rotation) = (light.position, light.rotation);
            if let Some(flare) = self.graph.get_mut(entry.flare) {
                flare.position = position;
                flare.rotation = rotation;
            }
        }
    }
    
    fn sync_camera_attachments(&mut self) {
        let Some(stage) = self.stage else { return };
        let Some(camera) = self.graph.get(stage.camera) else { return };
        let (position, rotation) = (camera.position, camera.quaternion());
        
        for attachment in &self.camera_attachments {
            if let Some(node) = self.graph.get_mut(attachment.child) {
                node.set_quaternion(&rotation);
                node.position = position;
                node.translate_on_axis(&Vec3::z(), attachment.distance);
            }
        }
    }
    
    /// Refresh world matrices and present one frame
    pub(crate) fn draw(&mut self, stage: Stage) {
        self.graph.update_world_matrices(stage.root);
        self.graph.update_world_matrices(stage.camera);
        
        let Some(frame) = Frame::capture(&self.graph, stage.root, stage.camera, self.frame_sequence) else {
            log::debug!("draw skipped: stage is incomplete");
            return;
        };
        self.frame_sequence += 1;
        
        log::trace!("frame {}: {} drawables", frame.sequence, frame.drawables.len());
        if let Err(e) = self.surface.present(frame) {
            log::warn!("Failed to present frame: {}", e);
        }
    }
}
