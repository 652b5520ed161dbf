//! Scene clearing
//!
//! Clearing empties the root, the physics bindings, the flare list and the
//! camera attachments. Registered ids are kept: a cleared object can still
//! be resolved and added back.

use super::Session;

impl Session {
    /// Remove everything from the scene; ignored before scene initialisation
    pub fn clear_scene(&mut self) {
        let Some(stage) = self.stage else {
            return;
        };
        
        self.physics.clear();
        for entry in self.flares.drain(..) {
            self.graph.remove_node(entry.flare);
        }
        self.camera_attachments.clear();
        self.graph.clear_children(stage.root);
        
        log::debug!("Scene cleared ({} ids still registered)", self.registry.len());
    }
}
