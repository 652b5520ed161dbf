//! Object registry
//!
//! The single mapping from caller-facing string ids to scene-graph handles.
//! Registration overwrites; nothing is ever merged or rejected.

use std::collections::HashMap;

use super::scene_graph::NodeKey;

/// String id → node handle map
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    entries: HashMap<String, NodeKey>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Bind `id` to `key`, replacing any previous binding
    pub fn register(&mut self, id: impl Into<String>, key: NodeKey) {
        let id = id.into();
        if let Some(previous) = self.entries.insert(id.clone(), key) {
            if previous != key {
                log::debug!("Registry: id '{}' now refers to a different object", id);
            }
        }
    }
    
    /// Look up `id`
    pub fn resolve(&self, id: &str) -> Option<NodeKey> {
        self.entries.get(id).copied()
    }
    
    /// First id bound to `key`, if any
    pub fn id_of(&self, key: NodeKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, k)| **k == key)
            .map(|(id, _)| id.as_str())
    }
    
    /// Whether `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
    
    /// Number of registered ids
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
