//! Scene objects, the retained scene graph and the object registry
//!
//! ## Architecture
//!
//! ```text
//! caller id ("cube1")
//!      ↓  ObjectRegistry
//! NodeKey
//!      ↓  SceneGraph
//! Node { kind: ObjectKind, local transform, parent, children }
//! ```

mod object;
mod scene_graph;
mod registry;

pub use object::{
    Background, Camera, Color, Flare, FlareElement, Geometry, Light, LightKind, Material,
    MaterialSet, Mesh, ObjectKind, SceneRoot, ShapeKind, TextureMapping, TextureRef, TextureSlot,
};
pub use scene_graph::{Node, NodeKey, SceneGraph, AABB};
pub use registry::ObjectRegistry;
