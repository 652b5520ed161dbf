//! Rigid-body physics
//!
//! [`PhysicsWorld`] wraps the Rapier pipeline. [`PhysicsLayer`] owns it
//! lazily and keeps the id → (body, mesh) bindings the frame loop syncs.

mod world;
mod binding;

pub use world::{BoxBody, PhysicsWorld};
pub use binding::{PhysicsBinding, PhysicsLayer};
