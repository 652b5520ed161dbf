//! # Stagehand
//!
//! An identifier-addressed scene composition layer. Callers issue commands
//! naming objects by string id; Stagehand keeps a retained scene graph, a
//! rigid-body physics world and a list of camera-glued objects consistent
//! with each other and presents one frame per tick.
//!
//! ## Features
//!
//! - **Object Registry**: string ids mapped to scene-graph handles
//! - **Property Access**: dotted-path get/set/change with unit-aware rules
//! - **Physics Binding**: box bodies driving meshes, one binding per id
//! - **Composition**: transform-preserving reparenting and camera attachment
//! - **Frame Sync**: fixed-order physics, flare and camera sync before drawing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stagehand::prelude::*;
//!
//! let mut session = Session::new(SessionConfig::default(), Box::new(HeadlessSurface::new(640, 480)));
//! session.initialize_engine();
//! session.initialize_scene(false, "#101018");
//! session.create_primitive("cube1", ShapeKind::Box, "#ff0000");
//! session.add_to_scene("cube1");
//! session.set_property("cube1", "rotation.y", "45");
//! session.tick();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core configuration types
pub mod core;

pub mod foundation;
pub mod config;
pub mod scene;
pub mod properties;
pub mod physics;
pub mod render;
pub mod assets;
pub mod session;
pub mod commands;

pub use session::Session;

/// Common imports for session users
pub mod prelude {
    pub use crate::{
        Session,
        commands::Command,
        core::config::{SessionConfig, PhysicsConfig, CameraConfig, SurfaceConfig},
        foundation::math::{Vec3, Quat, Transform},
        scene::{ShapeKind, LightKind, TextureSlot},
        properties::{Reading, Value},
        render::{RenderSurface, HeadlessSurface, Frame},
        assets::{AssetFetcher, LocalFileFetcher, QueuedFetcher},
    };
}
